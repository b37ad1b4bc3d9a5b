use std::time::Duration;

use error_stack::{report, Result, ResultExt};
use fantoccini::Locator;
use thiserror::Error;

use super::scraper_driver::ScraperDriver;

/// Known renderings of the "Internet" option, tried in priority order. The
/// portal serves the label in either language depending on locale state.
const SERVICE_TYPE_VARIANTS: &[&str] = &[
    "Internet",
    "INTERNET",
    "انترنت",
    "الانترنت",
    "إنترنت",
    "الإنترنت",
];

const DROPDOWN_SELECTOR: &str = ".ant-select-selector";
const DROPDOWN_PANEL_SELECTOR: &str = "div.ant-select-dropdown:not([style*='display: none'])";
const OPTION_SELECTOR: &str = "div.ant-select-item";

#[derive(Debug, Error)]
pub enum ServiceTypeError {
    #[error("Service type dropdown not clickable")]
    DropdownNotFound,
    #[error("Service type dropdown panel did not appear")]
    PanelNotVisible,
    #[error("No Internet option matched any known label variant")]
    NoVariantMatched,
    #[error("Failed to click the matched service type option")]
    OptionClickFailed,
}

/// Picks the first option matched by the earliest variant. Variants are a
/// fallback chain: each is attempted exactly once, first hit wins.
fn match_option(option_texts: &[String], variants: &[&str]) -> Option<usize> {
    for variant in variants {
        let needle = variant.to_lowercase();
        if let Some(index) = option_texts
            .iter()
            .position(|text| text.to_lowercase().contains(&needle))
        {
            return Some(index);
        }
    }
    None
}

/// Selects the Internet service type in the login form's dropdown. On
/// failure a screenshot lands in `service_type_error.png` and the login is
/// abandoned by the caller.
pub async fn select_service_type(driver: &ScraperDriver) -> Result<(), ServiceTypeError> {
    match select_internet_option(driver).await {
        Ok(()) => Ok(()),
        Err(report) => {
            log::error!("Failed to select the service type: {:?}", report);
            driver.save_screenshot("service_type_error.png").await;
            Err(report)
        }
    }
}

async fn select_internet_option(driver: &ScraperDriver) -> Result<(), ServiceTypeError> {
    let dropdown = driver
        .wait_for_element(Locator::Css(DROPDOWN_SELECTOR))
        .await
        .change_context(ServiceTypeError::DropdownNotFound)?;
    dropdown
        .click()
        .await
        .change_context(ServiceTypeError::DropdownNotFound)?;
    log::info!("Opened the service type dropdown");
    tokio::time::sleep(Duration::from_secs(1)).await;

    driver
        .wait_for_element(Locator::Css(DROPDOWN_PANEL_SELECTOR))
        .await
        .change_context(ServiceTypeError::PanelNotVisible)?;

    let options = driver
        .client
        .find_all(Locator::Css(OPTION_SELECTOR))
        .await
        .change_context(ServiceTypeError::PanelNotVisible)?;

    let mut option_texts = Vec::with_capacity(options.len());
    for option in &options {
        option_texts.push(option.text().await.unwrap_or_default());
    }

    let index = match_option(&option_texts, SERVICE_TYPE_VARIANTS)
        .ok_or_else(|| report!(ServiceTypeError::NoVariantMatched))?;

    options[index]
        .click()
        .await
        .change_context(ServiceTypeError::OptionClickFailed)?;
    log::info!("Selected service type option {:?}", option_texts[index]);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|label| label.to_string()).collect()
    }

    #[test]
    fn matches_arabic_only_dropdown() {
        let options = texts(&["موبايل", "إنترنت"]);
        assert_eq!(match_option(&options, SERVICE_TYPE_VARIANTS), Some(1));
    }

    #[test]
    fn match_is_case_insensitive_substring() {
        let options = texts(&["Home Internet Plan"]);
        assert_eq!(match_option(&options, SERVICE_TYPE_VARIANTS), Some(0));
    }

    #[test]
    fn earlier_variant_wins_over_option_order() {
        // "انترنت" is a substring of "الانترنت", so the first variant that
        // matches anything decides, not the option closest to the top.
        let options = texts(&["الانترنت", "انترنت"]);
        assert_eq!(match_option(&options, &["انترنت", "الانترنت"]), Some(0));
    }

    #[test]
    fn no_variant_matched_yields_none() {
        let options = texts(&["موبايل", "تليفون أرضي"]);
        assert_eq!(match_option(&options, SERVICE_TYPE_VARIANTS), None);
    }

    #[test]
    fn empty_dropdown_yields_none() {
        assert_eq!(match_option(&[], SERVICE_TYPE_VARIANTS), None);
    }
}
