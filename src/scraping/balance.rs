use error_stack::{report, Result};
use fantoccini::Locator;
use thiserror::Error;

use super::scraper_driver::ScraperDriver;

/// The balance figure on the post-login dashboard. Also doubles as the
/// login flow's success marker.
pub const BALANCE_DISPLAY_CSS: &str = "span[style*='font-size: 2.1875rem']";

/// Priority-ordered locator chain for the balance display. The portal's DOM
/// is unstable, so the primary styled-span selector is backed by structural
/// fallbacks; the first locator that resolves wins and the rest are skipped.
const BALANCE_LOCATORS: [Locator<'static>; 4] = [
    Locator::Css(BALANCE_DISPLAY_CSS),
    Locator::Css(".balance-value"),
    Locator::Css(".amount-display"),
    Locator::XPath("//span[contains(@class, 'balance')]"),
];

#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("No balance element found on the page")]
    NotFound,
    #[error("Balance text could not be parsed")]
    Unparseable,
}

/// Strips thousands separators and truncates the decimal part; the portal
/// shows fractions the sheet does not track.
fn parse_balance(text: &str) -> anyhow::Result<u64> {
    let cleaned = text.trim().replace(',', "");
    let value = cleaned
        .parse::<f64>()
        .map_err(|_| anyhow::anyhow!(format!("Failed to parse balance: {:?}", text)))?;

    if !value.is_finite() || value < 0.0 {
        anyhow::bail!(format!("Balance out of range: {:?}", text));
    }

    Ok(value.trunc() as u64)
}

/// Reads the displayed balance from an authenticated session.
pub async fn extract_balance(driver: &ScraperDriver) -> Result<u64, BalanceError> {
    for locator in BALANCE_LOCATORS {
        let element = match driver.wait_for_element(locator).await {
            Ok(element) => element,
            Err(_) => {
                log::info!("Balance locator {:?} did not resolve, trying next", locator);
                continue;
            }
        };

        let text = match element.text().await {
            Ok(text) => text,
            Err(error) => {
                log::info!("Failed to read text of {:?}: {}", locator, error);
                continue;
            }
        };
        if text.trim().is_empty() {
            continue;
        }

        return parse_balance(&text)
            .map_err(|error| report!(BalanceError::Unparseable).attach_printable(error.to_string()));
    }

    Err(report!(BalanceError::NotFound))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_separators_and_truncates() {
        assert_eq!(parse_balance("1,234.75").unwrap(), 1234);
    }

    #[test]
    fn truncates_instead_of_rounding() {
        assert_eq!(parse_balance("99.99").unwrap(), 99);
    }

    #[test]
    fn plain_integer_passes_through() {
        assert_eq!(parse_balance("200").unwrap(), 200);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(parse_balance("  1,000 \n").unwrap(), 1000);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_balance("no balance").is_err());
    }

    #[test]
    fn negative_balance_is_rejected() {
        assert!(parse_balance("-5").is_err());
    }
}
