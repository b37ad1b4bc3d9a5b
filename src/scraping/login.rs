use std::time::Duration;

use error_stack::{Result, ResultExt};
use fantoccini::Locator;
use thiserror::Error;
use tokio::time::sleep;

use super::balance::BALANCE_DISPLAY_CSS;
use super::scraper_driver::ScraperDriver;
use super::service_type::select_service_type;
use crate::accounts::AccountRecord;
use crate::config::portal_config::PortalConfig;

const LOGIN_ID_INPUT: &str = "login_loginid_input_01";
const PASSWORD_INPUT: &str = "login_password_input_01";
const LOGIN_BUTTON: &str = "login-withecare";

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Failed to load the login page")]
    PageLoad,
    #[error("Login id input not available")]
    LoginIdInput,
    #[error("Service type selection failed")]
    ServiceType,
    #[error("Password input not available")]
    PasswordInput,
    #[error("Login button click failed")]
    SubmitClick,
    #[error("Balance display did not appear after login")]
    NoPostLoginMarker,
}

/// Runs the full login sequence for one account. Any failed step aborts the
/// login, saves a screenshot keyed by the account, and surfaces the error;
/// the orchestrator skips the account without retrying.
pub async fn login(
    driver: &ScraperDriver,
    portal: &PortalConfig,
    account: &AccountRecord,
) -> Result<(), LoginError> {
    match login_steps(driver, portal, account).await {
        Ok(()) => Ok(()),
        Err(report) => {
            log::error!(
                "Login failed for account {}: {:?}",
                account.mobile_number,
                report
            );
            driver
                .save_screenshot(&format!("login_error_{}.png", account.mobile_number))
                .await;
            Err(report)
        }
    }
}

async fn login_steps(
    driver: &ScraperDriver,
    portal: &PortalConfig,
    account: &AccountRecord,
) -> Result<(), LoginError> {
    driver
        .goto(portal.login_url.as_ref())
        .await
        .change_context(LoginError::PageLoad)?;
    driver
        .wait_for_element(Locator::Css("body"))
        .await
        .change_context(LoginError::PageLoad)?;
    log::info!("Loaded the login page for account {}", account.mobile_number);

    let mobile_input = driver
        .wait_for_element(Locator::Id(LOGIN_ID_INPUT))
        .await
        .change_context(LoginError::LoginIdInput)?;
    mobile_input
        .clear()
        .await
        .change_context(LoginError::LoginIdInput)?;
    mobile_input
        .send_keys(&account.mobile_number)
        .await
        .change_context(LoginError::LoginIdInput)?;
    log::info!("Entered the service number {}", account.mobile_number);
    sleep(Duration::from_secs(1)).await;

    select_service_type(driver)
        .await
        .change_context(LoginError::ServiceType)?;
    sleep(Duration::from_secs(1)).await;

    let password_input = driver
        .wait_for_element(Locator::Id(PASSWORD_INPUT))
        .await
        .change_context(LoginError::PasswordInput)?;
    password_input
        .clear()
        .await
        .change_context(LoginError::PasswordInput)?;
    password_input
        .send_keys(&account.password)
        .await
        .change_context(LoginError::PasswordInput)?;
    log::info!("Entered the password");
    sleep(Duration::from_secs(1)).await;

    // The overlay on top of the form swallows standard clicks on the login
    // button, so it is clicked through JavaScript instead.
    driver
        .wait_for_element(Locator::Id(LOGIN_BUTTON))
        .await
        .change_context(LoginError::SubmitClick)?;
    driver
        .raw_click(LOGIN_BUTTON)
        .await
        .change_context(LoginError::SubmitClick)?;
    log::info!("Clicked the login button");
    sleep(Duration::from_secs(3)).await;

    driver
        .wait_for_element(Locator::Css(BALANCE_DISPLAY_CSS))
        .await
        .change_context(LoginError::NoPostLoginMarker)?;
    log::info!("Logged in successfully for account {}", account.mobile_number);

    Ok(())
}
