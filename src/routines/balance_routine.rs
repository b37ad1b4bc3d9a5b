use std::path::Path;
use std::time::Duration;

use error_stack::{report, Result, ResultExt};
use tokio::time::sleep;

use crate::accounts::{load_accounts, AccountRecord};
use crate::config::app_config::CONFIG;
use crate::routines::routine::{Routine, RoutineError};
use crate::scraping::balance::extract_balance;
use crate::scraping::login::login;
use crate::scraping::scraper_driver::ScraperDriver;
use crate::sinks::spreadsheet::update_balance_cell;
use crate::sinks::text_file::write_balance_file;

/// Sequential batch over the account list: one shared browser session,
/// login → extract → persist per account, cookies cleared in between.
pub struct BalanceRoutine;

impl BalanceRoutine {
    /// Everything that can fail for a single account is contained here;
    /// a failure logs, skips the rest of this account, and lets the batch
    /// move on.
    async fn process_account(&self, driver: &ScraperDriver, account: &AccountRecord) {
        if login(driver, &CONFIG.portal, account).await.is_err() {
            log::error!(
                "Skipping account {} after a failed login",
                account.mobile_number
            );
            return;
        }

        let balance = match extract_balance(driver).await {
            Ok(balance) => balance,
            Err(report) => {
                log::error!(
                    "Failed to extract the balance for account {}: {:?}",
                    account.mobile_number,
                    report
                );
                return;
            }
        };
        log::info!("Balance for account {}: {}", account.mobile_number, balance);

        // The two sinks are independent: a failed file write must not block
        // the spreadsheet update, and vice versa.
        let artifact = format!("balance_{}.txt", account.mobile_number);
        match write_balance_file(balance, Path::new(&artifact)) {
            Ok(()) => log::info!("Saved balance to {}", artifact),
            Err(error) => log::error!("Failed to write {}: {}", artifact, error),
        }

        if let Err(report) =
            update_balance_cell(balance, &account.target_cell, &CONFIG.sheets).await
        {
            log::error!(
                "Failed to update cell {} for account {}: {:?}",
                account.target_cell,
                account.mobile_number,
                report
            );
        }
    }

    async fn process_accounts(
        &self,
        driver: &ScraperDriver,
        accounts: &[AccountRecord],
    ) -> Result<(), RoutineError> {
        for account in accounts {
            self.process_account(driver, account).await;

            // A session that cannot be wiped would leak into the next
            // account's login, so this failure aborts the batch.
            driver
                .reset_session()
                .await
                .change_context(RoutineError::RoutineFailure(
                    "failed to reset the browser session between accounts".to_owned(),
                ))?;
            sleep(Duration::from_secs(1)).await;
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl Routine for BalanceRoutine {
    fn name(&self) -> &str {
        "BalanceRoutine"
    }

    async fn run(&self) -> Result<(), RoutineError> {
        log::info!("Running BalanceRoutine");

        let accounts = load_accounts(Path::new(CONFIG.accounts.csv_path.as_ref()));
        if accounts.is_empty() {
            return Err(report!(RoutineError::RoutineFailure(
                "no accounts found in the CSV file, check the path and contents".to_owned(),
            )));
        }

        let mut driver = ScraperDriver::new(&CONFIG.portal)
            .await
            .change_context(RoutineError::RoutineFailure(
                "failed to open the browser session".to_owned(),
            ))?;

        let result = self.process_accounts(&driver, &accounts).await;
        if result.is_err() {
            driver.save_screenshot("unexpected_error.png").await;
        }

        // Exactly one close, shared by the success and failure paths.
        driver.close().await;

        result
    }
}
