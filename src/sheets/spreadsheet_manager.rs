use error_stack::{report, Context, Result, ResultExt};
use google_sheets4::{api::ValueRange, Sheets};
use serde_json::Value;

use super::{auth, http_client};
use crate::config::sheets_config::SpreadsheetConfig;
use crate::sheets::value_range_factory::ValueRangeFactory;

/// Thin wrapper over the Sheets hub. Balances always land on the first
/// worksheet, so cell references are qualified with its resolved title.
pub struct SpreadsheetManager {
    pub config: SpreadsheetConfig,
    hub: Sheets<
        google_sheets4::hyper_rustls::HttpsConnector<google_sheets4::hyper::client::HttpConnector>,
    >,
}

#[derive(Debug)]
pub enum SpreadsheetManagerError {
    AuthError,
    FailedToFetchSheetTitle,
    FailedToFetchCell,
    FailedToWriteCell,
}

impl std::fmt::Display for SpreadsheetManagerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Context for SpreadsheetManagerError {}

impl SpreadsheetManager {
    pub async fn new(config: SpreadsheetConfig) -> Result<Self, SpreadsheetManagerError> {
        let client = http_client::http_client();
        let auth = auth::auth(&config, client.clone())
            .await
            .change_context(SpreadsheetManagerError::AuthError)?;
        let hub: Sheets<
            google_sheets4::hyper_rustls::HttpsConnector<
                google_sheets4::hyper::client::HttpConnector,
            >,
        > = Sheets::new(client.clone(), auth);

        Ok(SpreadsheetManager { config, hub })
    }

    /// Title of the first worksheet, used to qualify A1 cell references.
    pub async fn first_sheet_title(&self) -> Result<String, SpreadsheetManagerError> {
        let response = self
            .hub
            .spreadsheets()
            .get(&self.config.spreadsheet_id)
            .doit()
            .await
            .change_context(SpreadsheetManagerError::FailedToFetchSheetTitle)?;

        response
            .1
            .sheets
            .and_then(|sheets| sheets.into_iter().next())
            .and_then(|sheet| sheet.properties)
            .and_then(|properties| properties.title)
            .ok_or(report!(SpreadsheetManagerError::FailedToFetchSheetTitle))
    }

    /// Current text of one cell; `None` for an empty cell.
    pub async fn read_cell(&self, range: &str) -> Result<Option<String>, SpreadsheetManagerError> {
        let response = self
            .hub
            .spreadsheets()
            .values_get(&self.config.spreadsheet_id, range)
            .doit()
            .await
            .change_context(SpreadsheetManagerError::FailedToFetchCell)?;

        let text = response
            .1
            .values
            .and_then(|rows| rows.into_iter().next())
            .and_then(|row| row.into_iter().next())
            .map(|value| match value {
                Value::String(text) => text,
                other => other.to_string(),
            });

        Ok(text)
    }

    pub async fn write_cell(
        &self,
        range: &str,
        value: &str,
    ) -> Result<(), SpreadsheetManagerError> {
        self.hub
            .spreadsheets()
            .values_update(
                ValueRange::from_str(value),
                &self.config.spreadsheet_id,
                range,
            )
            .value_input_option("USER_ENTERED")
            .doit()
            .await
            .map(|_| ())
            .change_context(SpreadsheetManagerError::FailedToWriteCell)
    }
}
