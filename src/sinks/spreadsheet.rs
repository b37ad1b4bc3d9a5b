use error_stack::Result;

use crate::config::sheets_config::SpreadsheetConfig;
use crate::sheets::spreadsheet_manager::{SpreadsheetManager, SpreadsheetManagerError};

/// Recomposes the cell text around the new balance. Anything after the
/// first space in the old text is an annotation (currency, a note) that
/// must survive the update.
fn compose_cell_value(balance: u64, old_text: Option<&str>) -> String {
    match old_text.and_then(|text| text.split_once(' ')) {
        Some((_, suffix)) => format!("{} {}", balance, suffix),
        None => balance.to_string(),
    }
}

/// Read-modify-write of the account's target cell on the first worksheet.
/// Failures are reported to the caller, which logs them and moves on; the
/// spreadsheet is never allowed to abort the run.
pub async fn update_balance_cell(
    balance: u64,
    target_cell: &str,
    config: &SpreadsheetConfig,
) -> Result<(), SpreadsheetManagerError> {
    let manager = SpreadsheetManager::new(config.clone()).await?;

    let sheet_title = manager.first_sheet_title().await?;
    let range = format!("'{}'!{}", sheet_title, target_cell);

    let old_text = manager.read_cell(&range).await?;
    let new_text = compose_cell_value(balance, old_text.as_deref());

    manager.write_cell(&range, &new_text).await?;
    log::info!("Updated cell {} with value {:?}", range, new_text);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_suffix_after_first_space() {
        assert_eq!(compose_cell_value(85, Some("120 EGP")), "85 EGP");
    }

    #[test]
    fn no_space_means_no_suffix() {
        assert_eq!(compose_cell_value(200, Some("0")), "200");
    }

    #[test]
    fn empty_cell_gets_plain_balance() {
        assert_eq!(compose_cell_value(42, None), "42");
    }

    #[test]
    fn multi_word_suffix_is_kept_whole() {
        assert_eq!(
            compose_cell_value(85, Some("120 EGP remaining")),
            "85 EGP remaining"
        );
    }

    #[test]
    fn suffix_survives_repeated_updates() {
        let first = compose_cell_value(85, Some("120 EGP"));
        let second = compose_cell_value(60, Some(first.as_str()));
        assert_eq!(second, "60 EGP");
    }
}
