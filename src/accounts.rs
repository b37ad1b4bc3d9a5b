use std::path::Path;

/// One row of the accounts table. `target_cell` is the A1 reference of the
/// spreadsheet cell this account's balance is published to (e.g. "H2").
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AccountRecord {
    pub mobile_number: String,
    pub password: String,
    pub target_cell: String,
}

impl AccountRecord {
    fn trimmed(mut self) -> Self {
        self.mobile_number = self.mobile_number.trim().to_owned();
        self.password = self.password.trim().to_owned();
        self.target_cell = self.target_cell.trim().to_owned();
        self
    }

    fn is_complete(&self) -> bool {
        !self.mobile_number.is_empty() && !self.password.is_empty() && !self.target_cell.is_empty()
    }
}

/// Loads accounts from a header-bearing CSV with columns
/// `mobile_number`, `password`, `target_cell`.
///
/// Rows missing any field are dropped; an unreadable file yields an empty
/// list (the caller aborts the run when there is nothing to process).
pub fn load_accounts(path: &Path) -> Vec<AccountRecord> {
    let mut reader = match csv::Reader::from_path(path) {
        Ok(reader) => reader,
        Err(error) => {
            log::error!("Failed to read accounts file {}: {}", path.display(), error);
            return Vec::new();
        }
    };

    let accounts: Vec<AccountRecord> = reader
        .deserialize::<AccountRecord>()
        .filter_map(|row| row.ok())
        .map(AccountRecord::trimmed)
        .filter(AccountRecord::is_complete)
        .collect();

    log::info!("Loaded {} accounts from {}", accounts.len(), path.display());
    accounts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_complete_rows_in_order() {
        let file = write_csv(
            "mobile_number,password,target_cell\n\
             0100000001,secret1,H2\n\
             0100000002,secret2,H3\n",
        );
        let accounts = load_accounts(file.path());
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].mobile_number, "0100000001");
        assert_eq!(accounts[0].target_cell, "H2");
        assert_eq!(accounts[1].mobile_number, "0100000002");
    }

    #[test]
    fn drops_rows_with_missing_fields() {
        let file = write_csv(
            "mobile_number,password,target_cell\n\
             0100000001,,H2\n\
             ,secret2,H3\n\
             0100000003,secret3,\n\
             0100000004,secret4,H5\n",
        );
        let accounts = load_accounts(file.path());
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].mobile_number, "0100000004");
    }

    #[test]
    fn trims_whitespace_around_fields() {
        let file = write_csv(
            "mobile_number,password,target_cell\n\
             \u{20}0100000001 , secret1 , H2 \n",
        );
        let accounts = load_accounts(file.path());
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].mobile_number, "0100000001");
        assert_eq!(accounts[0].password, "secret1");
        assert_eq!(accounts[0].target_cell, "H2");
    }

    #[test]
    fn whitespace_only_field_counts_as_missing() {
        let file = write_csv(
            "mobile_number,password,target_cell\n\
             0100000001,   ,H2\n",
        );
        assert!(load_accounts(file.path()).is_empty());
    }

    #[test]
    fn unreadable_file_yields_empty_list() {
        let accounts = load_accounts(Path::new("definitely/not/a/real/file.csv"));
        assert!(accounts.is_empty());
    }
}
