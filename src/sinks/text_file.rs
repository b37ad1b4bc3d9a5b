use std::path::Path;

/// Overwrites the per-account artifact with the plain decimal balance.
pub fn write_balance_file(balance: u64, path: &Path) -> std::io::Result<()> {
    std::fs::write(path, balance.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_plain_decimal_string() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("balance_0100000001.txt");

        write_balance_file(1234, &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1234");
    }

    #[test]
    fn overwrites_instead_of_appending() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("balance_0100000001.txt");

        write_balance_file(999, &path).unwrap();
        write_balance_file(85, &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "85");
    }
}
