#[derive(serde::Deserialize, Debug, Clone)]
pub struct AccountsConfig {
    pub csv_path: Box<str>,
}
