use std::time::Duration;

#[derive(serde::Deserialize, Debug, Clone)]
pub struct PortalConfig {
    pub login_url: Box<str>,
    pub page_load_timeout_secs: u64,
    pub element_wait_timeout_secs: u64,
}

impl PortalConfig {
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    pub fn element_wait_timeout(&self) -> Duration {
        Duration::from_secs(self.element_wait_timeout_secs)
    }
}
