use std::process::{Child, Command};
use std::time::Duration;

use error_stack::{report, Result, ResultExt};
use fantoccini::{elements::Element, Client, ClientBuilder, Locator};
use thiserror::Error;

use crate::config::portal_config::PortalConfig;

/// One automated browser session, shared by the whole run. Owns the
/// chromedriver child process alongside the WebDriver client.
pub struct ScraperDriver {
    driver_process: Option<Child>,
    pub client: Client,
    page_load_timeout: Duration,
    element_wait_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ScraperDriverError {
    #[error("Failed to spawn chromedriver process")]
    FailedToSpawnChromedriver,
    #[error("Failed to create client for chromedriver")]
    FailedToCreateClient,
    #[error("Navigation to {0} failed")]
    NavigationFailed(String),
    #[error("Navigation to {0} did not complete in time")]
    NavigationTimeout(String),
    #[error("Timed out waiting for element {0}")]
    ElementWait(String),
    #[error("Javascript click on #{0} failed")]
    RawClickFailed(String),
    #[error("Failed to clear session cookies")]
    CookieReset,
}

fn random_port() -> u16 {
    rand::random::<u16>() % (65535 - 1024) + 1024
}

/// Capabilities that strip the usual automation tells and pin the viewport,
/// so the portal renders the same layout on every run.
fn chrome_capabilities() -> serde_json::Map<String, serde_json::Value> {
    let mut chrome_options = serde_json::Map::new();
    chrome_options.insert(
        "args".to_string(),
        serde_json::json!([
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--disable-gpu",
            "--window-size=1920,1080",
            "--log-level=3",
            "--disable-blink-features=AutomationControlled",
        ]),
    );
    chrome_options.insert(
        "excludeSwitches".to_string(),
        serde_json::json!(["enable-automation"]),
    );
    chrome_options.insert("useAutomationExtension".to_string(), serde_json::json!(false));

    let mut caps = serde_json::Map::new();
    caps.insert(
        "goog:chromeOptions".to_string(),
        serde_json::Value::Object(chrome_options),
    );
    caps
}

fn spawn_chromedriver_process(port: u16) -> Result<Child, ScraperDriverError> {
    Command::new("chromedriver")
        .arg(format!("--port={}", port))
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .change_context(ScraperDriverError::FailedToSpawnChromedriver)
}

async fn create_and_configure_client(port: u16) -> Result<Client, ScraperDriverError> {
    // Give chromedriver a moment to bind its port before connecting.
    tokio::time::sleep(Duration::from_secs(1)).await;

    ClientBuilder::native()
        .capabilities(chrome_capabilities())
        .connect(format!("http://localhost:{}", port).as_str())
        .await
        .change_context(ScraperDriverError::FailedToCreateClient)
        .attach_printable_lazy(|| format!("Failed to connect to chromedriver on port {}", port))
}

impl ScraperDriver {
    pub async fn new(portal: &PortalConfig) -> Result<Self, ScraperDriverError> {
        let port = random_port();

        let scraper = ScraperDriver {
            driver_process: spawn_chromedriver_process(port)?.into(),
            client: create_and_configure_client(port).await?,
            page_load_timeout: portal.page_load_timeout(),
            element_wait_timeout: portal.element_wait_timeout(),
        };

        Ok(scraper)
    }

    /// Navigation bounded by the page-load timeout.
    pub async fn goto(&self, url: &str) -> Result<(), ScraperDriverError> {
        match tokio::time::timeout(self.page_load_timeout, self.client.goto(url)).await {
            Ok(result) => {
                result.change_context_lazy(|| ScraperDriverError::NavigationFailed(url.to_owned()))
            }
            Err(_) => Err(report!(ScraperDriverError::NavigationTimeout(
                url.to_owned()
            ))),
        }
    }

    /// Waits for the element to be present, up to the element-wait timeout.
    pub async fn wait_for_element(
        &self,
        locator: Locator<'_>,
    ) -> Result<Element, ScraperDriverError> {
        self.client
            .wait()
            .at_most(self.element_wait_timeout)
            .for_element(locator)
            .await
            .change_context_lazy(|| ScraperDriverError::ElementWait(format!("{:?}", locator)))
    }

    /// Clicks the element through JavaScript, bypassing hit-testing. The
    /// portal overlays the login button, so a standard click lands on the
    /// overlay instead.
    pub async fn raw_click(&self, element_id: &str) -> Result<(), ScraperDriverError> {
        let script = format!("document.getElementById({:?}).click();", element_id);
        self.client
            .execute(&script, vec![])
            .await
            .map(|_| ())
            .change_context_lazy(|| ScraperDriverError::RawClickFailed(element_id.to_owned()))
    }

    /// Clears cookies so the next account starts from a clean session.
    pub async fn reset_session(&self) -> Result<(), ScraperDriverError> {
        self.client
            .delete_all_cookies()
            .await
            .change_context(ScraperDriverError::CookieReset)
    }

    /// Best-effort viewport screenshot for failure diagnostics.
    pub async fn save_screenshot(&self, path: &str) {
        match self.client.screenshot().await {
            Ok(png) => {
                if let Err(error) = std::fs::write(path, png) {
                    log::error!("Failed to save screenshot {}: {}", path, error);
                } else {
                    log::info!("Saved screenshot to {}", path);
                }
            }
            Err(error) => log::error!("Failed to capture screenshot {}: {}", path, error),
        }
    }

    /// Closes the WebDriver session and kills the chromedriver child. The
    /// batch orchestrator calls this exactly once per run, on every exit
    /// path; `Drop` only cleans up the child if that never happened.
    pub async fn close(&mut self) {
        log::info!("Closing ScraperDriver");

        let client = self.client.clone();
        client
            .close()
            .await
            .unwrap_or_else(|error| log::error!("Failed to close WebDriver client: {}", error));

        if let Some(mut process) = self.driver_process.take() {
            process
                .kill()
                .unwrap_or_else(|error| log::error!("Failed to kill chromedriver: {}", error));
        }
    }
}

impl Drop for ScraperDriver {
    fn drop(&mut self) {
        if let Some(mut process) = self.driver_process.take() {
            process
                .kill()
                .unwrap_or_else(|error| log::error!("Failed to kill chromedriver: {}", error));
        }
    }
}
