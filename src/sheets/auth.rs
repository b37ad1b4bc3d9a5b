use error_stack::{Result, ResultExt};
use google_sheets4::oauth2::{self, authenticator::Authenticator};
use google_sheets4::{hyper, hyper_rustls};
use thiserror::Error;

use crate::config::sheets_config::SpreadsheetConfig;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Service account key not readable")]
    KeyNotReadable,
    #[error("Could not create an authenticator")]
    AuthenticatorFailed,
}

/// Builds a service-account authenticator for the spreadsheet scope. A bad
/// or missing key file is reported, not a panic: the sink boundary contains
/// spreadsheet failures.
pub async fn auth(
    config: &SpreadsheetConfig,
    client: hyper::Client<hyper_rustls::HttpsConnector<hyper::client::HttpConnector>>,
) -> Result<Authenticator<hyper_rustls::HttpsConnector<hyper::client::HttpConnector>>, AuthError> {
    let secret: oauth2::ServiceAccountKey =
        oauth2::read_service_account_key(config.priv_key.as_ref())
            .await
            .change_context(AuthError::KeyNotReadable)
            .attach_printable_lazy(|| format!("key file: {}", config.priv_key))?;

    oauth2::ServiceAccountAuthenticator::with_client(secret, client.clone())
        .build()
        .await
        .change_context(AuthError::AuthenticatorFailed)
}
