//! Service-account credential loading.
//!
//! The credential is a complete service-account key document stored in an
//! environment variable. Every [`ServiceAccountConnector::connect`] call
//! re-reads the variable, exchanges the key for an access token, and hands
//! back a fresh [`GoogleCalendarClient`].

use std::env::VarError;
use std::time::Duration;

use tracing::{debug, warn};
use yup_oauth2::{ServiceAccountAuthenticator, ServiceAccountKey};

use crate::backend::{BoxFuture, ClientConnector, Session};
use crate::error::{ProviderError, ProviderResult};

use super::client::{CALENDAR_API_BASE, GoogleCalendarClient};

/// OAuth scope granting read/write access to calendars.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Environment variable read when none is configured.
pub const DEFAULT_CREDENTIALS_ENV: &str = "GOOGLE_SERVICE_ACCOUNT_JSON";

/// Where to find the credential and what to bind the resulting client to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSettings {
    /// Environment variable holding the service-account key JSON.
    pub env_var: String,
    /// Calendar the session is bound to.
    pub calendar_id: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            env_var: DEFAULT_CREDENTIALS_ENV.to_string(),
            calendar_id: "primary".to_string(),
            api_base: CALENDAR_API_BASE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl CredentialSettings {
    pub fn with_env_var(mut self, env_var: impl Into<String>) -> Self {
        self.env_var = env_var.into();
        self
    }

    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Reads the credential blob from the named environment variable.
///
/// A missing or blank variable is a configuration error.
pub fn read_credential_blob(env_var: &str) -> ProviderResult<String> {
    match std::env::var(env_var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => Err(ProviderError::configuration(format!(
            "environment variable `{}` is empty",
            env_var
        ))),
        Err(VarError::NotPresent) => Err(ProviderError::configuration(format!(
            "environment variable `{}` is not set",
            env_var
        ))),
        Err(VarError::NotUnicode(_)) => Err(ProviderError::credential(format!(
            "environment variable `{}` is not valid UTF-8",
            env_var
        ))),
    }
}

/// Parses a service-account key document.
///
/// Error messages carry only the parser position, never key material.
pub fn parse_service_account_key(blob: &str) -> ProviderResult<ServiceAccountKey> {
    let value: serde_json::Value = serde_json::from_str(blob).map_err(|e| {
        ProviderError::credential(format!("service-account credential is not valid JSON: {}", e))
    })?;

    serde_json::from_value(value).map_err(|e| {
        ProviderError::credential(format!("credential is not a service-account key: {}", e))
    })
}

/// Exchanges a service-account key for an access token.
async fn fetch_access_token(key: ServiceAccountKey) -> ProviderResult<String> {
    let client_email = key.client_email.clone();

    let auth = ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .map_err(|e| {
            ProviderError::credential(format!("failed to build authenticator: {}", e))
                .with_source(e)
        })?;

    let token = auth.token(&[CALENDAR_SCOPE]).await.map_err(|e| {
        ProviderError::credential(format!(
            "service account {} was rejected: {}",
            client_email, e
        ))
    })?;

    debug!("obtained access token for {}", client_email);
    token
        .token()
        .map(String::from)
        .ok_or_else(|| ProviderError::credential("token response carried no access token"))
}

/// Connects to Google Calendar with a service account read from the
/// environment.
#[derive(Debug, Clone)]
pub struct ServiceAccountConnector {
    settings: CredentialSettings,
}

impl ServiceAccountConnector {
    pub fn new(settings: CredentialSettings) -> Self {
        Self { settings }
    }

    async fn open_session(&self) -> ProviderResult<Session> {
        let blob = read_credential_blob(&self.settings.env_var)?;
        let key = parse_service_account_key(&blob)?;
        let access_token = fetch_access_token(key).await?;

        let client = GoogleCalendarClient::with_api_base(
            access_token,
            self.settings.timeout,
            self.settings.api_base.as_str(),
        )?;

        Ok(Session::new(Box::new(client), &self.settings.calendar_id))
    }
}

impl ClientConnector for ServiceAccountConnector {
    fn connect(&self) -> BoxFuture<'_, ProviderResult<Session>> {
        Box::pin(async move {
            self.open_session().await.inspect_err(|e| {
                warn!("could not open calendar session: {}", e);
            })
        })
    }
}
