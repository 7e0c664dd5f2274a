//! Tool configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/calagent/config.toml` by default. Every field is optional:
//!
//! ```toml
//! credentials_env = "GOOGLE_SERVICE_ACCOUNT_JSON"
//! default_calendar_id = "primary"
//! default_timezone = "America/New_York"
//! max_results = 100
//!
//! [[calendars]]
//! id = "primary"
//! label = "Principal"
//!
//! [[calendars]]
//! id = "team@group.calendar.google.com"
//! label = "Team"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use calagent_providers::google::{CALENDAR_API_BASE, CredentialSettings, DEFAULT_CREDENTIALS_ENV};
use serde::{Deserialize, Serialize};

use crate::error::{ToolError, ToolResult};

/// The provider refuses page sizes above this.
const PROVIDER_MAX_RESULTS: usize = 2500;

/// A calendar known to the aggregated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    /// Provider calendar id.
    pub id: String,
    /// Human-readable label attached to aggregated events.
    pub label: String,
}

impl CalendarEntry {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Configuration for the calendar tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Environment variable holding the service-account key JSON.
    pub credentials_env: String,

    /// Calendar used by create, edit and delete.
    pub default_calendar_id: String,

    /// Zone applied to new event times when the account setting is unavailable.
    pub default_timezone: String,

    /// Maximum number of events a listing returns.
    pub max_results: usize,

    /// HTTP timeout in seconds.
    pub timeout_secs: u64,

    /// Calendar API base URL.
    pub api_base: String,

    /// Calendars queried by the aggregated listing.
    ///
    /// Defaults to the account's `primary` calendar alone, the only id that
    /// exists for every account. Shared and group calendars have
    /// account-specific ids and must be listed under `[[calendars]]`.
    pub calendars: Vec<CalendarEntry>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            credentials_env: DEFAULT_CREDENTIALS_ENV.to_string(),
            default_calendar_id: "primary".to_string(),
            default_timezone: "America/New_York".to_string(),
            max_results: 100,
            timeout_secs: 30,
            api_base: CALENDAR_API_BASE.to_string(),
            calendars: vec![CalendarEntry::new("primary", "Principal")],
        }
    }
}

impl ToolsConfig {
    /// Loads configuration from the default path, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> ToolResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads and validates configuration from a specific path.
    pub fn load_from(path: &Path) -> ToolResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ToolError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            ToolError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calagent")
            .join("config.toml")
    }

    /// Checks values the provider would otherwise reject at call time.
    pub fn validate(&self) -> ToolResult<()> {
        if self.credentials_env.trim().is_empty() {
            return Err(ToolError::Config("credentials_env must not be empty".into()));
        }
        if self.default_calendar_id.trim().is_empty() {
            return Err(ToolError::Config(
                "default_calendar_id must not be empty".into(),
            ));
        }
        if self.max_results == 0 || self.max_results > PROVIDER_MAX_RESULTS {
            return Err(ToolError::Config(format!(
                "max_results must be between 1 and {}, got {}",
                PROVIDER_MAX_RESULTS, self.max_results
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ToolError::Config("timeout_secs must be positive".into()));
        }
        url::Url::parse(&self.api_base)
            .map_err(|e| ToolError::Config(format!("invalid api_base `{}`: {}", self.api_base, e)))?;
        if let Some(entry) = self
            .calendars
            .iter()
            .find(|c| c.id.trim().is_empty() || c.label.trim().is_empty())
        {
            return Err(ToolError::Config(format!(
                "calendar entries need both an id and a label (id `{}`, label `{}`)",
                entry.id, entry.label
            )));
        }
        Ok(())
    }

    /// Credential loader settings bound to the default calendar.
    pub fn credential_settings(&self) -> CredentialSettings {
        CredentialSettings::default()
            .with_env_var(&self.credentials_env)
            .with_calendar_id(&self.default_calendar_id)
            .with_api_base(&self.api_base)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}
