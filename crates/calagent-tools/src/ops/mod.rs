//! Calendar operations.
//!
//! Each operation acquires a fresh provider session, performs one logical
//! action and reports the outcome as a [`ToolResponse`]. Nothing is cached
//! between calls, so a broken credential on one call has no effect on the
//! next.

mod events;
mod listing;

use std::sync::Arc;

use calagent_core::CurrentTime;
use calagent_providers::google::ServiceAccountConnector;
use calagent_providers::{ApiEvent, ClientConnector, Session};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ToolsConfig;

/// Reported whenever a session cannot be opened.
pub const AUTH_FAILURE_MESSAGE: &str =
    "Failed to authenticate with Google Calendar. Please check credentials.";

/// Provider wire format for a local time paired with a `timeZone`.
const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Fields of a new event.
///
/// Optional fields left empty are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub summary: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub attendees: Option<Vec<String>>,
}

impl NewEvent {
    pub fn new(
        summary: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            summary: summary.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            ..Default::default()
        }
    }
}

/// Changes to an existing event. `None` and empty values leave the field
/// as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventChanges {
    pub summary: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub attendees: Option<Vec<String>>,
}

/// The calendar operations, bound to one configuration and one way of
/// opening provider sessions.
#[derive(Clone)]
pub struct CalendarTools {
    config: ToolsConfig,
    connector: Arc<dyn ClientConnector>,
}

impl CalendarTools {
    pub fn new(config: ToolsConfig, connector: impl ClientConnector + 'static) -> Self {
        Self {
            config,
            connector: Arc::new(connector),
        }
    }

    /// Tools backed by Google Calendar with the configured service account.
    pub fn from_config(config: ToolsConfig) -> Self {
        let connector = ServiceAccountConnector::new(config.credential_settings());
        Self::new(config, connector)
    }

    pub fn config(&self) -> &ToolsConfig {
        &self.config
    }

    /// The machine's local time, for agents resolving relative dates.
    pub fn current_time(&self) -> CurrentTime {
        CurrentTime::now()
    }

    async fn session(&self, operation: &str) -> Option<Session> {
        match self.connector.connect().await {
            Ok(session) => {
                debug!(operation, calendar_id = %session.calendar_id, "session opened");
                Some(session)
            }
            Err(e) if e.is_credential_failure() => {
                warn!(operation, "credential could not be loaded: {}", e);
                None
            }
            Err(e) => {
                warn!(operation, "authentication failed: {}", e);
                None
            }
        }
    }
}

impl std::fmt::Debug for CalendarTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarTools")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Treats empty strings as absent.
fn supplied(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn local_datetime(value: NaiveDateTime) -> String {
    value.format(LOCAL_DATETIME_FORMAT).to_string()
}

/// Copies the optional descriptive fields onto an event, skipping empty ones.
fn apply_details(
    event: &mut ApiEvent,
    description: Option<&str>,
    location: Option<&str>,
    attendees: Option<&[String]>,
) {
    if let Some(description) = supplied(description) {
        event.description = Some(description.to_string());
    }
    if let Some(location) = supplied(location) {
        event.location = Some(location.to_string());
    }
    if let Some(attendees) = attendees.filter(|a| !a.is_empty()) {
        event.set_attendee_emails(attendees.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BrokenCredentials, MemoryBackend, StaticConnector};
    use chrono::NaiveDate;

    #[test]
    fn local_datetime_has_no_offset() {
        let value = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        assert_eq!(local_datetime(value), "2024-03-15T09:05:00");
    }

    #[test]
    fn details_skip_empty_values() {
        let mut event = ApiEvent {
            location: Some("Room 4".into()),
            ..Default::default()
        };

        apply_details(&mut event, Some(""), Some(""), Some(&[]));
        assert_eq!(event.description, None);
        assert_eq!(event.location.as_deref(), Some("Room 4"));
        assert_eq!(event.attendees, None);

        apply_details(
            &mut event,
            Some("Agenda"),
            None,
            Some(&["a@example.com".to_string()]),
        );
        assert_eq!(event.description.as_deref(), Some("Agenda"));
        assert_eq!(event.attendees.unwrap()[0].email.as_deref(), Some("a@example.com"));
    }

    #[test]
    fn changes_deserialize_from_partial_json() {
        let changes: EventChanges = serde_json::from_str(r#"{"summary": "New title"}"#).unwrap();
        assert_eq!(changes.summary.as_deref(), Some("New title"));
        assert_eq!(changes.start_time, None);
        assert_eq!(changes.attendees, None);
    }

    #[tokio::test]
    async fn session_opens_per_call() {
        let connector = StaticConnector::new(MemoryBackend::new());
        let tools = CalendarTools::new(ToolsConfig::default(), connector.clone());

        assert!(tools.session("first").await.is_some());
        assert!(tools.session("second").await.is_some());
        assert_eq!(connector.connects(), 2);
    }

    #[tokio::test]
    async fn broken_credentials_yield_no_session() {
        let tools = CalendarTools::new(ToolsConfig::default(), BrokenCredentials);
        assert!(tools.session("create_event").await.is_none());
    }

    #[test]
    fn current_time_shapes() {
        let tools = CalendarTools::new(ToolsConfig::default(), BrokenCredentials);
        let now = tools.current_time();
        assert_eq!(now.current_time.len(), "2024-03-15 09:05:00".len());
        assert_eq!(now.formatted_date.len(), "15-03-2024".len());
    }
}
