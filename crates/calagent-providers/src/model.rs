//! Provider-native event representation.
//!
//! These types mirror the Google Calendar v3 `Event` resource closely enough
//! to read, build and amend events. Fields this crate does not interpret are
//! kept in `extra` so that a fetch-modify-update cycle sends them back
//! untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Start or end of a provider event.
///
/// Exactly one of `date_time` (precise instant) or `date` (whole day) is
/// normally set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiEventTime {
    /// A precise local time interpreted in the given IANA zone.
    pub fn zoned(date_time: impl Into<String>, time_zone: impl Into<String>) -> Self {
        Self {
            date_time: Some(date_time.into()),
            time_zone: Some(time_zone.into()),
            ..Default::default()
        }
    }

    /// A whole-day date.
    pub fn all_day(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            ..Default::default()
        }
    }
}

/// An event attendee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiAttendee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiAttendee {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            extra: Map::new(),
        }
    }
}

/// A calendar event as the provider sends and accepts it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    /// Assigned by the provider on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<ApiEventTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<ApiEventTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<ApiAttendee>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiEvent {
    /// Replaces the attendee list with the given email addresses.
    pub fn set_attendee_emails<I, S>(&mut self, emails: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attendees = Some(emails.into_iter().map(ApiAttendee::with_email).collect());
    }

    /// The IANA zone of the event start, if the provider recorded one.
    pub fn start_time_zone(&self) -> Option<&str> {
        self.start.as_ref()?.time_zone.as_deref()
    }
}

/// Response body of `events.list`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventList {
    #[serde(default)]
    pub items: Vec<ApiEvent>,
    pub next_page_token: Option<String>,
}

/// A single user setting, as returned by `settings.list`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSetting {
    pub id: String,
    pub value: Option<String>,
}

/// Response body of `settings.list`.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsList {
    #[serde(default)]
    pub items: Vec<ApiSetting>,
}

impl SettingsList {
    /// The value of the `timezone` setting, if present.
    pub fn timezone(&self) -> Option<&str> {
        self.items
            .iter()
            .find(|setting| setting.id == "timezone")
            .and_then(|setting| setting.value.as_deref())
    }
}
