//! Normalized, display-ready event records.

use serde::{Deserialize, Serialize};

use crate::time::EventTime;

/// Summary used when the provider event has no title.
pub const UNTITLED_EVENT: &str = "Untitled Event";

/// A provider-agnostic, display-ready calendar event.
///
/// Records are rebuilt on every query and never persisted. `start_time`
/// keeps the canonical start so callers can order events chronologically
/// without re-parsing the display strings; it is not serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Provider-assigned identifier.
    pub id: Option<String>,
    /// Event title.
    pub summary: String,
    /// Formatted start time.
    pub start: String,
    /// Formatted end time.
    pub end: String,
    /// Location, empty when absent.
    pub location: String,
    /// Description, empty when absent.
    pub description: String,
    /// Attendee email addresses.
    pub attendees: Vec<String>,
    /// Web link to the event, empty when absent.
    pub link: String,
    /// Label of the calendar this event came from (aggregated listings only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar: Option<String>,
    #[serde(skip)]
    pub start_time: Option<EventTime>,
}

impl EventRecord {
    /// Creates a record with the given id and summary and empty details.
    pub fn new(id: Option<String>, summary: impl Into<String>) -> Self {
        Self {
            id,
            summary: summary.into(),
            start: String::new(),
            end: String::new(),
            location: String::new(),
            description: String::new(),
            attendees: Vec::new(),
            link: String::new(),
            calendar: None,
            start_time: None,
        }
    }

    /// Tags this record with the label of its source calendar.
    pub fn with_calendar(mut self, label: impl Into<String>) -> Self {
        self.calendar = Some(label.into());
        self
    }
}

/// Sorts records by their canonical start, earliest first.
///
/// The sort is stable. Records without a start sort last.
pub fn sort_chronologically(records: &mut [EventRecord]) {
    records.sort_by_key(|record| match record.start_time {
        Some(time) => (false, Some(time.sort_key())),
        None => (true, None),
    });
}
