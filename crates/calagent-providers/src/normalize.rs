//! Conversion from provider events to display-ready records.

use calagent_core::{EventRecord, EventTime, UNTITLED_EVENT, format_event_time};

use crate::model::{ApiEvent, ApiEventTime};

/// Converts a provider event to an [`EventRecord`].
///
/// Missing summary falls back to [`UNTITLED_EVENT`]; missing location,
/// description and link become empty strings; attendees without an email
/// are dropped.
pub fn normalize_event(event: &ApiEvent) -> EventRecord {
    let mut record = EventRecord::new(
        event.id.clone(),
        event.summary.as_deref().unwrap_or(UNTITLED_EVENT),
    );

    record.start = display_time(event.start.as_ref());
    record.end = display_time(event.end.as_ref());
    record.start_time = event
        .start
        .as_ref()
        .and_then(|t| EventTime::from_fields(t.date_time.as_deref(), t.date.as_deref()));
    record.location = event.location.clone().unwrap_or_default();
    record.description = event.description.clone().unwrap_or_default();
    record.attendees = event
        .attendees
        .iter()
        .flatten()
        .filter_map(|attendee| attendee.email.clone())
        .collect();
    record.link = event.html_link.clone().unwrap_or_default();

    record
}

/// Normalizes a batch of events, keeping provider order.
pub fn normalize_events(events: &[ApiEvent]) -> Vec<EventRecord> {
    events.iter().map(normalize_event).collect()
}

fn display_time(time: Option<&ApiEventTime>) -> String {
    match time {
        Some(t) => format_event_time(t.date_time.as_deref(), t.date.as_deref()),
        None => format_event_time(None, None),
    }
}
