//! Single-calendar and aggregated listings.

use calagent_core::{EventRecord, TimeWindow, parse_list_date, sort_chronologically};
use calagent_providers::{EventQuery, normalize_events};
use chrono::{DateTime, NaiveTime, Utc};
use tracing::{debug, info, warn};

use super::{AUTH_FAILURE_MESSAGE, CalendarTools};
use crate::envelope::ToolResponse;

impl CalendarTools {
    /// Lists events of one calendar over `days` whole days.
    ///
    /// A blank `start_date` means now. `days` defaults to one; values
    /// below one are treated as one. At most `max_results` events are
    /// returned, further pages are not fetched. The envelope always carries
    /// an `events` array, empty on failure.
    pub async fn list_events(
        &self,
        calendar_id: &str,
        start_date: &str,
        days: Option<i64>,
    ) -> ToolResponse {
        info!(calendar_id, start_date, ?days, "listing events");

        let Some(session) = self.session("list_events").await else {
            return ToolResponse::error(AUTH_FAILURE_MESSAGE).with_events(Vec::new());
        };

        let start = match window_start(start_date) {
            Some(start) => start,
            None => {
                return ToolResponse::error(format!(
                    "Invalid date format: {}. Use YYYY-MM-DD format.",
                    start_date
                ))
                .with_events(Vec::new());
            }
        };

        let days = days.unwrap_or(1);
        let Some(window) = TimeWindow::for_days(start, days) else {
            return ToolResponse::error(format!(
                "Invalid day count: {}. The listing window ends out of range.",
                days
            ))
            .with_events(Vec::new());
        };
        debug!(
            calendar_id,
            start = %window.start,
            end = %window.end,
            days = window.days(),
            "query window"
        );

        let query = EventQuery::new(window).with_max_results(self.config.max_results);
        match session.backend.list_events(calendar_id, &query).await {
            Ok(mut events) => {
                events.truncate(self.config.max_results);
                info!(calendar_id, count = events.len(), "events listed");
                let message = if events.is_empty() {
                    "No upcoming events found.".to_string()
                } else {
                    format!("Found {} event(s).", events.len())
                };
                ToolResponse::success(message).with_events(normalize_events(&events))
            }
            Err(e) => {
                warn!(calendar_id, "failed to list events: {}", e);
                ToolResponse::error(format!("Error fetching events: {}", e)).with_events(Vec::new())
            }
        }
    }

    /// Lists events across every configured calendar, tagging each with its
    /// calendar label and ordering the result by start.
    ///
    /// A calendar that fails to list contributes nothing; the others are
    /// still reported.
    pub async fn list_all_events(&self, start_date: &str, days: Option<i64>) -> ToolResponse {
        let calendars = &self.config.calendars;
        info!(calendars = calendars.len(), start_date, ?days, "listing all calendars");

        let mut all: Vec<EventRecord> = Vec::new();
        for calendar in calendars {
            let response = self.list_events(&calendar.id, start_date, days).await;
            if !response.is_success() {
                warn!(calendar_id = %calendar.id, "skipping calendar: {}", response.message);
            }
            all.extend(
                response
                    .events
                    .unwrap_or_default()
                    .into_iter()
                    .map(|record| record.with_calendar(&calendar.label)),
            );
        }

        sort_chronologically(&mut all);
        ToolResponse::success(format!(
            "Found {} event(s) across {} calendar(s).",
            all.len(),
            calendars.len()
        ))
        .with_events(all)
    }
}

/// Midnight UTC of the given `YYYY-MM-DD` date, or now when blank.
fn window_start(start_date: &str) -> Option<DateTime<Utc>> {
    if start_date.trim().is_empty() {
        return Some(Utc::now());
    }
    parse_list_date(start_date).map(|date| date.and_time(NaiveTime::MIN).and_utc())
}
