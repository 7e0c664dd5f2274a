//! Create, edit and delete.

use calagent_core::parse_datetime;
use calagent_providers::{ApiEvent, ApiEventTime, Session};
use tracing::{debug, info, warn};

use super::{AUTH_FAILURE_MESSAGE, CalendarTools, EventChanges, NewEvent};
use super::{apply_details, local_datetime, supplied};
use crate::envelope::ToolResponse;

const INVALID_DATETIME_MESSAGE: &str =
    "Invalid date/time format. Please use YYYY-MM-DD HH:MM format.";
const INVALID_START_MESSAGE: &str =
    "Invalid start time format. Please use YYYY-MM-DD HH:MM format.";
const INVALID_END_MESSAGE: &str = "Invalid end time format. Please use YYYY-MM-DD HH:MM format.";

impl CalendarTools {
    /// Creates an event on the default calendar.
    ///
    /// Times are read in any supported layout and sent as local times in
    /// the account's zone. Start after end is passed through to the
    /// provider unchecked.
    pub async fn create_event(&self, request: &NewEvent) -> ToolResponse {
        info!(summary = %request.summary, "creating event");

        let Some(session) = self.session("create_event").await else {
            return ToolResponse::error(AUTH_FAILURE_MESSAGE);
        };

        let (Some(start), Some(end)) = (
            parse_datetime(&request.start_time),
            parse_datetime(&request.end_time),
        ) else {
            debug!(
                start = %request.start_time,
                end = %request.end_time,
                "unrecognized event times"
            );
            return ToolResponse::error(INVALID_DATETIME_MESSAGE);
        };

        let timezone = self.account_timezone(&session).await;
        let mut event = ApiEvent {
            summary: Some(request.summary.clone()),
            start: Some(ApiEventTime::zoned(local_datetime(start), &timezone)),
            end: Some(ApiEventTime::zoned(local_datetime(end), &timezone)),
            ..Default::default()
        };
        apply_details(
            &mut event,
            request.description.as_deref(),
            request.location.as_deref(),
            request.attendees.as_deref(),
        );

        match session
            .backend
            .insert_event(&session.calendar_id, &event)
            .await
        {
            Ok(created) => {
                let event_id = created.id.unwrap_or_default();
                info!(%event_id, calendar_id = %session.calendar_id, "event created");
                ToolResponse::success("Event created successfully")
                    .with_event_id(event_id)
                    .with_event_link(created.html_link.unwrap_or_default())
            }
            Err(e) => {
                warn!("failed to create event: {}", e);
                ToolResponse::error(format!("Error creating event: {}", e))
            }
        }
    }

    /// Amends an existing event on the default calendar.
    ///
    /// The event is fetched, the supplied fields are applied and the whole
    /// event is sent back, so fields this crate does not know about survive.
    /// New times inherit the event's existing zone.
    pub async fn edit_event(&self, event_id: &str, changes: &EventChanges) -> ToolResponse {
        info!(event_id, "editing event");

        let Some(session) = self.session("edit_event").await else {
            return ToolResponse::error(AUTH_FAILURE_MESSAGE);
        };

        let mut event = match session
            .backend
            .get_event(&session.calendar_id, event_id)
            .await
        {
            Ok(event) => event,
            Err(e) => {
                if e.is_not_found() {
                    debug!(event_id, "no such event: {}", e);
                } else {
                    warn!(event_id, "event lookup failed: {}", e);
                }
                return ToolResponse::error(format!(
                    "Event with ID {} not found in calendar {}.",
                    event_id, session.calendar_id
                ));
            }
        };

        let start = match supplied(changes.start_time.as_deref()).map(parse_datetime) {
            Some(None) => return ToolResponse::error(INVALID_START_MESSAGE),
            parsed => parsed.flatten(),
        };
        let end = match supplied(changes.end_time.as_deref()).map(parse_datetime) {
            Some(None) => return ToolResponse::error(INVALID_END_MESSAGE),
            parsed => parsed.flatten(),
        };

        if let Some(summary) = supplied(changes.summary.as_deref()) {
            event.summary = Some(summary.to_string());
        }

        let timezone = event
            .start_time_zone()
            .unwrap_or(self.config.default_timezone.as_str())
            .to_string();
        if let Some(start) = start {
            event.start = Some(ApiEventTime::zoned(local_datetime(start), &timezone));
        }
        if let Some(end) = end {
            event.end = Some(ApiEventTime::zoned(local_datetime(end), &timezone));
        }

        apply_details(
            &mut event,
            changes.description.as_deref(),
            changes.location.as_deref(),
            changes.attendees.as_deref(),
        );

        match session
            .backend
            .update_event(&session.calendar_id, event_id, &event)
            .await
        {
            Ok(updated) => {
                info!(event_id, "event updated");
                ToolResponse::success("Event updated successfully")
                    .with_event_id(updated.id.unwrap_or_else(|| event_id.to_string()))
                    .with_event_link(updated.html_link.unwrap_or_default())
            }
            Err(e) => {
                warn!(event_id, "failed to update event: {}", e);
                ToolResponse::error(format!("Error updating event: {}", e))
            }
        }
    }

    /// Deletes an event from the default calendar.
    ///
    /// A missing event is reported like any other provider failure.
    pub async fn delete_event(&self, event_id: &str) -> ToolResponse {
        info!(event_id, "deleting event");

        let Some(session) = self.session("delete_event").await else {
            return ToolResponse::error(AUTH_FAILURE_MESSAGE);
        };

        match session
            .backend
            .delete_event(&session.calendar_id, event_id)
            .await
        {
            Ok(()) => {
                info!(event_id, "event deleted");
                ToolResponse::success(format!("Event {} has been deleted successfully", event_id))
                    .with_event_id(event_id)
            }
            Err(e) => {
                warn!(event_id, "failed to delete event: {}", e);
                ToolResponse::error(format!("Error deleting event: {}", e))
            }
        }
    }

    /// The account's `timezone` setting, or the configured default when it
    /// cannot be read.
    async fn account_timezone(&self, session: &Session) -> String {
        match session.backend.timezone_setting().await {
            Ok(Some(timezone)) => timezone,
            Ok(None) => self.config.default_timezone.clone(),
            Err(e) => {
                warn!(
                    "timezone lookup failed, using {}: {}",
                    self.config.default_timezone, e
                );
                self.config.default_timezone.clone()
            }
        }
    }
}
