//! Calendar commands.

use calagent_tools::{CalendarTools, EventChanges, NewEvent, ToolRegistry, ToolResponse};
use serde_json::Value;

use super::print_json;
use crate::cli::{DetailArgs, WindowArgs};
use crate::error::{ClientError, ClientResult};

fn report(response: &ToolResponse) -> ClientResult<bool> {
    print_json(response)?;
    Ok(response.is_success())
}

/// Create an event.
pub async fn create(
    tools: &CalendarTools,
    summary: String,
    start_time: String,
    end_time: String,
    details: DetailArgs,
) -> ClientResult<bool> {
    let request = NewEvent {
        attendees: details.attendees(),
        description: details.description,
        location: details.location,
        ..NewEvent::new(summary, start_time, end_time)
    };
    report(&tools.create_event(&request).await)
}

/// Edit an event.
pub async fn edit(
    tools: &CalendarTools,
    event_id: &str,
    summary: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    details: DetailArgs,
) -> ClientResult<bool> {
    let changes = EventChanges {
        summary,
        start_time,
        end_time,
        attendees: details.attendees(),
        description: details.description,
        location: details.location,
    };
    report(&tools.edit_event(event_id, &changes).await)
}

/// Delete an event.
pub async fn delete(tools: &CalendarTools, event_id: &str) -> ClientResult<bool> {
    report(&tools.delete_event(event_id).await)
}

/// List one calendar.
pub async fn list(tools: &CalendarTools, calendar_id: &str, window: &WindowArgs) -> ClientResult<bool> {
    report(
        &tools
            .list_events(calendar_id, &window.start_date, window.days)
            .await,
    )
}

/// List every configured calendar.
pub async fn list_all(tools: &CalendarTools, window: &WindowArgs) -> ClientResult<bool> {
    report(&tools.list_all_events(&window.start_date, window.days).await)
}

/// Show the current local time.
pub fn now(tools: &CalendarTools) -> ClientResult<bool> {
    print_json(&tools.current_time())?;
    Ok(true)
}

/// Print the tool schemas.
pub fn specs() -> ClientResult<bool> {
    print_json(&ToolRegistry::specs())?;
    Ok(true)
}

/// Invoke a tool by name, as an agent host would.
pub async fn call(registry: &ToolRegistry, name: &str, args: &str) -> ClientResult<bool> {
    let args: Value = serde_json::from_str(args).map_err(ClientError::Arguments)?;
    let result = registry.call_json(name, args).await;
    print_json(&result)?;
    Ok(result.get("status").and_then(Value::as_str) != Some("error"))
}
