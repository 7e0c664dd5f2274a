//! Named tools with JSON-schema parameters, for agent hosts that dispatch
//! by name.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::envelope::{Status, ToolResponse};
use crate::error::{ToolError, ToolResult};
use crate::ops::{CalendarTools, EventChanges, NewEvent};

/// A tool as advertised to an agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON schema of the argument object.
    pub parameters: Value,
}

#[derive(Debug, Deserialize)]
struct EditEventArgs {
    event_id: String,
    #[serde(flatten)]
    changes: EventChanges,
}

#[derive(Debug, Deserialize)]
struct DeleteEventArgs {
    event_id: String,
}

#[derive(Debug, Deserialize)]
struct ListEventsArgs {
    calendar_id: String,
    #[serde(default)]
    start_date: String,
    #[serde(default)]
    days: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ListAllEventsArgs {
    #[serde(default)]
    start_date: String,
    #[serde(default)]
    days: Option<i64>,
}

/// Dispatches tool calls by name onto [`CalendarTools`].
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: CalendarTools,
}

impl ToolRegistry {
    pub fn new(tools: CalendarTools) -> Self {
        Self { tools }
    }

    /// Every tool this registry can dispatch.
    pub fn specs() -> Vec<ToolSpec> {
        let time_hint = "Date and time, e.g. 2024-03-15 14:00, 03/15/2024 2:00 PM or March 15, 2024 14:00";
        vec![
            ToolSpec {
                name: "create_event",
                description: "Create an event on the default calendar.",
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "summary": { "type": "string", "description": "Event title" },
                        "start_time": { "type": "string", "description": time_hint },
                        "end_time": { "type": "string", "description": time_hint },
                        "description": { "type": "string" },
                        "location": { "type": "string" },
                        "attendees": { "type": "array", "items": { "type": "string" }, "description": "Attendee email addresses" }
                    },
                    "required": ["summary", "start_time", "end_time"]
                }),
            },
            ToolSpec {
                name: "edit_event",
                description: "Change fields of an existing event on the default calendar. Omitted fields are kept.",
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "event_id": { "type": "string" },
                        "summary": { "type": "string" },
                        "start_time": { "type": "string", "description": time_hint },
                        "end_time": { "type": "string", "description": time_hint },
                        "description": { "type": "string" },
                        "location": { "type": "string" },
                        "attendees": { "type": "array", "items": { "type": "string" } }
                    },
                    "required": ["event_id"]
                }),
            },
            ToolSpec {
                name: "delete_event",
                description: "Delete an event from the default calendar.",
                parameters: json!({
                    "type": "object",
                    "properties": { "event_id": { "type": "string" } },
                    "required": ["event_id"]
                }),
            },
            ToolSpec {
                name: "list_events",
                description: "List events of one calendar over a number of days.",
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "calendar_id": { "type": "string" },
                        "start_date": { "type": "string", "description": "YYYY-MM-DD; empty for now" },
                        "days": { "type": "integer", "minimum": 1, "default": 1 }
                    },
                    "required": ["calendar_id"]
                }),
            },
            ToolSpec {
                name: "list_all_events",
                description: "List events across all known calendars, ordered by start.",
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "start_date": { "type": "string", "description": "YYYY-MM-DD; empty for now" },
                        "days": { "type": "integer", "minimum": 1, "default": 1 }
                    }
                }),
            },
            ToolSpec {
                name: "get_current_time",
                description: "Current local date and time.",
                parameters: json!({ "type": "object", "properties": {} }),
            },
        ]
    }

    /// Runs the named tool.
    ///
    /// Calendar failures come back as an error envelope inside `Ok`; `Err`
    /// means the call itself could not be dispatched.
    pub async fn call(&self, name: &str, args: Value) -> ToolResult<Value> {
        debug!(tool = name, "dispatching tool call");
        let args = if args.is_null() { json!({}) } else { args };

        match name {
            "create_event" => {
                let request: NewEvent = parse_args(name, args)?;
                respond(self.tools.create_event(&request).await)
            }
            "edit_event" => {
                let EditEventArgs { event_id, changes } = parse_args(name, args)?;
                respond(self.tools.edit_event(&event_id, &changes).await)
            }
            "delete_event" => {
                let DeleteEventArgs { event_id } = parse_args(name, args)?;
                respond(self.tools.delete_event(&event_id).await)
            }
            "list_events" => {
                let ListEventsArgs {
                    calendar_id,
                    start_date,
                    days,
                } = parse_args(name, args)?;
                respond(
                    self.tools
                        .list_events(&calendar_id, &start_date, days)
                        .await,
                )
            }
            "list_all_events" => {
                let ListAllEventsArgs { start_date, days } = parse_args(name, args)?;
                respond(self.tools.list_all_events(&start_date, days).await)
            }
            "get_current_time" => Ok(serde_json::to_value(self.tools.current_time())?),
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    /// Like [`call`](Self::call), but dispatch errors are folded into an
    /// error envelope so the caller always receives the same shape.
    pub async fn call_json(&self, name: &str, args: Value) -> Value {
        match self.call(name, args).await {
            Ok(value) => value,
            Err(e) => json!({ "status": Status::Error, "message": e.to_string() }),
        }
    }
}

fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> ToolResult<T> {
    serde_json::from_value(args).map_err(|e| ToolError::invalid_arguments(tool, e.to_string()))
}

fn respond(response: ToolResponse) -> ToolResult<Value> {
    Ok(serde_json::to_value(response)?)
}
