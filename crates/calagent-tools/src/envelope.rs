//! The uniform result envelope every tool returns.

use calagent_core::EventRecord;
use serde::{Deserialize, Serialize};

/// Outcome of a tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Result of a calendar operation, shaped for an agent to read.
///
/// Operations never fail outside this envelope: provider, credential and
/// input errors all come back as `status: "error"` with a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub status: Status,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<EventRecord>>,
}

impl ToolResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Status::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Status::Error, message)
    }

    fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            event_id: None,
            event_link: None,
            events: None,
        }
    }

    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    pub fn with_event_link(mut self, event_link: impl Into<String>) -> Self {
        self.event_link = Some(event_link.into());
        self
    }

    pub fn with_events(mut self, events: Vec<EventRecord>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// The listed events, or an empty slice for non-listing responses.
    pub fn events(&self) -> &[EventRecord] {
        self.events.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_shape() {
        let response = ToolResponse::error("Error deleting event: gone");
        insta::assert_json_snapshot!(response, @r#"
        {
          "status": "error",
          "message": "Error deleting event: gone"
        }
        "#);
    }

    #[test]
    fn mutation_envelope_shape() {
        let response = ToolResponse::success("Event created successfully")
            .with_event_id("evt-1")
            .with_event_link("https://calendar.example/evt-1");
        insta::assert_json_snapshot!(response, @r#"
        {
          "status": "success",
          "message": "Event created successfully",
          "event_id": "evt-1",
          "event_link": "https://calendar.example/evt-1"
        }
        "#);
    }

    #[test]
    fn listing_envelope_keeps_empty_events() {
        let response = ToolResponse::error("Error fetching events: boom").with_events(Vec::new());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["events"], serde_json::json!([]));
        assert!(!response.is_success());
        assert!(response.events().is_empty());
    }

    #[test]
    fn envelope_parses_back() {
        let json = r#"{"status":"success","message":"Found 0 event(s).","events":[]}"#;
        let response: ToolResponse = serde_json::from_str(json).unwrap();
        assert!(response.is_success());
        assert_eq!(response.events, Some(Vec::new()));
    }
}
