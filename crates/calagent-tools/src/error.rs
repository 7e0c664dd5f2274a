//! Tool-layer error types.
//!
//! Calendar operations never fail with these: they report failures inside
//! the result envelope. `ToolError` covers what happens around them, such as
//! loading configuration or decoding an agent's arguments.

use thiserror::Error;

/// Result type for tool-layer operations.
pub type ToolResult<T> = Result<T, ToolError>;

#[derive(Debug, Error)]
pub enum ToolError {
    /// Configuration file missing, unreadable or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The agent asked for a tool that does not exist.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The agent's arguments did not match the tool's parameters.
    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("failed to serialize tool result: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ToolError {
    pub fn invalid_arguments(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            message: message.into(),
        }
    }
}
