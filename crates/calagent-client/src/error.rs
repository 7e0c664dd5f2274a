//! Client error types.

use calagent_tools::ToolError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that stop the CLI before or after a tool runs.
///
/// A tool that runs and fails is not one of these: its error envelope is
/// printed and the exit code reflects it.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("invalid JSON arguments: {0}")]
    Arguments(#[source] serde_json::Error),

    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}
