//! Calendar tools for assistant agents.
//!
//! [`CalendarTools`] exposes create, edit, delete and list operations over a
//! calendar provider. Every operation answers with a [`ToolResponse`]
//! envelope, never with an error: a credential that cannot be loaded, a date
//! that cannot be read and a provider failure all come back as
//! `status: "error"` with a message an agent can relay.
//!
//! [`ToolRegistry`] advertises the operations as named tools with JSON
//! schemas and dispatches calls by name.

pub mod config;
pub mod envelope;
pub mod error;
pub mod ops;
pub mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{CalendarEntry, ToolsConfig};
pub use envelope::{Status, ToolResponse};
pub use error::{ToolError, ToolResult};
pub use ops::{AUTH_FAILURE_MESSAGE, CalendarTools, EventChanges, NewEvent};
pub use registry::{ToolRegistry, ToolSpec};
