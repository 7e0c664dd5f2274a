//! Command implementations.
//!
//! Every command prints JSON to stdout and reports whether the outcome was a
//! success, which becomes the process exit code.

pub mod calendar;
pub mod config;

use serde::Serialize;

use crate::error::ClientResult;

/// Prints a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> ClientResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
