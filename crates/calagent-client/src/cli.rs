//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// calagent - calendar tools for assistant agents
#[derive(Debug, Parser)]
#[command(name = "calagent")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CALAGENT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output on stderr
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an event on the default calendar
    Create {
        /// Event title
        summary: String,
        /// Start, e.g. "2024-03-15 14:00"
        start_time: String,
        /// End, e.g. "2024-03-15 15:00"
        end_time: String,
        #[command(flatten)]
        details: DetailArgs,
    },

    /// Change fields of an existing event
    Edit {
        /// Event id
        event_id: String,
        /// New title
        #[arg(long)]
        summary: Option<String>,
        /// New start time
        #[arg(long)]
        start: Option<String>,
        /// New end time
        #[arg(long)]
        end: Option<String>,
        #[command(flatten)]
        details: DetailArgs,
    },

    /// Delete an event from the default calendar
    Delete {
        /// Event id
        event_id: String,
    },

    /// List events of one calendar
    List {
        /// Calendar id
        #[arg(long, default_value = "primary")]
        calendar: String,
        #[command(flatten)]
        window: WindowArgs,
    },

    /// List events across all configured calendars
    ListAll {
        #[command(flatten)]
        window: WindowArgs,
    },

    /// Show the current local time
    Now,

    /// Print the tool schemas as JSON
    Tools,

    /// Invoke a tool by name with JSON arguments
    Call {
        /// Tool name, e.g. list_events
        name: String,
        /// Arguments as a JSON object
        #[arg(default_value = "{}")]
        args: String,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Optional event details shared by create and edit.
#[derive(Debug, Clone, Default, Args)]
pub struct DetailArgs {
    /// Event description
    #[arg(long)]
    pub description: Option<String>,

    /// Event location
    #[arg(long)]
    pub location: Option<String>,

    /// Attendee email (can be repeated)
    #[arg(long = "attendee", action = clap::ArgAction::Append)]
    pub attendees: Vec<String>,
}

impl DetailArgs {
    /// Attendees as an optional list; none given means unchanged.
    pub fn attendees(&self) -> Option<Vec<String>> {
        (!self.attendees.is_empty()).then(|| self.attendees.clone())
    }
}

/// The listing window.
#[derive(Debug, Clone, Default, Args)]
pub struct WindowArgs {
    /// First day, YYYY-MM-DD (default: now)
    #[arg(long, default_value = "")]
    pub start_date: String,

    /// Number of days to list
    #[arg(long)]
    pub days: Option<i64>,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
