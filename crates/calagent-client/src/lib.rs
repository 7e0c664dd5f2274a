//! The `calagent` command-line interface.
//!
//! Runs the calendar tools from a shell and prints their JSON envelopes,
//! mainly for checking credentials and configuration by hand.

pub mod cli;
pub mod commands;
pub mod error;

use calagent_tools::{CalendarTools, ToolRegistry, ToolsConfig};
use tracing::debug;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};

use cli::{Command, ConfigAction};

/// Loads the configuration named on the command line, or the default file.
pub fn load_config(cli: &Cli) -> ClientResult<ToolsConfig> {
    debug!(path = ?cli.config, "loading configuration");
    let config = match cli.config {
        Some(ref path) => ToolsConfig::load_from(path)?,
        None => ToolsConfig::load()?,
    };
    Ok(config)
}

/// Runs the parsed command. Returns whether it succeeded.
pub async fn run(cli: Cli) -> ClientResult<bool> {
    let config = load_config(&cli)?;
    let tools = CalendarTools::from_config(config.clone());

    match cli.command {
        Command::Create {
            summary,
            start_time,
            end_time,
            details,
        } => commands::calendar::create(&tools, summary, start_time, end_time, details).await,
        Command::Edit {
            event_id,
            summary,
            start,
            end,
            details,
        } => commands::calendar::edit(&tools, &event_id, summary, start, end, details).await,
        Command::Delete { event_id } => commands::calendar::delete(&tools, &event_id).await,
        Command::List { calendar, window } => {
            commands::calendar::list(&tools, &calendar, &window).await
        }
        Command::ListAll { window } => commands::calendar::list_all(&tools, &window).await,
        Command::Now => commands::calendar::now(&tools),
        Command::Tools => commands::calendar::specs(),
        Command::Call { name, args } => {
            commands::calendar::call(&ToolRegistry::new(tools), &name, &args).await
        }
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(),
        },
    }
}
