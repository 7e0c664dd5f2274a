//! Configuration commands.

use calagent_tools::ToolsConfig;

use crate::error::{ClientError, ClientResult};

/// Dump the effective configuration as TOML.
pub fn dump(config: &ToolsConfig) -> ClientResult<bool> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", ToolsConfig::default_path().display());
    println!("{}", toml_str);
    Ok(true)
}

/// Validate the configuration and check the credential variable is set.
pub fn validate(config: &ToolsConfig) -> ClientResult<bool> {
    config.validate()?;

    match std::env::var(&config.credentials_env) {
        Ok(value) if !value.trim().is_empty() => {
            println!("Credential variable {} is set.", config.credentials_env);
        }
        _ => {
            println!(
                "Credential variable {} is not set; calendar calls will fail to authenticate.",
                config.credentials_env
            );
        }
    }

    println!("Configuration is valid.");
    Ok(true)
}

/// Show the configuration file path.
pub fn path() -> ClientResult<bool> {
    println!("config: {}", ToolsConfig::default_path().display());
    Ok(true)
}
