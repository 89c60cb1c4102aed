//! Configuration validation
//!
//! This module provides validation logic for configuration files.

use crate::config::types::{Command, Config};
use crate::error::{ConfigError, ConfigResult};

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    for (name, command) in config.sorted_commands() {
        validate_command(config, name, command)?;
    }

    Ok(())
}

/// Validate a single command
pub fn validate_command(config: &Config, name: &str, command: &Command) -> ConfigResult<()> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid(format!(
            "Command name '{}' must be non-empty and contain no whitespace",
            name
        )));
    }

    // Restrictions must refer to declared environments
    for environment in &command.environments {
        if !config.environments.contains(environment) {
            return Err(ConfigError::UndeclaredEnvironment {
                command: name.to_string(),
                environment: environment.clone(),
            });
        }
    }

    Ok(())
}
