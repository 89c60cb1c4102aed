//! Configuration file parsing and discovery

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult, DoshError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &["dosh.yaml", "dosh.yml"];

/// Environment file loaded from the configuration directory
pub const ENV_FILE_NAME: &str = ".env";

/// Starter configuration written by `dosh init`
pub const CONFIG_TEMPLATE: &str = r#"environments:
  - DEV
  - PROD
  - TEST
aliases:
  docker: docker-compose -f docker-compose.yml -f docker-compose.${ENV}.yml
commands:
  start:
    help_text: Create and start containers
    run: RUN ${docker} up -d ${ARGS}
  build:
    help_text: Build or rebuild services
    run: RUN ${docker} build ${ARGS}
  shell:
    run: RUN ${docker} run --rm backend-shell bash
  initdb:
    environments:
      - DEV
    help_text: Load fixtures for development environment
    run:
      - MKDIR fixtures
      - RUN ${docker} run --rm backend-shell python manage.py initdb
      - PRINT Fixtures loaded
"#;

/// Find the configuration file by searching current and parent directories
pub fn find_config_file() -> ConfigResult<PathBuf> {
    find_config_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the configuration file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            searched_paths.push(config_path.display().to_string());

            if config_path.is_file() {
                return Ok(config_path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(ConfigError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Parse a configuration file from a path
pub fn parse_config_file(path: &Path) -> Result<Config, DoshError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::File {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    parse_config(&contents)
}

/// Parse configuration from a string
pub fn parse_config(yaml: &str) -> Result<Config, DoshError> {
    // An empty document is a valid, empty configuration
    if yaml.trim().is_empty() {
        return Ok(Config::default());
    }

    // Going through `Value` rejects duplicate command and alias names
    let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    Ok(serde_yaml::from_value(value)?)
}

/// Load the `.env` file next to the configuration, if there is one.
///
/// Variables already present in the process environment are kept.
pub fn load_env_file(config_path: &Path) -> Result<Option<PathBuf>, DoshError> {
    let env_path = config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(ENV_FILE_NAME);

    if !env_path.is_file() {
        return Ok(None);
    }

    dotenvy::from_path(&env_path).map_err(|e| ConfigError::File {
        path: env_path.clone(),
        error: e.to_string(),
    })?;

    Ok(Some(env_path))
}

/// Write the starter configuration, refusing to overwrite an existing file
pub fn write_config_template(path: &Path) -> ConfigResult<()> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }

    fs::write(path, CONFIG_TEMPLATE).map_err(|e| ConfigError::File {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}
