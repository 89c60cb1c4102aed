//! Error types for Dosh

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Dosh operations
pub type Result<T> = std::result::Result<T, DoshError>;

/// Exit status for a failed step, an unknown command or a rejected environment
pub const EXIT_FAILURE: i32 = 1;

/// Exit status reserved for configuration load failures
pub const EXIT_CONFIG: i32 = 2;

/// Exit status for command-line usage errors
pub const EXIT_USAGE: i32 = 64;

/// Main error type for Dosh
#[derive(Error, Debug)]
pub enum DoshError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Step parsing errors
    #[error("{0}")]
    Step(#[from] StepError),

    /// Action execution errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl DoshError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            DoshError::Config(ConfigError::CommandNotFound(_)) => EXIT_FAILURE,
            DoshError::Config(_) | DoshError::Yaml(_) | DoshError::Io(_) => EXIT_CONFIG,
            DoshError::Step(_) | DoshError::Execution(_) => EXIT_FAILURE,
        }
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find config file (searched: {0})")]
    NotFound(String),

    #[error("Failed to access '{path}': {error}")]
    File { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Command '{command}' uses undeclared environment '{environment}'")]
    UndeclaredEnvironment { command: String, environment: String },

    #[error("Config file '{0}' already exists")]
    AlreadyExists(PathBuf),

    #[error("Command '{0}' is not defined")]
    CommandNotFound(String),
}

/// Errors raised while classifying a resolved step
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StepError {
    #[error("Malformed step (missing parameters): {0}")]
    Malformed(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

/// Action execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("There's a file with the same name: {0}")]
    NameCollision(PathBuf),

    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    #[error("Command '{command}' failed with exit code {code:?}")]
    CommandFailed { command: String, code: Option<i32> },

    #[error("Failed to spawn '{command}': {error}")]
    Spawn { command: String, error: String },

    #[error("Command '{command}' is not available in environment {environment:?}")]
    EnvironmentNotAllowed {
        command: String,
        environment: Option<String>,
    },
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for step parsing
pub type StepResult<T> = std::result::Result<T, StepError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;
