//! Execution context for command running
//!
//! The context carries everything a run needs besides the configuration
//! itself. It is built once per invocation and only read during execution.

use std::env;
use std::path::PathBuf;

/// Whether per-command environment restrictions are checked before a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentPolicy {
    /// Refuse to run a restricted command outside its environments
    Enforce,
    /// Run every command regardless of its restrictions
    Ignore,
}

/// Execution context for a single invocation
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory relative paths and spawned processes are resolved against
    pub working_dir: PathBuf,

    /// Interpreter used by RUN steps (e.g., ["sh", "-c"])
    pub interpreter: Vec<String>,

    /// Current environment name, substituted for `${ENV}`
    pub environment: Option<String>,

    /// Invocation arguments, substituted for `${ARGS}`
    pub args: Vec<String>,

    /// Environment restriction policy
    pub environment_policy: EnvironmentPolicy,
}

/// Platform default interpreter
pub fn default_interpreter() -> Vec<String> {
    if cfg!(windows) {
        vec!["cmd".to_string(), "/C".to_string()]
    } else {
        vec!["sh".to_string(), "-c".to_string()]
    }
}

impl Context {
    /// Create a new context with default settings
    pub fn new() -> Self {
        Context {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            interpreter: default_interpreter(),
            environment: None,
            args: Vec::new(),
            environment_policy: EnvironmentPolicy::Enforce,
        }
    }

    /// Create a context with a specific working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set the interpreter
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        if !interpreter.is_empty() {
            self.interpreter = interpreter;
        }
        self
    }

    /// Set the current environment
    pub fn with_environment(mut self, environment: Option<String>) -> Self {
        self.environment = environment;
        self
    }

    /// Set the invocation arguments
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Set the environment restriction policy
    pub fn with_environment_policy(mut self, policy: EnvironmentPolicy) -> Self {
        self.environment_policy = policy;
        self
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
