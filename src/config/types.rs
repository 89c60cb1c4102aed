//! Core configuration types
//!
//! This module defines the data structures that represent a dosh.yaml configuration file.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Environments commands can be restricted to
    #[serde(default)]
    pub environments: BTreeSet<String>,

    /// Named text fragments substituted into steps via `${name}`
    #[serde(default)]
    pub aliases: HashMap<String, String>,

    /// Commands defined in the configuration
    #[serde(default)]
    pub commands: HashMap<String, Command>,

    /// Interpreter used by RUN steps (e.g., ["bash", "-c"])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<Vec<String>>,
}

impl Config {
    /// Look up a command by name
    pub fn command(&self, name: &str) -> ConfigResult<&Command> {
        self.commands
            .get(name)
            .ok_or_else(|| ConfigError::CommandNotFound(name.to_string()))
    }

    /// Look up the replacement text of an alias
    pub fn alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    /// All commands, sorted by name
    pub fn sorted_commands(&self) -> Vec<(&str, &Command)> {
        let mut commands: Vec<(&str, &Command)> = self
            .commands
            .iter()
            .map(|(name, cmd)| (name.as_str(), cmd))
            .collect();
        commands.sort_by(|a, b| a.0.cmp(b.0));
        commands
    }

    /// All declared environments, sorted by name
    pub fn sorted_environments(&self) -> Vec<&str> {
        self.environments.iter().map(String::as_str).collect()
    }
}

/// A command definition
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Command {
    /// Description shown in the help listing
    #[serde(default)]
    pub help_text: String,

    /// Steps to execute, in order
    #[serde(default, deserialize_with = "deserialize_run_steps")]
    pub run: Vec<String>,

    /// Environments this command is restricted to (empty means any)
    #[serde(default)]
    pub environments: BTreeSet<String>,
}

impl Command {
    /// Check whether the command may run in the given environment
    pub fn is_allowed_in(&self, environment: Option<&str>) -> bool {
        if self.environments.is_empty() {
            return true;
        }
        environment.is_some_and(|env| self.environments.contains(env))
    }
}

/// Custom deserializer for steps that handles both a single string and a list
fn deserialize_run_steps<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::String(s) => Ok(vec![s]),
        Value::Sequence(seq) => seq
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                _ => Err(D::Error::custom("run items must be strings")),
            })
            .collect(),
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("run must be a string or array")),
    }
}
