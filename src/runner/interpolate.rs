//! Placeholder substitution for steps
//!
//! Steps may contain `${name}` placeholders. `${ARGS}` and `${ENV}` are
//! reserved; every other name is looked up in the configuration's aliases.
//! Substitution is a single pass: replacement text is never re-scanned.

use crate::config::Config;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Placeholder replaced by the invocation arguments
pub const ARGS_PLACEHOLDER: &str = "ARGS";

/// Placeholder replaced by the current environment name
pub const ENV_PLACEHOLDER: &str = "ENV";

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder regex is valid"))
}

/// Values available to placeholders during a run
#[derive(Debug, Clone, Copy)]
pub struct Substitutions<'a> {
    config: &'a Config,
    args: &'a [String],
    environment: Option<&'a str>,
}

impl<'a> Substitutions<'a> {
    pub fn new(config: &'a Config, args: &'a [String], environment: Option<&'a str>) -> Self {
        Substitutions {
            config,
            args,
            environment,
        }
    }

    /// Value for a placeholder name, if it has one
    fn lookup(&self, name: &str) -> Option<String> {
        match name {
            ARGS_PLACEHOLDER => Some(self.args.join(" ")),
            ENV_PLACEHOLDER => self.environment.map(str::to_string),
            _ => self.config.alias(name).map(str::to_string),
        }
    }

    /// Replace every known placeholder in `step`, leaving unknown ones as written
    pub fn resolve(&self, step: &str) -> String {
        placeholder_regex()
            .replace_all(step, |caps: &Captures| {
                self.lookup(&caps[1])
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}
