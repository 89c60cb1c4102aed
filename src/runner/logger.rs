//! Leveled, verbosity-gated console output
//!
//! Progress and failures are reported through the [`Logger`] trait so the
//! engine can be driven by a different sink in tests.

use colored::Colorize;
use std::cell::RefCell;

/// Verbosity levels for output
///
/// The default is the required level of a message that does not ask for one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet = 0,
    Normal = 1,
    #[default]
    Debug = 2,
}

/// Message severity, used only for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Decide whether a message requiring `required` renders at `active`.
///
/// Only `Quiet` filters anything, and it only drops messages above `Normal`.
pub fn should_render(active: Verbosity, required: Verbosity) -> bool {
    !(active == Verbosity::Quiet && required > Verbosity::Normal)
}

/// Sink for progress and failure messages
pub trait Logger {
    /// Active verbosity of this logger
    fn verbosity(&self) -> Verbosity;

    /// Render a message that passed the verbosity gate
    fn write(&self, severity: Severity, message: &str);

    fn info(&self, required: Verbosity, message: &str) {
        self.log(Severity::Info, required, message);
    }

    fn success(&self, required: Verbosity, message: &str) {
        self.log(Severity::Success, required, message);
    }

    fn error(&self, required: Verbosity, message: &str) {
        self.log(Severity::Error, required, message);
    }

    fn log(&self, severity: Severity, required: Verbosity, message: &str) {
        if should_render(self.verbosity(), required) {
            self.write(severity, message);
        }
    }
}

/// Logger printing colored lines to standard output
#[derive(Debug, Clone, Copy)]
pub struct ConsoleLogger {
    verbosity: Verbosity,
}

impl ConsoleLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        ConsoleLogger { verbosity }
    }
}

impl Logger for ConsoleLogger {
    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn write(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => println!("{}", message.white()),
            Severity::Success => println!("{}", message.green()),
            Severity::Error => println!("{}", message.red()),
        }
    }
}

/// Logger that keeps rendered messages in memory
#[derive(Debug, Default)]
pub struct MemoryLogger {
    verbosity: Verbosity,
    messages: RefCell<Vec<(Severity, String)>>,
}

impl MemoryLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        MemoryLogger {
            verbosity,
            messages: RefCell::new(Vec::new()),
        }
    }

    /// Messages rendered so far, oldest first
    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.messages.borrow().clone()
    }

    /// Whether any rendered message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.borrow().iter().any(|(_, m)| m.contains(needle))
    }
}

impl Logger for MemoryLogger {
    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn write(&self, severity: Severity, message: &str) {
        self.messages
            .borrow_mut()
            .push((severity, message.to_string()));
    }
}
