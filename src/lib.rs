//! Dosh - A YAML-based command runner
//!
//! Commands are declared in a `dosh.yaml` file as ordered lists of steps
//! (`MKDIR`, `PRINT`, `RUN`), may be restricted to named environments, and
//! share repeated fragments through aliases.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;

// Re-export commonly used types
pub use error::{DoshError, Result};

/// Current version of Dosh
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
