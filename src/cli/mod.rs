//! CLI interface and argument parsing
//!
//! This module handles command-line interface parsing, the help listing
//! and the mapping of errors to exit statuses.

pub mod app;
pub mod help;

// Re-export main types
pub use app::*;
pub use help::*;
