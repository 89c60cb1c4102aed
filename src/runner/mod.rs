//! Command execution engine
//!
//! This module handles placeholder substitution, step classification and
//! the fail-fast dispatch of actions.

pub mod action;
pub mod context;
pub mod dispatch;
pub mod interpolate;
pub mod logger;

// Re-export main types
pub use action::*;
pub use context::*;
pub use dispatch::*;
pub use interpolate::*;
pub use logger::*;
