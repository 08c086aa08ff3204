//! Application orchestration layer
//!
//! Coordinates config, input, sound and the TUI at start-up without holding
//! any of their logic.

/// TUI start-up and shutdown
pub mod launch;

pub use launch::{launch, LaunchOptions, StartMode};
