//! Environment checks.
//!
//! Verifies that the pieces KeyViz relies on at runtime are in place: raw
//! keyboard access, an audio player, the sound clips and the config file.

pub mod checker;
pub mod formatter;

pub use checker::{DependencyChecker, DependencyStatus, ToolStatus};
pub use formatter::{DoctorFormatter, OutputFormat, Platform};
