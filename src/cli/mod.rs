//! CLI command handlers for KeyViz.
//!
//! Headless, scriptable access to layouts, the scan-code table, the
//! configuration and the environment checks.

pub mod common;
pub mod config;
pub mod doctor;
pub mod inspect;
pub mod keys;
pub mod layouts;
pub mod validate;

pub use common::{CliError, CliResult, ConfigFile, ExitCode};
pub use config::ConfigArgs;
pub use doctor::DoctorArgs;
pub use inspect::InspectArgs;
pub use keys::KeysArgs;
pub use layouts::LayoutsArgs;
pub use validate::ValidateArgs;
