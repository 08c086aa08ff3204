//! Data models for keyboard layouts and colors.
//!
//! Models are independent of UI and business logic.

pub mod key;
pub mod layout;
pub mod rgb;

pub use key::{KeyBinding, KeyDefinition, KeyRect};
pub use layout::{Layout, LayoutMetadata, ValidationReport};
pub use rgb::RgbColor;
