//! Branding and application identity.
//!
//! Names and paths that identify the application on disk and in the UI live
//! here so they are not scattered through the code base.

/// The human-readable display name of the application.
///
/// Shown in the title bar, help overlay, and `--version` banner.
pub const APP_DISPLAY_NAME: &str = "KeyViz";

/// The binary/executable name (lowercase, no spaces).
pub const APP_BINARY_NAME: &str = "keyviz";

/// The directory name for application data (config, layouts, logs).
///
/// Used in platform-specific paths:
/// - Linux: `~/.config/{APP_DATA_DIR}/`
/// - macOS: `~/Library/Application Support/{APP_DATA_DIR}/`
/// - Windows: `%APPDATA%\{APP_DATA_DIR}\`
pub const APP_DATA_DIR: &str = "KeyViz";

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "KEYVIZ_CONFIG_DIR";

/// Environment variable holding the tracing filter directive.
pub const LOG_FILTER_ENV: &str = "KEYVIZ_LOG";

/// Short description for help text.
pub const APP_DESCRIPTION: &str = "Keyboard layout editor and live keypress visualizer";

/// Version banner printed by the TUI launcher.
pub fn version_banner() -> String {
    format!("{} v{}", APP_DISPLAY_NAME, env!("CARGO_PKG_VERSION"))
}
