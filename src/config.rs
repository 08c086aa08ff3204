//! Configuration management for the application.
//!
//! The configuration is a JSON file in the platform config directory. Every
//! section carries `#[serde(default)]`, so a user file only needs the values
//! it wants to override; everything else falls back to the built-in defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::branding::{APP_DATA_DIR, CONFIG_DIR_ENV};
use crate::input::InputSource;
use crate::models::RgbColor;

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Theme display mode preference.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Automatically detect OS theme (dark/light)
    #[default]
    Auto,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Dark => "dark",
            Self::Light => "light",
        })
    }
}

/// Colors used to paint key elements on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyColors {
    /// Key fill when idle
    pub normal: RgbColor,
    /// Key fill when selected in the editor
    pub selected: RgbColor,
    /// Key fill while the physical key is held
    pub pressed: RgbColor,
    /// Inner glow of a pressed key
    pub glow_center: RgbColor,
    /// Outer glow of a pressed key
    pub glow_edge: RgbColor,
    /// Border of an idle key
    pub highlight_normal: RgbColor,
    /// Border of a selected key
    pub highlight_selected: RgbColor,
    /// Label color on idle keys
    pub text_normal: RgbColor,
    /// Label color on pressed keys
    pub text_pressed: RgbColor,
    /// Secondary text (binding names, shadows)
    pub text_shadow: RgbColor,
    /// Resize handle markers on selected keys
    pub resize_handle: RgbColor,
}

impl Default for KeyColors {
    fn default() -> Self {
        Self {
            normal: RgbColor::new(0x2B, 0x2D, 0x31),
            selected: RgbColor::new(0x3D, 0x5A, 0x80),
            pressed: RgbColor::new(0xE0, 0x7A, 0x5F),
            glow_center: RgbColor::new(0xFF, 0xD1, 0x66),
            glow_edge: RgbColor::new(0xE0, 0x7A, 0x5F),
            highlight_normal: RgbColor::new(0x5C, 0x63, 0x70),
            highlight_selected: RgbColor::new(0x98, 0xC1, 0xD9),
            text_normal: RgbColor::new(0xEE, 0xEE, 0xEE),
            text_pressed: RgbColor::new(0x1B, 0x1B, 0x1B),
            text_shadow: RgbColor::new(0x80, 0x80, 0x80),
            resize_handle: RgbColor::new(0x98, 0xC1, 0xD9),
        }
    }
}

/// Colors of the main window: canvas background and toolbar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowColors {
    /// Canvas background
    pub main_background: RgbColor,
    /// Toolbar chip background
    pub button_normal: RgbColor,
    /// Toolbar chip text
    pub button_text: RgbColor,
    /// Canvas and toolbar borders
    pub button_border: RgbColor,
    /// Highlighted toolbar chip (active mode)
    pub button_hover: RgbColor,
    /// Toolbar chip background while a command runs
    pub button_pressed: RgbColor,
    /// Background of unavailable toolbar actions
    pub button_disabled_bg: RgbColor,
    /// Text of unavailable toolbar actions
    pub button_disabled_text: RgbColor,
}

impl Default for WindowColors {
    fn default() -> Self {
        Self {
            main_background: RgbColor::new(0x1E, 0x1F, 0x22),
            button_normal: RgbColor::new(0x2F, 0x33, 0x3A),
            button_text: RgbColor::new(0xE0, 0xE0, 0xE0),
            button_border: RgbColor::new(0x4A, 0x4F, 0x58),
            button_hover: RgbColor::new(0x3D, 0x5A, 0x80),
            button_pressed: RgbColor::new(0x29, 0x3D, 0x57),
            button_disabled_bg: RgbColor::new(0x26, 0x28, 0x2C),
            button_disabled_text: RgbColor::new(0x6B, 0x6F, 0x76),
        }
    }
}

/// Colors of popups (label editor, binding capture, pickers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogColors {
    /// Popup background
    pub dialog_background: RgbColor,
    /// Popup text
    pub text_color: RgbColor,
    /// Text input background
    pub input_background: RgbColor,
    /// Text input border
    pub input_border: RgbColor,
}

impl Default for DialogColors {
    fn default() -> Self {
        Self {
            dialog_background: RgbColor::new(0x25, 0x27, 0x2B),
            text_color: RgbColor::new(0xE0, 0xE0, 0xE0),
            input_background: RgbColor::new(0x1A, 0x1B, 0x1E),
            input_border: RgbColor::new(0x98, 0xC1, 0xD9),
        }
    }
}

/// Sound feedback settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    /// Play a clip when a monitored key goes down
    pub enabled: bool,
    /// Playback volume, 0.0 - 1.0
    pub volume: f32,
    /// Directory holding `<key_bind>.wav` clips (default: `<config_dir>/sounds`)
    pub sounds_dir: Option<PathBuf>,
    /// Audio player command; autodetected when unset
    pub player: Option<String>,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.3,
            sounds_dir: None,
            player: None,
        }
    }
}

/// Key event source settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Where key events come from
    pub source: InputSource,
    /// Synthetic release delay for sources that never report releases
    pub release_after_ms: u64,
    /// UI frame / event poll interval
    pub poll_interval_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            source: InputSource::Auto,
            release_after_ms: 150,
            poll_interval_ms: 16,
        }
    }
}

/// Editor canvas geometry, in layout units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Canvas width
    pub canvas_width: i32,
    /// Canvas height
    pub canvas_height: i32,
    /// Edge length of newly created keys
    pub default_key_size: i32,
    /// Smallest width/height a key can be resized to
    pub min_key_size: i32,
    /// Nudge distance for arrow-key moves and resizes
    pub nudge_step: i32,
    /// Layout units per terminal column
    pub units_per_column: i32,
    /// Layout units per terminal row
    pub units_per_row: i32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 400,
            default_key_size: 40,
            min_key_size: 30,
            nudge_step: 5,
            units_per_column: 5,
            units_per_row: 10,
        }
    }
}

/// UI preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Theme mode preference (auto, dark, light)
    pub theme_mode: ThemeMode,
    /// Show the toolbar at startup
    pub show_toolbar: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::Auto,
            show_toolbar: true,
        }
    }
}

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathConfig {
    /// Layout directory (default: `<config_dir>/layouts`)
    pub layouts_dir: Option<PathBuf>,
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/KeyViz/config.json`
/// - macOS: `~/Library/Application Support/KeyViz/config.json`
/// - Windows: `%APPDATA%\KeyViz\config.json`
///
/// `KEYVIZ_CONFIG_DIR` replaces the directory on every platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// UI preferences
    pub ui: UiConfig,
    /// Key element colors
    pub key_colors: KeyColors,
    /// Main window colors
    pub main_window: WindowColors,
    /// Popup colors
    pub dialog_colors: DialogColors,
    /// Sound feedback
    pub sound: SoundConfig,
    /// Key event source
    pub input: InputConfig,
    /// Editor canvas geometry
    pub editor: EditorConfig,
    /// File system paths
    pub paths: PathConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the config directory path.
    ///
    /// Honors `KEYVIZ_CONFIG_DIR`, otherwise the platform config dir.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_DATA_DIR);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Loads configuration from the default config file.
    ///
    /// A missing file yields defaults. A file that cannot be parsed is
    /// reported in the log and also yields defaults, so a broken edit never
    /// keeps the application from starting.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::new());
        }

        match Self::load_from(&config_path) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!(
                    path = %config_path.display(),
                    "ignoring unusable config file: {err:#}"
                );
                Ok(Self::new())
            }
        }
    }

    /// Loads configuration from an explicit file.
    ///
    /// Unlike [`Config::load`], a missing or invalid file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .context(format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .context(format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Saves configuration to the default config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to `path` using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context(format!(
                "Failed to create config directory: {}",
                parent.display()
            ))?;
        }

        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize configuration")?;

        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, path).context(format!(
            "Failed to rename temp config file to: {}",
            path.display()
        ))?;

        tracing::info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Writes a config file containing every default value.
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn create_default(force: bool) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        if path.exists() && !force {
            anyhow::bail!(
                "Config file already exists: {} (use --force to overwrite)",
                path.display()
            );
        }
        Self::new().save_to(&path)?;
        Ok(path)
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.sound.volume) {
            anyhow::bail!(
                "sound.volume must be between 0.0 and 1.0, got {}",
                self.sound.volume
            );
        }

        let editor = &self.editor;
        if editor.min_key_size < 1 {
            anyhow::bail!("editor.min_key_size must be positive");
        }
        if editor.default_key_size < editor.min_key_size {
            anyhow::bail!(
                "editor.default_key_size ({}) is smaller than editor.min_key_size ({})",
                editor.default_key_size,
                editor.min_key_size
            );
        }
        if editor.canvas_width < editor.default_key_size
            || editor.canvas_height < editor.default_key_size
        {
            anyhow::bail!(
                "editor canvas {}x{} cannot hold a default key ({})",
                editor.canvas_width,
                editor.canvas_height,
                editor.default_key_size
            );
        }
        if editor.units_per_column < 1 || editor.units_per_row < 1 {
            anyhow::bail!("editor.units_per_column and editor.units_per_row must be positive");
        }
        if editor.nudge_step < 1 {
            anyhow::bail!("editor.nudge_step must be positive");
        }

        if self.input.release_after_ms == 0 {
            anyhow::bail!("input.release_after_ms must be positive");
        }
        if !(1..=1000).contains(&self.input.poll_interval_ms) {
            anyhow::bail!(
                "input.poll_interval_ms must be between 1 and 1000, got {}",
                self.input.poll_interval_ms
            );
        }

        Ok(())
    }

    /// Directory layouts are saved to and listed from.
    pub fn layouts_dir(&self) -> Result<PathBuf> {
        match &self.paths.layouts_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::config_dir()?.join("layouts")),
        }
    }

    /// Directory sound clips are looked up in.
    pub fn sounds_dir(&self) -> Result<PathBuf> {
        match &self.sound.sounds_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::config_dir()?.join("sounds")),
        }
    }

    /// Reads one setting by dotted key (e.g. `sound.volume`).
    pub fn get_value(&self, key: &str) -> Result<serde_json::Value> {
        let root = serde_json::to_value(self).context("Failed to serialize configuration")?;
        let mut cursor = &root;
        for part in key.split('.') {
            cursor = cursor
                .get(part)
                .with_context(|| format!("Unknown config key: {key}"))?;
        }
        Ok(cursor.clone())
    }

    /// Sets one setting by dotted key.
    ///
    /// `raw` is read as JSON when possible (`true`, `0.5`, `null`) and as a
    /// plain string otherwise (`#FF0000`, `/path/to/dir`). The result must
    /// still deserialize and validate, otherwise `self` is left untouched.
    pub fn set_value(&mut self, key: &str, raw: &str) -> Result<()> {
        let mut root = serde_json::to_value(&*self).context("Failed to serialize configuration")?;

        let mut cursor = &mut root;
        for part in key.split('.') {
            cursor = cursor
                .get_mut(part)
                .with_context(|| format!("Unknown config key: {key}"))?;
        }
        if cursor.is_object() {
            anyhow::bail!("'{key}' is a section; set one of its fields instead");
        }

        *cursor = serde_json::from_str(raw)
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));

        let updated: Self = serde_json::from_value(root)
            .with_context(|| format!("Invalid value for {key}: {raw}"))?;
        updated.validate()?;

        *self = updated;
        Ok(())
    }

    /// Every settable dotted key, sorted.
    pub fn keys(&self) -> Vec<String> {
        fn collect(prefix: &str, value: &serde_json::Value, out: &mut Vec<String>) {
            if let serde_json::Value::Object(map) = value {
                for (name, child) in map {
                    let key = if prefix.is_empty() {
                        name.clone()
                    } else {
                        format!("{prefix}.{name}")
                    };
                    if child.is_object() {
                        collect(&key, child, out);
                    } else {
                        out.push(key);
                    }
                }
            }
        }

        let mut keys = Vec::new();
        if let Ok(root) = serde_json::to_value(self) {
            collect("", &root, &mut keys);
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.ui.theme_mode, ThemeMode::Auto);
        assert!(config.ui.show_toolbar);
        assert!(config.sound.enabled);
        assert!((config.sound.volume - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.editor.default_key_size, 40);
        assert_eq!(config.editor.min_key_size, 30);
        assert_eq!(config.input.poll_interval_ms, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_merges_over_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r##"{ "key_colors": { "pressed": "#00FF00" }, "sound": { "volume": 0.8 } }"##,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.key_colors.pressed, RgbColor::new(0, 255, 0));
        assert_eq!(config.key_colors.normal, KeyColors::default().normal);
        assert!((config.sound.volume - 0.8).abs() < f32::EPSILON);
        assert!(config.sound.enabled);
        assert_eq!(config.editor, EditorConfig::default());
    }

    #[test]
    fn test_load_from_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load_from(&temp_dir.path().join("nope.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_rejects_bad_color() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{ "key_colors": { "normal": "blue" } }"#).unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let mut config = Config::new();
        config.ui.theme_mode = ThemeMode::Light;
        config.sound.player = Some("aplay".to_string());
        config.save_to(&path).unwrap();

        assert!(!path.with_extension("json.tmp").exists());
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_validate_volume_range() {
        let mut config = Config::new();
        config.sound.volume = 1.5;
        assert!(config.validate().is_err());
        config.sound.volume = -0.1;
        assert!(config.validate().is_err());
        config.sound.volume = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_key_sizes() {
        let mut config = Config::new();
        config.editor.default_key_size = 20;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.editor.canvas_height = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_refuses_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::new();
        config.input.poll_interval_ms = 0;
        assert!(config.save_to(&temp_dir.path().join("config.json")).is_err());
    }

    #[test]
    fn test_set_value_parses_types() {
        let mut config = Config::new();
        config.set_value("sound.volume", "0.5").unwrap();
        config.set_value("sound.enabled", "false").unwrap();
        config.set_value("key_colors.pressed", "#112233").unwrap();
        config.set_value("ui.theme_mode", "dark").unwrap();
        config.set_value("paths.layouts_dir", "/tmp/layouts").unwrap();

        assert!((config.sound.volume - 0.5).abs() < f32::EPSILON);
        assert!(!config.sound.enabled);
        assert_eq!(config.key_colors.pressed, RgbColor::new(0x11, 0x22, 0x33));
        assert_eq!(config.ui.theme_mode, ThemeMode::Dark);
        assert_eq!(
            config.paths.layouts_dir,
            Some(PathBuf::from("/tmp/layouts"))
        );

        config.set_value("paths.layouts_dir", "null").unwrap();
        assert_eq!(config.paths.layouts_dir, None);
    }

    #[test]
    fn test_set_value_rejects_invalid_and_keeps_state() {
        let mut config = Config::new();
        assert!(config.set_value("sound.volume", "3").is_err());
        assert!(config.set_value("sound.nope", "1").is_err());
        assert!(config.set_value("sound", "1").is_err());
        assert!(config.set_value("ui.theme_mode", "purple").is_err());
        assert_eq!(config, Config::new());
    }

    #[test]
    fn test_get_value_and_keys() {
        let config = Config::new();
        assert_eq!(
            config.get_value("editor.min_key_size").unwrap(),
            serde_json::json!(30)
        );
        assert!(config.get_value("editor.bogus").is_err());

        let keys = config.keys();
        assert!(keys.contains(&"key_colors.glow_center".to_string()));
        assert!(keys.contains(&"input.source".to_string()));
        assert!(!keys.contains(&"key_colors".to_string()));
    }
}
