//! Runtime dependency checks.
//!
//! # Example
//!
//! ```rust,no_run
//! use keyviz::config::Config;
//! use keyviz::doctor::{DependencyChecker, ToolStatus};
//!
//! let config = Config::default();
//! let checker = DependencyChecker::new();
//! for status in checker.check_all(&config) {
//!     if status.status != ToolStatus::Available {
//!         println!("{}: {}", status.name, status.message);
//!     }
//! }
//! ```
//!
//! Every check is non-panicking. Anything that cannot be decided, such as
//! device access on a platform without evdev, reports `ToolStatus::Unknown`.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::audio::player::{detect_player, find_in_path};
use crate::audio::SoundBank;
use crate::config::Config;
use crate::input::{probe_keyboards, ListenerError};
use crate::services::LayoutService;

/// Check names, in report order.
pub const CHECK_CONFIG: &str = "Config";
/// Keyboard device access.
pub const CHECK_KEYBOARD: &str = "Keyboard Access";
/// Audio player.
pub const CHECK_PLAYER: &str = "Audio Player";
/// Sound clip directory.
pub const CHECK_SOUNDS: &str = "Sound Clips";
/// Layout directory.
pub const CHECK_LAYOUTS: &str = "Layouts";

/// Status of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    /// Present and working
    Available,
    /// Absent or unusable
    Missing,
    /// Could not be determined
    Unknown,
}

/// Result of a single check.
#[derive(Debug, Clone)]
pub struct DependencyStatus {
    /// Check name (e.g., "Audio Player")
    pub name: String,
    /// Outcome
    pub status: ToolStatus,
    /// Version string if detected
    pub version: Option<String>,
    /// Human-readable detail
    pub message: String,
}

impl DependencyStatus {
    /// Creates a new status.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        status: ToolStatus,
        version: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            version,
            message: message.into(),
        }
    }

    /// A passing check.
    #[must_use]
    pub fn available(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, ToolStatus::Available, None, message)
    }

    /// A failing check.
    #[must_use]
    pub fn missing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, ToolStatus::Missing, None, message)
    }

    /// An undecided check.
    #[must_use]
    pub fn unknown(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, ToolStatus::Unknown, None, message)
    }

    /// Attaches a version.
    #[must_use]
    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }
}

/// Runs the environment checks.
#[derive(Debug, Default)]
pub struct DependencyChecker;

impl DependencyChecker {
    /// Creates a checker.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Runs every check against `config`.
    pub fn check_all(&self, config: &Config) -> Vec<DependencyStatus> {
        vec![
            self.check_config(),
            self.check_keyboard_access(),
            self.check_audio_player(config.sound.player.as_deref()),
            self.check_sound_clips(config),
            self.check_layouts(config),
        ]
    }

    /// Checks that the config file, if present, parses and validates.
    pub fn check_config(&self) -> DependencyStatus {
        let path = match Config::config_file_path() {
            Ok(path) => path,
            Err(e) => return DependencyStatus::unknown(CHECK_CONFIG, format!("{e}")),
        };
        self.check_config_file(&path)
    }

    /// Checks a specific config file.
    pub fn check_config_file(&self, path: &Path) -> DependencyStatus {
        if !path.exists() {
            return DependencyStatus::available(
                CHECK_CONFIG,
                format!("Using defaults ({} not created yet)", path.display()),
            );
        }
        match Config::load_from(path) {
            Ok(_) => DependencyStatus::available(CHECK_CONFIG, format!("Valid: {}", path.display())),
            Err(e) => DependencyStatus::missing(CHECK_CONFIG, format!("{e:#}")),
        }
    }

    /// Checks that at least one keyboard can be read directly.
    pub fn check_keyboard_access(&self) -> DependencyStatus {
        match probe_keyboards() {
            Ok(devices) => {
                let names: Vec<&str> = devices.iter().map(|d| d.name.as_str()).collect();
                DependencyStatus::available(
                    CHECK_KEYBOARD,
                    format!("{} keyboard(s): {}", devices.len(), names.join(", ")),
                )
            }
            Err(err @ ListenerError::PermissionDenied { .. }) => {
                DependencyStatus::missing(CHECK_KEYBOARD, err.to_string())
            }
            Err(ListenerError::NoDevices) => DependencyStatus::missing(
                CHECK_KEYBOARD,
                "No keyboard devices found. The visualizer will use terminal input",
            ),
            Err(ListenerError::Unsupported) => DependencyStatus::unknown(
                CHECK_KEYBOARD,
                "Direct device input is not available on this platform. The visualizer will use terminal input",
            ),
            Err(err) => DependencyStatus::unknown(CHECK_KEYBOARD, format!("Error checking: {err}")),
        }
    }

    /// Checks for a usable audio player.
    pub fn check_audio_player(&self, configured: Option<&str>) -> DependencyStatus {
        let program = match configured {
            Some(command) => match command.split_whitespace().next() {
                Some(program) => program.to_string(),
                None => return DependencyStatus::missing(CHECK_PLAYER, "Configured player is empty"),
            },
            None => match detect_player() {
                Some(program) => program,
                None => {
                    return DependencyStatus::missing(
                        CHECK_PLAYER,
                        "No audio player found in PATH. Sounds are disabled",
                    )
                }
            },
        };

        let found = Path::new(&program).is_file() || find_in_path(&program).is_some();
        if !found {
            return DependencyStatus::missing(
                CHECK_PLAYER,
                format!("Configured player '{program}' not found"),
            );
        }

        let version = self
            .run_version_command(&program, &["--version"])
            .ok()
            .and_then(|output| Self::parse_version_simple(&output));
        DependencyStatus::available(CHECK_PLAYER, format!("Using {program}")).with_version(version)
    }

    /// Checks the sound clip directory and the fallback clip.
    pub fn check_sound_clips(&self, config: &Config) -> DependencyStatus {
        match config.sounds_dir() {
            Ok(dir) => self.check_sound_dir(&dir),
            Err(e) => DependencyStatus::unknown(CHECK_SOUNDS, format!("{e}")),
        }
    }

    /// Checks a specific sound directory.
    pub fn check_sound_dir(&self, dir: &Path) -> DependencyStatus {
        if !dir.is_dir() {
            return DependencyStatus::missing(
                CHECK_SOUNDS,
                format!("Directory does not exist: {}", dir.display()),
            );
        }

        let bank = SoundBank::new(dir);
        let clips = bank.clip_names();
        if clips.is_empty() {
            return DependencyStatus::missing(
                CHECK_SOUNDS,
                format!("No .wav clips in {}", dir.display()),
            );
        }
        if !bank.clip_path("a").is_some_and(|path| path.is_file()) {
            return DependencyStatus::unknown(
                CHECK_SOUNDS,
                format!(
                    "{} clip(s) but no a.wav fallback in {}",
                    clips.len(),
                    dir.display()
                ),
            );
        }

        DependencyStatus::available(
            CHECK_SOUNDS,
            format!("{} clip(s) in {}", clips.len(), dir.display()),
        )
    }

    /// Counts saved layouts.
    pub fn check_layouts(&self, config: &Config) -> DependencyStatus {
        let dir = match config.layouts_dir() {
            Ok(dir) => dir,
            Err(e) => return DependencyStatus::unknown(CHECK_LAYOUTS, format!("{e}")),
        };
        match LayoutService::list_layouts(&dir) {
            Ok(layouts) => DependencyStatus::available(
                CHECK_LAYOUTS,
                format!("{} layout(s) in {}", layouts.len(), dir.display()),
            ),
            Err(e) => DependencyStatus::unknown(CHECK_LAYOUTS, format!("{e:#}")),
        }
    }

    /// Runs a command to get version information.
    fn run_version_command(&self, command: &str, args: &[&str]) -> Result<String> {
        let output = Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .context(format!("Failed to execute '{command}'"))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        Ok(if stdout.trim().is_empty() {
            stderr.to_string()
        } else {
            stdout.to_string()
        })
    }

    /// Finds the first `X.Y[.Z]` word.
    ///
    /// - "aplay: version 1.2.8 by Jaroslav Kysela" -> Some("1.2.8")
    /// - "Compiled with libpipewire 1.0.5" -> Some("1.0.5")
    fn parse_version_simple(output: &str) -> Option<String> {
        output
            .split_whitespace()
            .map(|word| word.trim_matches(|c: char| !c.is_ascii_digit() && c != '.'))
            .find(|word| {
                let parts: Vec<&str> = word.split('.').collect();
                parts.len() >= 2
                    && parts
                        .iter()
                        .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
            })
            .map(String::from)
    }
}
