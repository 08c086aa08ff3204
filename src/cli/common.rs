//! Shared types for headless commands.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Input was read but is invalid (bad layout, bad value, failed check)
    Validation = 1,
    /// Something could not be read or written
    Io = 2,
}

impl ExitCode {
    /// Numeric code for `std::process::exit`.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error returned by a command.
#[derive(Debug, Clone)]
pub struct CliError {
    /// Exit code to use
    pub kind: ExitCode,
    /// Message printed after `Error:`
    pub message: String,
}

impl CliError {
    /// Invalid input.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::Validation,
            message: message.into(),
        }
    }

    /// File or system failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::Io,
            message: message.into(),
        }
    }

    /// Exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.kind.code()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for commands.
pub type CliResult<T> = Result<T, CliError>;

/// Prints a value as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

/// The config file a command works on.
///
/// `--config FILE` names it explicitly; otherwise it is the default file in
/// the config directory.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    explicit: bool,
}

impl ConfigFile {
    /// Resolves the config file from the `--config` flag.
    pub fn resolve(explicit: Option<&Path>) -> CliResult<Self> {
        match explicit {
            Some(path) => Ok(Self {
                path: path.to_path_buf(),
                explicit: true,
            }),
            None => Ok(Self {
                path: Config::config_file_path()
                    .map_err(|e| CliError::io(format!("{e:#}")))?,
                explicit: false,
            }),
        }
    }

    /// Path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true when named by `--config`.
    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// Loads the configuration.
    ///
    /// An explicit file must exist and be valid. The default file falls back
    /// to defaults.
    pub fn load(&self) -> CliResult<Config> {
        if self.explicit {
            if !self.path.exists() {
                return Err(CliError::io(format!(
                    "Config file not found: {}",
                    self.path.display()
                )));
            }
            return Config::load_from(&self.path)
                .map_err(|e| CliError::validation(format!("{e:#}")));
        }
        Config::load().map_err(|e| CliError::io(format!("Failed to load configuration: {e:#}")))
    }

    /// Loads the file for editing: defaults when it does not exist yet.
    pub fn load_for_update(&self) -> CliResult<Config> {
        if self.path.exists() {
            Config::load_from(&self.path).map_err(|e| CliError::validation(format!("{e:#}")))
        } else {
            Ok(Config::default())
        }
    }

    /// Saves `config` to the file.
    pub fn save(&self, config: &Config) -> CliResult<()> {
        config
            .save_to(&self.path)
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(CliError::validation("bad").exit_code(), 1);
        assert_eq!(CliError::io("gone").exit_code(), 2);
        assert_eq!(CliError::io("gone").to_string(), "gone");
    }

    #[test]
    fn test_explicit_config_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("custom.json");
        let file = ConfigFile::resolve(Some(&path)).unwrap();
        assert!(file.is_explicit());

        assert_eq!(file.load().unwrap_err().kind, ExitCode::Io);

        let mut config = file.load_for_update().unwrap();
        config.sound.volume = 0.8;
        file.save(&config).unwrap();
        assert!((file.load().unwrap().sound.volume - 0.8).abs() < f32::EPSILON);

        std::fs::write(&path, "{ broken").unwrap();
        assert_eq!(file.load().unwrap_err().kind, ExitCode::Validation);
    }
}
