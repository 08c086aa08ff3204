//! Audio playback through system players.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

/// Players tried in order when none is configured.
pub const KNOWN_PLAYERS: &[&str] = &["pw-play", "paplay", "aplay", "afplay", "ffplay"];

/// Concurrent clips before new ones are dropped.
const MAX_ACTIVE_CLIPS: usize = 16;

/// Plays audio clips.
pub trait SoundPlayer {
    /// Starts playing `path` at `volume` (0.0 - 1.0) without waiting for it.
    fn play(&mut self, path: &Path, volume: f32) -> Result<()>;

    /// Short name for logs and the status bar.
    fn name(&self) -> &str;
}

/// Player that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPlayer;

impl SoundPlayer for NullPlayer {
    fn play(&mut self, _path: &Path, _volume: f32) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Plays clips by spawning an external audio player per clip.
///
/// A configured command may use `{file}` and `{volume}` placeholders; the
/// file is appended when `{file}` is absent.
#[derive(Debug)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
    active: Vec<Child>,
}

impl CommandPlayer {
    /// Creates a player for a command line such as `"paplay"` or
    /// `"mpv --really-quiet --volume={volume} {file}"`.
    pub fn new(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            active: Vec::new(),
        })
    }

    /// Uses the configured command, or the first known player on `PATH`.
    pub fn from_config(command: Option<&str>) -> Option<Self> {
        match command {
            Some(command) => Self::new(command),
            None => detect_player().and_then(|program| Self::new(&program)),
        }
    }

    /// Program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments for one clip.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn build_args(&self, path: &Path, volume: f32) -> Vec<String> {
        let file = path.display().to_string();

        if !self.args.is_empty() {
            let mut has_file = false;
            let mut args: Vec<String> = self
                .args
                .iter()
                .map(|arg| {
                    has_file |= arg.contains("{file}");
                    arg.replace("{file}", &file)
                        .replace("{volume}", &format!("{volume:.2}"))
                })
                .collect();
            if !has_file {
                args.push(file);
            }
            return args;
        }

        let program = Path::new(&self.program)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.program);

        match program {
            "paplay" => vec![
                format!("--volume={}", (volume * 65536.0).round() as u32),
                file,
            ],
            "pw-play" => vec![format!("--volume={volume:.2}"), file],
            "afplay" => vec!["-v".to_string(), format!("{volume:.2}"), file],
            "ffplay" => vec![
                "-nodisp".to_string(),
                "-autoexit".to_string(),
                "-loglevel".to_string(),
                "quiet".to_string(),
                "-volume".to_string(),
                ((volume * 100.0).round() as u32).to_string(),
                file,
            ],
            "aplay" => vec!["-q".to_string(), file],
            _ => vec![file],
        }
    }

    /// Reaps finished players.
    fn reap(&mut self) {
        self.active
            .retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }
}

impl SoundPlayer for CommandPlayer {
    fn play(&mut self, path: &Path, volume: f32) -> Result<()> {
        self.reap();
        if self.active.len() >= MAX_ACTIVE_CLIPS {
            tracing::debug!("too many clips playing, skipping {}", path.display());
            return Ok(());
        }

        let child = Command::new(&self.program)
            .args(self.build_args(path, volume))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context(format!("Failed to run audio player '{}'", self.program))?;
        self.active.push(child);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.program
    }
}

impl Drop for CommandPlayer {
    fn drop(&mut self) {
        self.reap();
    }
}

/// Finds an executable on `PATH`.
pub fn find_in_path(program: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

/// First known player installed on this machine.
pub fn detect_player() -> Option<String> {
    KNOWN_PLAYERS
        .iter()
        .find(|program| find_in_path(program).is_some())
        .map(|program| (*program).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_player_arguments() {
        let clip = Path::new("/sounds/a.wav");

        let paplay = CommandPlayer::new("paplay").unwrap();
        assert_eq!(
            paplay.build_args(clip, 0.5),
            vec!["--volume=32768", "/sounds/a.wav"]
        );

        let afplay = CommandPlayer::new("afplay").unwrap();
        assert_eq!(afplay.build_args(clip, 0.3), vec!["-v", "0.30", "/sounds/a.wav"]);

        let aplay = CommandPlayer::new("/usr/bin/aplay").unwrap();
        assert_eq!(aplay.build_args(clip, 0.3), vec!["-q", "/sounds/a.wav"]);
    }

    #[test]
    fn test_custom_command_placeholders() {
        let clip = Path::new("/s/b.wav");
        let player = CommandPlayer::new("mpv --volume={volume} {file} --no-video").unwrap();
        assert_eq!(player.program(), "mpv");
        assert_eq!(
            player.build_args(clip, 0.25),
            vec!["--volume=0.25", "/s/b.wav", "--no-video"]
        );

        let appended = CommandPlayer::new("play -q").unwrap();
        assert_eq!(appended.build_args(clip, 1.0), vec!["-q", "/s/b.wav"]);
    }

    #[test]
    fn test_empty_command_is_rejected() {
        assert!(CommandPlayer::new("   ").is_none());
    }

    #[test]
    fn test_missing_program_reports_error() {
        let mut player = CommandPlayer::new("keyviz-no-such-player-binary").unwrap();
        assert!(player.play(Path::new("/tmp/a.wav"), 0.3).is_err());
    }

    #[test]
    fn test_null_player() {
        let mut player = NullPlayer;
        assert!(player.play(Path::new("/nowhere.wav"), 1.0).is_ok());
        assert_eq!(player.name(), "none");
    }
}
