//! Sound feedback.
//!
//! Each key plays `<sounds_dir>/<key_bind>.wav`. Keys without their own clip
//! borrow a letter clip picked from the key name, and `a.wav` is the last
//! resort. Playback goes through a [`SoundPlayer`] so the UI never blocks
//! on audio.

pub mod player;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::Config;
pub use player::{CommandPlayer, NullPlayer, SoundPlayer};

/// Extension of sound clips.
pub const CLIP_EXTENSION: &str = "wav";

/// Locates sound clips for key names.
#[derive(Debug, Clone)]
pub struct SoundBank {
    dir: PathBuf,
}

impl SoundBank {
    /// Creates a bank over a clip directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Clip directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a clip named `name` would have.
    ///
    /// `None` for names that could leave the clip directory.
    #[must_use]
    pub fn clip_path(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return None;
        }
        Some(self.dir.join(format!("{name}.{CLIP_EXTENSION}")))
    }

    fn existing_clip(&self, name: &str) -> Option<PathBuf> {
        self.clip_path(name).filter(|path| path.is_file())
    }

    /// Finds the clip for a key binding.
    ///
    /// Order: the key's own clip, the fallback letter clip, `a.wav`.
    #[must_use]
    pub fn resolve(&self, key_bind: &str) -> Option<PathBuf> {
        let name = key_bind.trim();
        self.existing_clip(name)
            .or_else(|| self.existing_clip(&fallback_letter(name).to_string()))
            .or_else(|| self.existing_clip("a"))
    }

    /// Names of all clips in the directory, sorted.
    #[must_use]
    pub fn clip_names(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == CLIP_EXTENSION))
            .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
            .collect();
        names.sort();
        names
    }
}

/// Letter whose clip stands in for a key without one.
///
/// Derived from the key name so a key keeps the same sound across runs.
#[must_use]
pub fn fallback_letter(key_bind: &str) -> char {
    // FNV-1a
    let hash = key_bind
        .bytes()
        .fold(0x811c_9dc5_u32, |acc, b| (acc ^ u32::from(b)).wrapping_mul(0x0100_0193));
    let offset = u8::try_from(hash % 26).unwrap_or(0);
    char::from(b'a' + offset)
}

/// Plays the clip for a key when it goes down.
pub struct SoundMapper {
    bank: SoundBank,
    player: Box<dyn SoundPlayer>,
    enabled: bool,
    volume: f32,
    cache: HashMap<String, Option<PathBuf>>,
}

impl SoundMapper {
    /// Creates a mapper.
    pub fn new(bank: SoundBank, player: Box<dyn SoundPlayer>, enabled: bool, volume: f32) -> Self {
        Self {
            bank,
            player,
            enabled,
            volume: volume.clamp(0.0, 1.0),
            cache: HashMap::new(),
        }
    }

    /// Builds a mapper from the sound section of the config.
    ///
    /// Falls back to a silent player when no audio player is available.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let bank = SoundBank::new(config.sounds_dir()?);
        // Resolved even when sound starts off so it can be toggled on later
        let player: Box<dyn SoundPlayer> =
            match CommandPlayer::from_config(config.sound.player.as_deref()) {
                Some(player) => Box::new(player),
                None => {
                    if config.sound.enabled {
                        tracing::warn!("no audio player found, sound feedback disabled");
                    }
                    Box::new(NullPlayer)
                }
            };
        tracing::debug!(dir = %bank.dir().display(), player = player.name(), "sound mapper ready");
        Ok(Self::new(bank, player, config.sound.enabled, config.sound.volume))
    }

    /// Whether presses produce sound.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turns sound on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Name of the underlying player.
    #[must_use]
    pub fn player_name(&self) -> &str {
        self.player.name()
    }

    /// Forgets resolved clip paths, e.g. after clips were added.
    pub fn reload(&mut self) {
        self.cache.clear();
    }

    /// Plays the clip for `key_bind`; returns the clip played.
    pub fn play_for(&mut self, key_bind: &str) -> Option<PathBuf> {
        if !self.enabled {
            return None;
        }

        let clip = self
            .cache
            .entry(key_bind.to_string())
            .or_insert_with(|| self.bank.resolve(key_bind))
            .clone()?;

        match self.player.play(&clip, self.volume) {
            Ok(()) => Some(clip),
            Err(err) => {
                tracing::warn!(clip = %clip.display(), "sound playback failed: {err:#}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct RecordingPlayer {
        played: Arc<Mutex<Vec<(PathBuf, f32)>>>,
    }

    impl SoundPlayer for RecordingPlayer {
        fn play(&mut self, path: &Path, volume: f32) -> anyhow::Result<()> {
            self.played.lock().unwrap().push((path.to_path_buf(), volume));
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn clips(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            fs::write(dir.path().join(format!("{name}.wav")), b"RIFF").unwrap();
        }
        dir
    }

    #[test]
    fn test_resolve_prefers_own_clip() {
        let dir = clips(&["space", "a"]);
        let bank = SoundBank::new(dir.path());
        assert_eq!(bank.resolve("space"), Some(dir.path().join("space.wav")));
    }

    #[test]
    fn test_resolve_falls_back_to_letter_then_a() {
        let letter = fallback_letter("page up");
        let dir = clips(&[&letter.to_string()]);
        let bank = SoundBank::new(dir.path());
        assert_eq!(
            bank.resolve("page up"),
            Some(dir.path().join(format!("{letter}.wav")))
        );

        let only_a = clips(&["a"]);
        let bank = SoundBank::new(only_a.path());
        assert_eq!(bank.resolve("f13"), Some(only_a.path().join("a.wav")));
        assert_eq!(bank.resolve(""), Some(only_a.path().join("a.wav")));

        let empty = clips(&[]);
        assert_eq!(SoundBank::new(empty.path()).resolve("x"), None);
    }

    #[test]
    fn test_binding_cannot_escape_clip_dir() {
        let root = TempDir::new().unwrap();
        let sounds = root.path().join("sounds");
        fs::create_dir_all(&sounds).unwrap();
        fs::write(root.path().join("outside.wav"), b"RIFF").unwrap();
        fs::write(sounds.join("a.wav"), b"RIFF").unwrap();
        let bank = SoundBank::new(&sounds);

        assert_eq!(bank.clip_path("../outside"), None);
        assert_eq!(bank.clip_path("..\\outside"), None);
        assert_eq!(bank.resolve("../outside"), Some(sounds.join("a.wav")));
        assert_eq!(bank.clip_path("space"), Some(sounds.join("space.wav")));
    }

    #[test]
    fn test_fallback_letter_is_stable() {
        assert_eq!(fallback_letter("enter"), fallback_letter("enter"));
        for name in ["enter", "f1", "right shift", ""] {
            assert!(fallback_letter(name).is_ascii_lowercase());
        }
    }

    #[test]
    fn test_clip_names() {
        let dir = clips(&["b", "a"]);
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        assert_eq!(SoundBank::new(dir.path()).clip_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_mapper_plays_with_volume_and_respects_enabled() {
        let dir = clips(&["a"]);
        let player = RecordingPlayer::default();
        let played = Arc::clone(&player.played);
        let mut mapper = SoundMapper::new(SoundBank::new(dir.path()), Box::new(player), true, 0.3);

        assert!(mapper.play_for("q").is_some());
        mapper.set_enabled(false);
        assert!(mapper.play_for("q").is_none());

        let played = played.lock().unwrap();
        assert_eq!(played.len(), 1);
        assert!((played[0].1 - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_mapper_without_clips_is_silent() {
        let dir = clips(&[]);
        let player = RecordingPlayer::default();
        let played = Arc::clone(&player.played);
        let mut mapper = SoundMapper::new(SoundBank::new(dir.path()), Box::new(player), true, 1.0);
        assert!(mapper.play_for("a").is_none());
        assert!(played.lock().unwrap().is_empty());
    }
}
