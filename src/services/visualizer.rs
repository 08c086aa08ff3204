//! Live highlight state for the visualizer.

use anyhow::Result;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::input::{KeyEvent, KeyEventKind};
use crate::models::Layout;
use crate::services::router::KeyRouter;

/// A change in a key's highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    /// Key that changed
    pub key_id: String,
    /// Its binding name, used to pick a sound
    pub key_bind: String,
    /// New state
    pub pressed: bool,
    /// True on the released to pressed edge only
    pub play_sound: bool,
}

/// Longest gap between a press and the first auto-repeat treated as the
/// same keystroke once the key was released synthetically.
pub const REPEAT_GRACE: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Copy)]
struct Held {
    last_event: Instant,
    repeating: bool,
}

/// Tracks which keys of a layout are held down.
#[derive(Debug, Clone)]
pub struct Visualizer {
    router: KeyRouter,
    bindings: HashMap<String, String>,
    pressed: HashMap<String, Held>,
    // Keys released by `tick` before any repeat arrived, with their press time
    faded: HashMap<String, Instant>,
    release_after: Option<Duration>,
    press_count: u64,
}

impl Visualizer {
    /// Starts visualizing a layout.
    ///
    /// `release_after` enables synthetic releases for sources that never
    /// report them. Fails on duplicate bindings.
    pub fn start(layout: &Layout, release_after: Option<Duration>) -> Result<Self> {
        let router = KeyRouter::build(layout)?;
        let bindings = layout
            .keys
            .iter()
            .filter(|k| k.scan_code.is_some())
            .map(|k| (k.id.clone(), k.key_bind.clone()))
            .collect();
        tracing::info!(keys = router.len(), "visualizer started");
        Ok(Self {
            router,
            bindings,
            pressed: HashMap::new(),
            faded: HashMap::new(),
            release_after,
            press_count: 0,
        })
    }

    /// Routing table in use.
    #[must_use]
    pub const fn router(&self) -> &KeyRouter {
        &self.router
    }

    /// Scan codes the listener should monitor.
    #[must_use]
    pub fn scan_codes(&self) -> Vec<u16> {
        self.router.scan_codes()
    }

    /// Applies a key event; returns the highlight change, if any.
    ///
    /// A press that follows a synthetic release within [`REPEAT_GRACE`] is
    /// the terminal's first auto-repeat: the key lights again silently.
    pub fn apply(&mut self, event: &KeyEvent, now: Instant) -> Option<Highlight> {
        let id = self.router.route(event.scan_code)?.to_string();
        let key_bind = self.bindings.get(&id).cloned().unwrap_or_default();

        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if let Some(held) = self.pressed.get_mut(&id) {
                    held.last_event = now;
                    held.repeating = true;
                    return None;
                }

                let first_repeat = self
                    .faded
                    .remove(&id)
                    .is_some_and(|at| now.saturating_duration_since(at) < REPEAT_GRACE);
                let repeat = event.kind == KeyEventKind::Repeat || first_repeat;
                self.pressed.insert(
                    id.clone(),
                    Held {
                        last_event: now,
                        repeating: repeat,
                    },
                );
                if !repeat {
                    self.press_count += 1;
                }
                Some(Highlight {
                    key_id: id,
                    key_bind,
                    pressed: true,
                    play_sound: !repeat,
                })
            }
            KeyEventKind::Release => {
                self.faded.remove(&id);
                self.pressed.remove(&id)?;
                Some(Highlight {
                    key_id: id,
                    key_bind,
                    pressed: false,
                    play_sound: false,
                })
            }
        }
    }

    /// Releases keys whose last press is older than the synthetic release
    /// delay. Returns the released key ids.
    pub fn tick(&mut self, now: Instant) -> Vec<String> {
        let Some(after) = self.release_after else {
            return Vec::new();
        };
        let expired: Vec<String> = self
            .pressed
            .iter()
            .filter(|(_, held)| now.saturating_duration_since(held.last_event) >= after)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &expired {
            if let Some(held) = self.pressed.remove(id) {
                // A repeating key stops repeating only when it is let go
                if !held.repeating {
                    self.faded.insert(id.clone(), held.last_event);
                }
            }
        }
        expired
    }

    /// Returns true if the key is held.
    #[must_use]
    pub fn is_pressed(&self, key_id: &str) -> bool {
        self.pressed.contains_key(key_id)
    }

    /// Number of keys held.
    #[must_use]
    pub fn pressed_count(&self) -> usize {
        self.pressed.len()
    }

    /// Presses seen since start.
    #[must_use]
    pub const fn press_count(&self) -> u64 {
        self.press_count
    }

    /// Releases every key.
    pub fn stop(&mut self) {
        self.pressed.clear();
        self.faded.clear();
        tracing::info!(presses = self.press_count, "visualizer stopped");
    }
}

/// Scale that fits a layout of size `extent` into `area`, keeping its
/// aspect ratio.
#[must_use]
pub fn fit_scale(extent: (i32, i32), area: (i32, i32)) -> f64 {
    if extent.0 <= 0 || extent.1 <= 0 || area.0 <= 0 || area.1 <= 0 {
        return 1.0;
    }
    let w = f64::from(area.0) / f64::from(extent.0);
    let h = f64::from(area.1) / f64::from(extent.1);
    w.min(h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::ScanCodeTable;
    use crate::models::{KeyBinding, KeyDefinition, KeyRect};

    fn layout() -> Layout {
        let mut layout = Layout::new("t");
        layout.add_key(KeyDefinition::bound(&KeyBinding::new("a", 30), KeyRect::default()));
        layout.add_key(KeyDefinition::bound(&KeyBinding::new("space", 57), KeyRect::default()));
        layout
    }

    fn event(code: u16, kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new(&ScanCodeTable::load().unwrap(), code, kind)
    }

    #[test]
    fn test_sound_only_on_press_edge() {
        let layout = layout();
        let mut vis = Visualizer::start(&layout, None).unwrap();
        let now = Instant::now();

        let first = vis.apply(&event(30, KeyEventKind::Press), now).unwrap();
        assert!(first.pressed && first.play_sound);
        assert_eq!(first.key_bind, "a");
        assert_eq!(first.key_id, layout.keys[0].id);

        assert!(vis.apply(&event(30, KeyEventKind::Repeat), now).is_none());
        assert!(vis.apply(&event(30, KeyEventKind::Press), now).is_none());
        assert!(vis.is_pressed(&layout.keys[0].id));

        let released = vis.apply(&event(30, KeyEventKind::Release), now).unwrap();
        assert!(!released.pressed && !released.play_sound);
        assert!(vis.apply(&event(30, KeyEventKind::Release), now).is_none());

        assert!(vis.apply(&event(30, KeyEventKind::Press), now).unwrap().play_sound);
        assert_eq!(vis.press_count(), 2);
    }

    #[test]
    fn test_unrouted_codes_are_ignored() {
        let mut vis = Visualizer::start(&layout(), None).unwrap();
        assert!(vis.apply(&event(48, KeyEventKind::Press), Instant::now()).is_none());
        assert_eq!(vis.pressed_count(), 0);
    }

    #[test]
    fn test_synthetic_release() {
        let layout = layout();
        let mut vis = Visualizer::start(&layout, Some(Duration::from_millis(150))).unwrap();
        let t0 = Instant::now();
        vis.apply(&event(57, KeyEventKind::Press), t0);

        assert!(vis.tick(t0 + Duration::from_millis(100)).is_empty());
        // a repeat refreshes the hold
        vis.apply(&event(57, KeyEventKind::Press), t0 + Duration::from_millis(100));
        assert!(vis.tick(t0 + Duration::from_millis(200)).is_empty());

        let released = vis.tick(t0 + Duration::from_millis(260));
        assert_eq!(released, vec![layout.keys[1].id.clone()]);
        assert!(!vis.is_pressed(&layout.keys[1].id));
    }

    #[test]
    fn test_held_key_sounds_once_across_synthetic_release() {
        let layout = layout();
        let mut vis = Visualizer::start(&layout, Some(Duration::from_millis(150))).unwrap();
        let t0 = Instant::now();
        let first = vis.apply(&event(30, KeyEventKind::Press), t0).unwrap();
        assert!(first.play_sound);

        // Released synthetically while waiting for the OS repeat delay
        let mut t = t0;
        while t < t0 + Duration::from_millis(500) {
            t += Duration::from_millis(16);
            vis.tick(t);
        }
        assert!(!vis.is_pressed(&layout.keys[0].id));

        let repeat = vis.apply(&event(30, KeyEventKind::Press), t).unwrap();
        assert!(repeat.pressed);
        assert!(!repeat.play_sound);
        assert!(vis.is_pressed(&layout.keys[0].id));
        assert_eq!(vis.press_count(), 1);

        // Fast repeats keep it lit without sound
        let t = t + Duration::from_millis(33);
        assert!(vis.apply(&event(30, KeyEventKind::Press), t).is_none());
    }

    #[test]
    fn test_press_after_repeat_stream_or_grace_sounds_again() {
        let mut vis = Visualizer::start(&layout(), Some(Duration::from_millis(150))).unwrap();
        let t0 = Instant::now();

        // Held and repeating, then let go
        vis.apply(&event(30, KeyEventKind::Press), t0);
        vis.apply(&event(30, KeyEventKind::Press), t0 + Duration::from_millis(100));
        vis.tick(t0 + Duration::from_millis(300));
        let next = vis.apply(&event(30, KeyEventKind::Press), t0 + Duration::from_millis(400));
        assert!(next.unwrap().play_sound);

        // Tapped once, pressed again well after the grace period
        vis.tick(t0 + Duration::from_millis(600));
        let late = t0 + Duration::from_millis(400) + REPEAT_GRACE;
        assert!(vis.apply(&event(30, KeyEventKind::Press), late).unwrap().play_sound);
        assert_eq!(vis.press_count(), 3);
    }

    #[test]
    fn test_no_synthetic_release_when_source_reports_releases() {
        let mut vis = Visualizer::start(&layout(), None).unwrap();
        let t0 = Instant::now();
        vis.apply(&event(57, KeyEventKind::Press), t0);
        assert!(vis.tick(t0 + Duration::from_secs(10)).is_empty());
        vis.stop();
        assert_eq!(vis.pressed_count(), 0);
    }

    #[test]
    fn test_start_rejects_duplicates() {
        let mut layout = layout();
        layout.keys[1].scan_code = Some(30);
        assert!(Visualizer::start(&layout, None).is_err());
    }

    #[test]
    fn test_fit_scale() {
        assert!((fit_scale((800, 400), (400, 400)) - 0.5).abs() < f64::EPSILON);
        assert!((fit_scale((100, 100), (300, 200)) - 2.0).abs() < f64::EPSILON);
        assert!((fit_scale((0, 0), (300, 200)) - 1.0).abs() < f64::EPSILON);
    }
}
