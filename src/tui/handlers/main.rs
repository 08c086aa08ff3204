//! Main UI input handler.

use anyhow::Result;
use crossterm::event::{self, KeyEventKind};

use crate::shortcuts::{contexts, ShortcutRegistry};
use crate::tui::{AppState, Mode};

/// Handle input for main UI
///
/// In the visualizer every key that is not a command is fed to the
/// listener, releases included.
pub fn handle_main_input(state: &mut AppState, key: event::KeyEvent) -> Result<bool> {
    let registry = ShortcutRegistry::new();

    match state.mode {
        Mode::Editor => {
            if key.kind == KeyEventKind::Release {
                return Ok(false);
            }
            match registry.lookup(contexts::EDITOR, key) {
                Some(action) => super::dispatch_action(state, action),
                // No action mapped - ignore key
                None => Ok(false),
            }
        }
        Mode::Visualizer => {
            if key.kind != KeyEventKind::Release {
                if let Some(action) = registry.lookup(contexts::VISUALIZER, key) {
                    return super::dispatch_action(state, action);
                }
            }
            state.listener.feed_terminal(&key);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeyBinding;
    use crate::tui::test_support::state_in;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};
    use tempfile::TempDir;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_editor_ignores_releases() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state.move_cursor(3, 0);
        let before = state.cursor;

        let release = KeyEvent {
            code: KeyCode::Left,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        handle_main_input(&mut state, release).unwrap();
        assert_eq!(state.cursor, before);

        handle_main_input(&mut state, key(KeyCode::Left, KeyModifiers::NONE)).unwrap();
        assert_ne!(state.cursor, before);
    }

    #[test]
    fn test_visualizer_feeds_plain_keys_to_listener() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state
            .canvas
            .create_key_at(100, 100, &KeyBinding::new("x", 45))
            .unwrap();
        state.enter_visualizer().unwrap();

        // 'x' deletes keys in the editor; here it must only light the key
        handle_main_input(&mut state, key(KeyCode::Char('x'), KeyModifiers::NONE)).unwrap();
        assert_eq!(state.canvas.layout().keys.len(), 1);
        let events = state.listener.poll();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].scan_code, 45);

        handle_main_input(&mut state, key(KeyCode::Char('v'), KeyModifiers::CONTROL)).unwrap();
        assert_eq!(state.mode, Mode::Editor);
    }
}
