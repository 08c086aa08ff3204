// Mode and view action handlers

use crate::tui::{AppState, Mode};
use anyhow::Result;

/// Handle switching between the editor and the visualizer
pub fn handle_toggle_visualizer(state: &mut AppState) -> Result<bool> {
    match state.mode {
        Mode::Editor => match state.enter_visualizer() {
            Ok(()) => state.set_status("Visualizer - press keys, Ctrl+V: back to the editor"),
            Err(e) => state.set_error(format!("Cannot start the visualizer: {e:#}")),
        },
        Mode::Visualizer => {
            state.leave_visualizer();
            state.set_status("Editor");
        }
    }
    Ok(false)
}

/// Handle toolbar visibility toggle
pub fn handle_toggle_toolbar(state: &mut AppState) -> Result<bool> {
    state.show_toolbar = !state.show_toolbar;
    state.ensure_cursor_visible();
    Ok(false)
}

/// Handle sound toggle
pub fn handle_toggle_sound(state: &mut AppState) -> Result<bool> {
    let enabled = !state.sounds.is_enabled();
    state.sounds.set_enabled(enabled);
    if enabled {
        state.set_status(format!("Sound on ({})", state.sounds.player_name()));
    } else {
        state.set_status("Sound off");
    }
    Ok(false)
}

/// Handle help toggle
pub fn handle_toggle_help(state: &mut AppState) -> Result<bool> {
    state.open_help_overlay();
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeyBinding;
    use crate::tui::test_support::state_in;
    use tempfile::TempDir;

    #[test]
    fn test_visualizer_refuses_duplicate_bindings() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        let id = state
            .canvas
            .create_key_at(100, 100, &KeyBinding::new("a", 30))
            .unwrap();
        // Bypass the canvas check to get a broken layout
        let mut layout = state.canvas.layout().clone();
        let mut copy = layout.find_key(&id).unwrap().clone();
        copy.id = "copy".to_string();
        layout.add_key(copy);
        state.canvas.replace_layout(layout);

        handle_toggle_visualizer(&mut state).unwrap();
        assert_eq!(state.mode, Mode::Editor);
        assert!(state.error_message.is_some());
    }

    #[test]
    fn test_toggle_sound_flips_state() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        assert!(!state.sounds.is_enabled());

        handle_toggle_sound(&mut state).unwrap();
        assert!(state.sounds.is_enabled());
        handle_toggle_sound(&mut state).unwrap();
        assert!(!state.sounds.is_enabled());
    }
}
