// Selection action handlers

use crate::tui::AppState;
use anyhow::Result;

/// Key an editing command applies to: the only selected key, else the key
/// under the cursor.
pub fn target_key(state: &AppState) -> Option<String> {
    state
        .canvas
        .single_selected()
        .map(|key| key.id.clone())
        .or_else(|| {
            state
                .canvas
                .key_at(state.cursor.0, state.cursor.1)
                .map(str::to_string)
        })
}

/// Handle toggling the key under the cursor in the selection
pub fn handle_select_at_cursor(state: &mut AppState) -> Result<bool> {
    let (x, y) = state.cursor;
    match state.canvas.key_at(x, y).map(str::to_string) {
        Some(id) => {
            state.canvas.toggle_selected(&id);
            let count = state.canvas.selected_ids().len();
            state.set_status(format!("{count} selected"));
        }
        None => {
            state.canvas.clear_selection();
            state.set_status("No key under the cursor");
        }
    }
    Ok(false)
}

/// Handle selecting the next or previous key; the cursor follows
pub fn handle_cycle(state: &mut AppState, forward: bool) -> Result<bool> {
    state.canvas.cycle_selection(forward);
    if let Some(key) = state.canvas.single_selected() {
        let rect = key.rect();
        let label = key.display_label().to_string();
        state.place_cursor(rect.x + rect.width / 2, rect.y + rect.height / 2);
        state.set_status(format!("Selected {label}"));
    }
    Ok(false)
}

/// Handle select all action
pub fn handle_select_all(state: &mut AppState) -> Result<bool> {
    state.canvas.select_all();
    let count = state.canvas.selected_ids().len();
    state.set_status(format!("{count} selected"));
    Ok(false)
}

/// Handle clear selection action
pub fn handle_clear_selection(state: &mut AppState) -> Result<bool> {
    if !state.canvas.selected_ids().is_empty() {
        state.canvas.clear_selection();
        state.set_status("Selection cleared");
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeyBinding;
    use crate::tui::test_support::state_in;
    use tempfile::TempDir;

    #[test]
    fn test_cycle_moves_cursor_onto_key() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        let id = state
            .canvas
            .create_key_at(200, 100, &KeyBinding::new("a", 30))
            .unwrap();
        state.canvas.clear_selection();

        handle_cycle(&mut state, true).unwrap();
        assert_eq!(state.canvas.selected_ids(), &[id.clone()]);
        assert_eq!(state.canvas.key_at(state.cursor.0, state.cursor.1), Some(id.as_str()));
    }

    #[test]
    fn test_target_prefers_selection_over_cursor() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        let under_cursor = state
            .canvas
            .create_key_at(20, 20, &KeyBinding::new("a", 30))
            .unwrap();
        let elsewhere = state
            .canvas
            .create_key_at(300, 200, &KeyBinding::new("b", 48))
            .unwrap();

        assert_eq!(target_key(&state), Some(elsewhere));
        state.canvas.clear_selection();
        assert_eq!(target_key(&state), Some(under_cursor));
    }

    #[test]
    fn test_select_at_cursor_toggles() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state
            .canvas
            .create_key_at(20, 20, &KeyBinding::new("a", 30))
            .unwrap();
        state.canvas.clear_selection();

        handle_select_at_cursor(&mut state).unwrap();
        assert_eq!(state.canvas.selected_ids().len(), 1);
        handle_select_at_cursor(&mut state).unwrap();
        assert!(state.canvas.selected_ids().is_empty());
    }
}
