// Key editing action handlers

use crate::tui::{AppState, BindTarget};
use anyhow::Result;

use super::selection::target_key;

/// Handle new key action: waits for the physical key, then places the key
/// at the cursor
pub fn handle_new_key(state: &mut AppState) -> Result<bool> {
    let (x, y) = state.cursor;
    state.open_bind_capture(BindTarget::NewKey { x, y });
    state.set_status("Press the key to bind, Ctrl+C to cancel");
    Ok(false)
}

/// Handle edit label action
pub fn handle_edit_label(state: &mut AppState) -> Result<bool> {
    if let Some(id) = target_key(state) {
        state.open_label_editor(&id);
    } else {
        state.set_status("Select a key first");
    }
    Ok(false)
}

/// Handle rebind action
pub fn handle_rebind_key(state: &mut AppState) -> Result<bool> {
    if let Some(key_id) = target_key(state) {
        state.open_bind_capture(BindTarget::Rebind { key_id });
        state.set_status("Press the new key, Ctrl+C to cancel");
    } else {
        state.set_status("Select a key first");
    }
    Ok(false)
}

/// Handle nudging the selection by one step
pub fn handle_nudge(state: &mut AppState, dx: i32, dy: i32) -> Result<bool> {
    if state.canvas.selected_ids().is_empty() {
        state.set_status("Select a key first");
        return Ok(false);
    }
    let step = state.config.editor.nudge_step;
    state.canvas.move_selected(dx * step, dy * step);
    Ok(false)
}

/// Handle growing or shrinking the selection by one step
pub fn handle_resize(state: &mut AppState, dw: i32, dh: i32) -> Result<bool> {
    if state.canvas.selected_ids().is_empty() {
        state.set_status("Select a key first");
        return Ok(false);
    }
    let step = state.config.editor.nudge_step;
    state.canvas.resize_selected(dw * step, dh * step);
    Ok(false)
}

/// Handle delete action
pub fn handle_delete_selected(state: &mut AppState) -> Result<bool> {
    let removed = state.canvas.remove_selected();
    if removed == 0 {
        state.set_status("Nothing selected");
    } else {
        state.set_status(format!("Deleted {removed} key(s)"));
    }
    Ok(false)
}

/// Handle clearing the whole layout
pub fn handle_clear_layout(state: &mut AppState) -> Result<bool> {
    let count = state.canvas.layout().keys.len();
    state.canvas.clear();
    state.set_status(format!("Cleared {count} key(s)"));
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeyBinding;
    use crate::tui::test_support::state_in;
    use crate::tui::{ActiveComponent, PopupType};
    use tempfile::TempDir;

    #[test]
    fn test_new_key_opens_capture_at_cursor() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state.move_cursor(10, 4);

        handle_new_key(&mut state).unwrap();
        assert_eq!(state.active_popup, Some(PopupType::BindCapture));
        match &state.active_component {
            Some(ActiveComponent::BindCapture(capture)) => {
                assert_eq!(capture.target(), &BindTarget::NewKey { x: 52, y: 45 });
            }
            other => panic!("unexpected component {other:?}"),
        }
    }

    #[test]
    fn test_nudge_and_resize_use_configured_step() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        let id = state
            .canvas
            .create_key_at(200, 100, &KeyBinding::new("a", 30))
            .unwrap();

        handle_nudge(&mut state, 1, 0).unwrap();
        handle_resize(&mut state, 0, 1).unwrap();
        let rect = state.canvas.layout().find_key(&id).unwrap().rect();
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (185, 80, 40, 45));
    }

    #[test]
    fn test_edit_label_needs_a_key() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());

        handle_edit_label(&mut state).unwrap();
        assert!(state.active_popup.is_none());
        assert_eq!(state.status_message, "Select a key first");
    }

    #[test]
    fn test_delete_selected_reports_count() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state
            .canvas
            .create_key_at(100, 100, &KeyBinding::new("a", 30))
            .unwrap();

        handle_delete_selected(&mut state).unwrap();
        assert!(state.canvas.layout().keys.is_empty());
        assert_eq!(state.status_message, "Deleted 1 key(s)");
    }
}
