//! Mouse input on the editor canvas.

use anyhow::Result;
use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use std::time::Instant;

use crate::tui::{AppState, BindTarget, Mode, DOUBLE_CLICK};

/// Cells scrolled per wheel step.
const WHEEL_STEP: i32 = 3;

/// Handle a mouse event
///
/// Only the editor canvas takes the mouse, and only while no popup or error
/// is shown.
pub fn handle_mouse_event(state: &mut AppState, mouse: MouseEvent, now: Instant) -> Result<()> {
    if state.mode != Mode::Editor
        || state.active_popup.is_some()
        || state.error_message.is_some()
    {
        return Ok(());
    }

    let horizontal = mouse.modifiers.contains(KeyModifiers::SHIFT);
    match mouse.kind {
        MouseEventKind::ScrollUp if horizontal => state.scroll_by(-WHEEL_STEP, 0),
        MouseEventKind::ScrollDown if horizontal => state.scroll_by(WHEEL_STEP, 0),
        MouseEventKind::ScrollUp => state.scroll_by(0, -WHEEL_STEP),
        MouseEventKind::ScrollDown => state.scroll_by(0, WHEEL_STEP),
        MouseEventKind::ScrollLeft => state.scroll_by(-WHEEL_STEP, 0),
        MouseEventKind::ScrollRight => state.scroll_by(WHEEL_STEP, 0),

        MouseEventKind::Down(MouseButton::Left) => {
            if let Some((x, y)) = canvas_point(state, mouse) {
                handle_left_press(state, mouse, x, y, now);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if state.canvas.is_dragging() {
                if let Some((x, y)) = canvas_point(state, mouse) {
                    state.canvas.update_drag(x, y);
                }
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if state.canvas.end_drag() {
                state.set_status("Moved");
            }
        }

        MouseEventKind::Down(MouseButton::Right) => {
            if let Some((x, y)) = canvas_point(state, mouse) {
                if let Some(id) = state.canvas.key_at(x, y).map(str::to_string) {
                    state.canvas.remove_key(&id);
                    state.set_status("Key deleted");
                }
            }
        }
        _ => {}
    }
    Ok(())
}

/// Layout point under the pointer, if it is on the canvas.
fn canvas_point(state: &AppState, mouse: MouseEvent) -> Option<(i32, i32)> {
    let (x, y) = state.viewport().cell_to_units(mouse.column, mouse.row)?;
    let bounds = state.canvas.bounds();
    (x < bounds.width && y < bounds.height).then_some((x, y))
}

fn handle_left_press(state: &mut AppState, mouse: MouseEvent, x: i32, y: i32, now: Instant) {
    let double = state.last_click.is_some_and(|(at, column, row)| {
        column == mouse.column
            && row == mouse.row
            && now.saturating_duration_since(at) <= DOUBLE_CLICK
    });
    state.last_click = (!double).then_some((now, mouse.column, mouse.row));
    state.place_cursor(x, y);

    let hit = state.canvas.key_at(x, y).map(str::to_string);

    if mouse.modifiers.contains(KeyModifiers::CONTROL) {
        if let Some(id) = hit {
            state.canvas.toggle_selected(&id);
        }
        return;
    }

    match hit {
        Some(id) if double => {
            state.canvas.select_only(&id);
            state.open_label_editor(&id);
        }
        Some(id) => {
            if state.canvas.is_selected(&id) {
                if let Some(handle) = state.canvas.handle_at(&id, x, y) {
                    state.canvas.begin_resize(&id, handle, x, y);
                    return;
                }
            } else {
                state.canvas.select_only(&id);
            }
            state.canvas.begin_move(x, y);
        }
        None => {
            state.canvas.clear_selection();
            state.open_bind_capture(BindTarget::NewKey { x, y });
            state.set_status("Press the key to bind, Ctrl+C to cancel");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeyBinding;
    use crate::tui::PopupType;
    use std::time::Duration;
    use crate::tui::test_support::state_in;
    use tempfile::TempDir;

    fn mouse(kind: MouseEventKind, (column, row): (u16, u16)) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn cell(state: &AppState, x: i32, y: i32) -> (u16, u16) {
        state.viewport().units_to_cell(x, y).unwrap()
    }

    #[test]
    fn test_click_on_empty_canvas_starts_new_key() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        let at = cell(&state, 200, 100);

        handle_mouse_event(
            &mut state,
            mouse(MouseEventKind::Down(MouseButton::Left), at),
            Instant::now(),
        )
        .unwrap();
        assert_eq!(state.active_popup, Some(PopupType::BindCapture));
        assert_eq!(state.cursor, (202, 105));
    }

    #[test]
    fn test_drag_moves_selected_key() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        let id = state
            .canvas
            .create_key_at(200, 100, &KeyBinding::new("a", 30))
            .unwrap();
        state.canvas.clear_selection();
        let now = Instant::now();

        let from = cell(&state, 200, 100);
        let to = (from.0 + 4, from.1 + 2);
        handle_mouse_event(&mut state, mouse(MouseEventKind::Down(MouseButton::Left), from), now)
            .unwrap();
        handle_mouse_event(&mut state, mouse(MouseEventKind::Drag(MouseButton::Left), to), now)
            .unwrap();
        handle_mouse_event(&mut state, mouse(MouseEventKind::Up(MouseButton::Left), to), now)
            .unwrap();

        let rect = state.canvas.layout().find_key(&id).unwrap().rect();
        assert_eq!((rect.x, rect.y), (200, 100));
        assert!(state.canvas.is_selected(&id));
        assert!(!state.canvas.is_dragging());
    }

    #[test]
    fn test_double_click_opens_label_editor() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state
            .canvas
            .create_key_at(200, 100, &KeyBinding::new("a", 30))
            .unwrap();
        let at = cell(&state, 200, 100);
        let now = Instant::now();

        for offset in [0, 100] {
            let when = now + Duration::from_millis(offset);
            handle_mouse_event(&mut state, mouse(MouseEventKind::Down(MouseButton::Left), at), when)
                .unwrap();
            handle_mouse_event(&mut state, mouse(MouseEventKind::Up(MouseButton::Left), at), when)
                .unwrap();
        }
        assert_eq!(state.active_popup, Some(PopupType::LabelEditor));
    }

    #[test]
    fn test_right_click_deletes_key() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state
            .canvas
            .create_key_at(200, 100, &KeyBinding::new("a", 30))
            .unwrap();
        let at = cell(&state, 200, 100);

        handle_mouse_event(
            &mut state,
            mouse(MouseEventKind::Down(MouseButton::Right), at),
            Instant::now(),
        )
        .unwrap();
        assert!(state.canvas.layout().keys.is_empty());
    }

    #[test]
    fn test_mouse_ignored_in_visualizer() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state.enter_visualizer().unwrap();
        let at = (10, 10);

        handle_mouse_event(
            &mut state,
            mouse(MouseEventKind::Down(MouseButton::Left), at),
            Instant::now(),
        )
        .unwrap();
        assert!(state.active_popup.is_none());
    }
}
