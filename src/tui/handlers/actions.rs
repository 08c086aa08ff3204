//! Action dispatch from shortcuts to handlers.

use anyhow::Result;

use crate::shortcuts::Action;
use crate::tui::AppState;

use super::action_handlers::{file_ops, key_ops, modes, navigation, selection};

/// Dispatch action to appropriate handler
pub fn dispatch_action(state: &mut AppState, action: Action) -> Result<bool> {
    tracing::trace!(action = action.id(), "dispatch");

    match action {
        // Cursor
        Action::CursorUp => navigation::handle_cursor(state, 0, -1),
        Action::CursorDown => navigation::handle_cursor(state, 0, 1),
        Action::CursorLeft => navigation::handle_cursor(state, -1, 0),
        Action::CursorRight => navigation::handle_cursor(state, 1, 0),

        // Key editing
        Action::NewKey => key_ops::handle_new_key(state),
        Action::SelectAtCursor => selection::handle_select_at_cursor(state),
        Action::EditLabel => key_ops::handle_edit_label(state),
        Action::RebindKey => key_ops::handle_rebind_key(state),
        Action::NudgeUp => key_ops::handle_nudge(state, 0, -1),
        Action::NudgeDown => key_ops::handle_nudge(state, 0, 1),
        Action::NudgeLeft => key_ops::handle_nudge(state, -1, 0),
        Action::NudgeRight => key_ops::handle_nudge(state, 1, 0),
        Action::GrowWidth => key_ops::handle_resize(state, 1, 0),
        Action::ShrinkWidth => key_ops::handle_resize(state, -1, 0),
        Action::GrowHeight => key_ops::handle_resize(state, 0, 1),
        Action::ShrinkHeight => key_ops::handle_resize(state, 0, -1),
        Action::DeleteSelected => key_ops::handle_delete_selected(state),
        Action::ClearLayout => key_ops::handle_clear_layout(state),

        // Selection
        Action::SelectNext => selection::handle_cycle(state, true),
        Action::SelectPrevious => selection::handle_cycle(state, false),
        Action::SelectAll => selection::handle_select_all(state),
        Action::ClearSelection => selection::handle_clear_selection(state),

        // File operations
        Action::Save => file_ops::handle_save(state),
        Action::SaveAs => file_ops::handle_save_as(state),
        Action::OpenLayout => file_ops::handle_open_layout(state),
        Action::Quit => file_ops::handle_quit(state),

        // Modes and view
        Action::ToggleVisualizer => modes::handle_toggle_visualizer(state),
        Action::ToggleToolbar => modes::handle_toggle_toolbar(state),
        Action::ToggleSound => modes::handle_toggle_sound(state),
        Action::ToggleHelp => modes::handle_toggle_help(state),
    }
}
