// Navigation action handlers

use crate::tui::AppState;
use anyhow::Result;

/// Handle cursor movement by whole cells
pub fn handle_cursor(state: &mut AppState, columns: i32, rows: i32) -> Result<bool> {
    state.move_cursor(columns, rows);
    state.clear_error();
    Ok(false)
}
