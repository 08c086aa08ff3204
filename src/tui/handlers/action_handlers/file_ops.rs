// File operations action handlers

use crate::services::LayoutService;
use crate::tui::{AppState, Mode, PopupType};
use anyhow::Result;

/// Handle quit action
pub fn handle_quit(state: &mut AppState) -> Result<bool> {
    if state.canvas.is_dirty() {
        state.active_popup = Some(PopupType::UnsavedChangesPrompt);
        Ok(false)
    } else {
        Ok(true)
    }
}

/// Handle save action
pub fn handle_save(state: &mut AppState) -> Result<bool> {
    if state.mode == Mode::Visualizer {
        state.set_status("Saving is disabled while visualizing");
        return Ok(false);
    }
    if let Some(path) = state.source_path.clone() {
        match state.save_to(&path) {
            Ok(()) => state.set_status(format!("Saved to {}", path.display())),
            Err(e) => state.set_error(format!("Save failed: {e:#}")),
        }
    } else {
        state.open_save_as(false);
    }
    Ok(false)
}

/// Handle save as action
pub fn handle_save_as(state: &mut AppState) -> Result<bool> {
    if state.mode == Mode::Visualizer {
        state.set_status("Saving is disabled while visualizing");
        return Ok(false);
    }
    state.open_save_as(false);
    state.set_status("Save As - type a name, Enter: save, Esc: cancel");
    Ok(false)
}

/// Perform the save under a new layout name
///
/// The canvas keeps its old name when the write fails.
pub fn perform_save_as(state: &mut AppState, name: &str) -> Result<()> {
    let previous = state.canvas.layout().metadata.clone();
    let was_dirty = state.canvas.is_dirty();
    state.canvas.rename(name);

    let path = LayoutService::default_layout_path(&state.layouts_dir, name);
    if let Err(e) = state.save_to(&path) {
        state.canvas.restore_metadata(previous, was_dirty);
        return Err(e);
    }
    state.set_status(format!("Saved to {}", path.display()));
    Ok(())
}

/// Handle open layout action
pub fn handle_open_layout(state: &mut AppState) -> Result<bool> {
    if let Err(e) = state.open_layout_picker() {
        state.set_error(format!("Cannot list layouts: {e:#}"));
    }
    Ok(false)
}
