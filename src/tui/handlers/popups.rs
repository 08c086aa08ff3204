//! Popup input handlers.

use anyhow::Result;
use crossterm::event::{self, KeyCode, KeyEventKind};

use crate::input::ActiveSource;
use crate::tui::{
    ActiveComponent, AppState, BindCaptureEvent, Component, PickerAction, PopupType,
    TextPromptEvent,
};

use super::action_handlers::file_ops;

/// Handle input for the label editor
fn handle_label_editor_input(state: &mut AppState, key: event::KeyEvent) -> Result<bool> {
    let Some(ActiveComponent::LabelEditor { prompt, key_id }) = &mut state.active_component
    else {
        return Ok(false);
    };
    let key_id = key_id.clone();

    match prompt.handle_input(key) {
        Some(TextPromptEvent::Confirmed(label)) => {
            state.close_component();
            match state.canvas.set_label(&key_id, &label) {
                Ok(()) => state.set_status(format!("Label set to '{label}'")),
                Err(e) => state.set_error(format!("{e:#}")),
            }
        }
        Some(TextPromptEvent::Cancelled) => {
            state.close_component();
            state.set_status("Cancelled");
        }
        None => {}
    }
    Ok(false)
}

/// Handle input for the save-as prompt
fn handle_save_as_input(state: &mut AppState, key: event::KeyEvent) -> Result<bool> {
    let Some(ActiveComponent::SaveAs { prompt, quit_after }) = &mut state.active_component
    else {
        return Ok(false);
    };
    let quit_after = *quit_after;

    match prompt.handle_input(key) {
        Some(TextPromptEvent::Confirmed(name)) => {
            state.close_component();
            match file_ops::perform_save_as(state, &name) {
                Ok(()) if quit_after => {
                    state.should_quit = true;
                    return Ok(true);
                }
                Ok(()) => {}
                Err(e) => state.set_error(format!("Save failed: {e:#}")),
            }
        }
        Some(TextPromptEvent::Cancelled) => {
            state.close_component();
            state.set_status("Save cancelled");
        }
        None => {}
    }
    Ok(false)
}

/// Handle terminal keys while waiting for a binding
///
/// Ctrl+C cancels. With the terminal source the key itself is the capture;
/// with evdev the devices deliver it and terminal keys are ignored.
fn handle_bind_capture_input(state: &mut AppState, key: event::KeyEvent) -> Result<bool> {
    let Some(ActiveComponent::BindCapture(capture)) = &mut state.active_component else {
        return Ok(false);
    };

    if let Some(BindCaptureEvent::Cancelled) = capture.handle_input(key) {
        state.close_component();
        state.set_status("Binding cancelled");
        return Ok(false);
    }

    if state.listener.source() == ActiveSource::Terminal && key.kind == KeyEventKind::Press {
        state.listener.feed_terminal(&key);
    }
    Ok(false)
}

/// Handle input for the layout picker
fn handle_layout_picker_input(state: &mut AppState, key: event::KeyEvent) -> Result<bool> {
    let Some(ActiveComponent::LayoutPicker(picker)) = &mut state.active_component else {
        return Ok(false);
    };

    match picker.handle_input(key) {
        Some(PickerAction::CreateNew) => {
            state.close_component();
            state.new_layout();
            state.set_status("New layout");
        }
        Some(PickerAction::LoadLayout(path)) => {
            state.close_component();
            match state.load_layout(&path) {
                Ok(()) => state.set_status(format!("Loaded {}", path.display())),
                Err(e) => state.set_error(format!("Failed to load layout: {e:#}")),
            }
        }
        Some(PickerAction::Cancel) => {
            state.close_component();
            state.set_status("Layout selection cancelled");
        }
        None => {}
    }
    Ok(false)
}

/// Handle input for help overlay
fn handle_help_overlay_input(state: &mut AppState, key: event::KeyEvent) -> Result<bool> {
    let Some(ActiveComponent::HelpOverlay(help)) = &mut state.active_component else {
        return Ok(false);
    };

    if help.handle_input(key).is_some() {
        state.close_component();
    }
    Ok(false)
}

/// Handle input for unsaved changes prompt
fn handle_unsaved_prompt_input(state: &mut AppState, key: event::KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('s' | 'S') => {
            // Save and quit; an untitled layout needs a name first
            let Some(path) = state.source_path.clone() else {
                state.active_popup = None;
                state.open_save_as(true);
                return Ok(false);
            };
            if let Err(e) = state.save_to(&path) {
                state.active_popup = None;
                state.set_error(format!("Save failed: {e:#}"));
                return Ok(false);
            }
            state.should_quit = true;
            Ok(true)
        }
        KeyCode::Char('q' | 'Q') => {
            // Quit without saving
            state.should_quit = true;
            Ok(true)
        }
        KeyCode::Esc => {
            // Cancel
            state.active_popup = None;
            state.set_status("Cancelled");
            Ok(false)
        }
        _ => Ok(false),
    }
}

/// Handle input when popup is active (dispatcher)
pub fn handle_popup_input(state: &mut AppState, key: event::KeyEvent) -> Result<bool> {
    let popup_type = state.active_popup.clone();

    match popup_type {
        Some(PopupType::LabelEditor) => handle_label_editor_input(state, key),
        Some(PopupType::SaveAs) => handle_save_as_input(state, key),
        Some(PopupType::BindCapture) => handle_bind_capture_input(state, key),
        Some(PopupType::LayoutPicker) => handle_layout_picker_input(state, key),
        Some(PopupType::HelpOverlay) => handle_help_overlay_input(state, key),
        Some(PopupType::UnsavedChangesPrompt) => handle_unsaved_prompt_input(state, key),
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeyBinding;
    use crate::tui::test_support::state_in;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_popup_input(state, press(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_label_editor_sets_label() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        let id = state
            .canvas
            .create_key_at(100, 100, &KeyBinding::new("a", 30))
            .unwrap();
        state.open_label_editor(&id);

        // Initial text is the current label
        for _ in 0..4 {
            handle_popup_input(&mut state, press(KeyCode::Backspace)).unwrap();
        }
        type_text(&mut state, "Shift");
        handle_popup_input(&mut state, press(KeyCode::Enter)).unwrap();

        assert!(state.active_popup.is_none());
        assert_eq!(state.canvas.layout().find_key(&id).unwrap().label, "Shift");
    }

    #[test]
    fn test_label_editor_cancel_keeps_label() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        let id = state
            .canvas
            .create_key_at(100, 100, &KeyBinding::new("a", 30))
            .unwrap();
        let before = state.canvas.layout().find_key(&id).unwrap().label.clone();
        state.open_label_editor(&id);

        type_text(&mut state, "zz");
        handle_popup_input(&mut state, press(KeyCode::Esc)).unwrap();

        assert!(state.active_popup.is_none());
        assert_eq!(state.canvas.layout().find_key(&id).unwrap().label, before);
    }

    #[test]
    fn test_terminal_bind_capture_takes_next_key() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state.open_bind_capture(crate::tui::BindTarget::NewKey { x: 100, y: 100 });

        handle_popup_input(&mut state, press(KeyCode::Char('q'))).unwrap();
        let events = state.listener.poll();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "q");
        // Capture completes when listener events are processed
        assert_eq!(state.active_popup, Some(PopupType::BindCapture));
    }

    #[test]
    fn test_bind_capture_ctrl_c_cancels() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state.open_bind_capture(crate::tui::BindTarget::NewKey { x: 100, y: 100 });

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        handle_popup_input(&mut state, ctrl_c).unwrap();
        assert!(state.active_popup.is_none());
        assert!(state.listener.poll().is_empty());
    }

    #[test]
    fn test_unsaved_prompt_choices() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state.active_popup = Some(PopupType::UnsavedChangesPrompt);

        assert!(!handle_popup_input(&mut state, press(KeyCode::Esc)).unwrap());
        assert!(state.active_popup.is_none());

        state.active_popup = Some(PopupType::UnsavedChangesPrompt);
        assert!(handle_popup_input(&mut state, press(KeyCode::Char('q'))).unwrap());
        assert!(state.should_quit);
    }

    #[test]
    fn test_unsaved_prompt_save_without_path_asks_for_name() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state.active_popup = Some(PopupType::UnsavedChangesPrompt);

        assert!(!handle_popup_input(&mut state, press(KeyCode::Char('s'))).unwrap());
        assert_eq!(state.active_popup, Some(PopupType::SaveAs));
        assert!(!state.should_quit);
    }

    #[test]
    fn test_unsaved_prompt_save_as_then_quits() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state
            .canvas
            .create_key_at(100, 100, &KeyBinding::new("a", 30))
            .unwrap();
        state.active_popup = Some(PopupType::UnsavedChangesPrompt);
        handle_popup_input(&mut state, press(KeyCode::Char('s'))).unwrap();

        // Replace the suggested name
        for _ in 0..40 {
            handle_popup_input(&mut state, press(KeyCode::Backspace)).unwrap();
        }
        type_text(&mut state, "board");
        assert!(handle_popup_input(&mut state, press(KeyCode::Enter)).unwrap());

        assert!(state.should_quit);
        assert!(!state.canvas.is_dirty());
        assert!(temp.path().join("layouts").join("board.json").exists());
    }

    #[test]
    fn test_plain_save_as_does_not_quit() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state.open_save_as(false);

        type_text(&mut state, "x");
        assert!(!handle_popup_input(&mut state, press(KeyCode::Enter)).unwrap());
        assert!(!state.should_quit);
        assert!(state.source_path.is_some());
    }
}
