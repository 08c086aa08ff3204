//! Physical key events from the listener.

use std::time::{Duration, Instant};

use crate::input::{ActiveSource, KeyEvent};
use crate::models::KeyBinding;
use crate::tui::{ActiveComponent, AppState, BindCaptureEvent, BindTarget, Mode};

/// Terminal keys are ignored this long after a device capture.
const ECHO_WINDOW: Duration = Duration::from_millis(150);

/// Drains the listener once per frame.
///
/// A waiting bind capture takes the first press; otherwise the visualizer
/// consumes the events. Anything else is discarded.
pub fn handle_listener_events(state: &mut AppState, now: Instant) {
    let events = state.listener.poll();

    if let Some(ActiveComponent::BindCapture(capture)) = &mut state.active_component {
        let captured = events.iter().find_map(|event| capture.capture(event));
        if let Some(BindCaptureEvent::Captured(binding)) = captured {
            let target = capture.target().clone();
            complete_bind_capture(state, &target, &binding, now);
        }
        return;
    }

    if state.mode == Mode::Visualizer {
        visualize(state, &events, now);
    }
}

fn complete_bind_capture(
    state: &mut AppState,
    target: &BindTarget,
    binding: &KeyBinding,
    now: Instant,
) {
    state.close_component();

    let result = match target {
        BindTarget::NewKey { x, y } => state.canvas.create_key_at(*x, *y, binding).map(|_| ()),
        BindTarget::Rebind { key_id } => state.canvas.rebind(key_id, binding),
    };
    match result {
        Ok(()) => state.set_status(format!("Bound to {} ({})", binding.name, binding.scan_code)),
        Err(e) => state.set_error(format!("{e:#}")),
    }

    // The terminal also delivers the key the devices just reported
    if state.listener.source() == ActiveSource::Evdev {
        state.suppress_keys_until = Some(now + ECHO_WINDOW);
    }
}

fn visualize(state: &mut AppState, events: &[KeyEvent], now: Instant) {
    let Some(visualizer) = state.visualizer.as_mut() else {
        return;
    };

    for event in events {
        if let Some(highlight) = visualizer.apply(event, now) {
            if highlight.play_sound {
                state.sounds.play_for(&highlight.key_bind);
            }
        }
    }
    visualizer.tick(now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::state_in;
    use crossterm::event::{KeyCode, KeyEvent as TermKeyEvent, KeyModifiers};
    use tempfile::TempDir;

    #[test]
    fn test_capture_creates_key_at_target() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state.open_bind_capture(BindTarget::NewKey { x: 200, y: 100 });

        state
            .listener
            .feed_terminal(&TermKeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        handle_listener_events(&mut state, Instant::now());

        assert!(state.active_popup.is_none());
        let keys = &state.canvas.layout().keys;
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].key_bind, "a");
        assert!(keys[0].rect().contains(200, 100));
        assert!(state.suppress_keys_until.is_none());
    }

    #[test]
    fn test_capture_rejects_duplicate_binding() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state
            .canvas
            .create_key_at(100, 100, &KeyBinding::new("a", 30))
            .unwrap();
        state.open_bind_capture(BindTarget::NewKey { x: 400, y: 200 });

        state
            .listener
            .feed_terminal(&TermKeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        handle_listener_events(&mut state, Instant::now());

        assert_eq!(state.canvas.layout().keys.len(), 1);
        assert!(state.error_message.is_some());
    }

    #[test]
    fn test_visualizer_lights_and_releases_keys() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        let id = state
            .canvas
            .create_key_at(100, 100, &KeyBinding::new("a", 30))
            .unwrap();
        state.enter_visualizer().unwrap();

        let start = Instant::now();
        state
            .listener
            .feed_terminal(&TermKeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        handle_listener_events(&mut state, start);
        let visualizer = state.visualizer.as_ref().unwrap();
        assert!(visualizer.is_pressed(&id));
        assert_eq!(visualizer.press_count(), 1);

        // Terminal input has no releases, so the key goes dark on its own
        handle_listener_events(&mut state, start + Duration::from_millis(200));
        assert!(!state.visualizer.as_ref().unwrap().is_pressed(&id));
    }

    #[test]
    fn test_events_outside_modes_are_discarded() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state
            .listener
            .feed_terminal(&TermKeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));

        handle_listener_events(&mut state, Instant::now());
        assert!(state.listener.poll().is_empty());
        assert!(state.canvas.layout().keys.is_empty());
    }
}
