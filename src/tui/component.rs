//! Component trait for popups.
//!
//! A popup owns its state, handles its own keys and renders itself. It talks
//! back to the application only through the events it returns.

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::tui::Theme;

/// A component that can be rendered and handle input.
pub trait Component {
    /// Event type this component can emit
    type Event;

    /// Handle keyboard input.
    ///
    /// Returns `Some(Event)` if the parent has to act, `None` if the key was
    /// handled internally.
    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event>;

    /// Render the component within `area`.
    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme);

    /// Whether the component has finished and should be closed.
    fn should_close(&self) -> bool {
        false
    }
}
