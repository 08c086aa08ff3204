//! Waits for the physical key a visual key should follow.
//!
//! The popup takes the next key press from the listener, whichever source
//! it reads, so keys the terminal never sees can be bound with evdev.

use crossterm::event::{KeyCode, KeyEvent as TermKeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{centered_rect, Component, Theme};
use crate::input::{KeyEvent, KeyEventKind};
use crate::models::KeyBinding;

/// What the captured key is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindTarget {
    /// A new key centred on this canvas point
    NewKey {
        /// Canvas x
        x: i32,
        /// Canvas y
        y: i32,
    },
    /// Rebinding an existing key
    Rebind {
        /// Key being rebound
        key_id: String,
    },
}

/// Events emitted by the capture popup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindCaptureEvent {
    /// A key was pressed
    Captured(KeyBinding),
    /// User gave up
    Cancelled,
}

/// Binding capture component state
#[derive(Debug, Clone)]
pub struct BindCapture {
    target: BindTarget,
    source_note: String,
}

impl BindCapture {
    /// Creates the popup; `source_note` tells the user where keys are read from.
    pub fn new(target: BindTarget, source_note: impl Into<String>) -> Self {
        Self {
            target,
            source_note: source_note.into(),
        }
    }

    /// What the binding is for.
    #[must_use]
    pub const fn target(&self) -> &BindTarget {
        &self.target
    }

    /// Offers a listener event; the first press is captured.
    pub fn capture(&mut self, event: &KeyEvent) -> Option<BindCaptureEvent> {
        (event.kind == KeyEventKind::Press).then(|| {
            BindCaptureEvent::Captured(KeyBinding::new(event.name.clone(), event.scan_code))
        })
    }
}

impl Component for BindCapture {
    type Event = BindCaptureEvent;

    /// Only Ctrl+C is handled here; Esc and every other key can be bound.
    fn handle_input(&mut self, key: TermKeyEvent) -> Option<Self::Event> {
        (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
            .then_some(BindCaptureEvent::Cancelled)
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let dialog_area = centered_rect(50, 30, area);
        let palette = &theme.canvas;
        let dialog_style = Style::default()
            .fg(palette.dialog_text)
            .bg(palette.dialog_background);

        f.render_widget(Clear, dialog_area);

        let title = match self.target {
            BindTarget::NewKey { .. } => " New Key ",
            BindTarget::Rebind { .. } => " Rebind Key ",
        };

        let key_style = Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD);
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Press the physical key to bind...",
                dialog_style.add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                self.source_note.as_str(),
                Style::default().fg(theme.text_muted),
            )),
            Line::from(""),
            Line::from(vec![Span::styled("Ctrl+C", key_style), Span::raw(" Cancel")]),
        ];

        let popup = Paragraph::new(text)
            .style(dialog_style)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.input_border))
                    .style(dialog_style),
            );
        f.render_widget(popup, dialog_area);
    }
}
