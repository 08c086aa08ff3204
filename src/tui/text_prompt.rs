//! Single-line text input dialog.
//!
//! Used for key labels and for the save-as file name.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout as RatatuiLayout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{centered_rect, Component, Theme};

/// Events emitted by the text prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextPromptEvent {
    /// User confirmed the text
    Confirmed(String),
    /// User cancelled the prompt
    Cancelled,
}

/// Text prompt component state
#[derive(Debug, Clone)]
pub struct TextPrompt {
    title: String,
    field: String,
    input: String,
    /// Cursor position in characters
    cursor: usize,
    required: bool,
    error: Option<String>,
}

impl TextPrompt {
    /// Creates a prompt pre-filled with `initial`.
    pub fn new(title: impl Into<String>, field: impl Into<String>, initial: &str) -> Self {
        Self {
            title: title.into(),
            field: field.into(),
            input: initial.to_string(),
            cursor: initial.chars().count(),
            required: false,
            error: None,
        }
    }

    /// Refuses to confirm an empty value.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Current text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.input
    }

    /// Cursor position in characters.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_index)
            .map_or(self.input.len(), |(i, _)| i)
    }

    fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.input.insert(at, c);
        self.cursor += 1;
    }

    fn delete_before_cursor(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.input.remove(at);
    }

    fn delete_at_cursor(&mut self) {
        if self.cursor < self.input.chars().count() {
            let at = self.byte_index(self.cursor);
            self.input.remove(at);
        }
    }
}

impl Component for TextPrompt {
    type Event = TextPromptEvent;

    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event> {
        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert(c);
                self.error = None;
            }
            KeyCode::Backspace => {
                self.delete_before_cursor();
                self.error = None;
            }
            KeyCode::Delete => {
                self.delete_at_cursor();
                self.error = None;
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.input.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.chars().count(),
            KeyCode::Enter => {
                let value = self.input.trim();
                if self.required && value.is_empty() {
                    self.error = Some(format!("{} cannot be empty", self.field));
                } else {
                    return Some(TextPromptEvent::Confirmed(value.to_string()));
                }
            }
            KeyCode::Esc => return Some(TextPromptEvent::Cancelled),
            _ => {}
        }
        None
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let dialog_area = centered_rect(60, 40, area);
        let palette = &theme.canvas;
        let dialog_style = Style::default()
            .fg(palette.dialog_text)
            .bg(palette.dialog_background);

        frame.render_widget(Clear, dialog_area);
        frame.render_widget(Block::default().style(dialog_style), dialog_area);

        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Input field
                Constraint::Min(1),    // Error message
                Constraint::Length(1), // Help text
            ])
            .split(dialog_area);

        let title = Paragraph::new(self.title.as_str())
            .style(dialog_style.fg(theme.accent).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL).style(dialog_style));
        frame.render_widget(title, chunks[0]);

        let split = self.byte_index(self.cursor);
        let (before, after) = self.input.split_at(split);
        let input = Paragraph::new(Line::from(vec![
            Span::raw(before),
            Span::styled("█", Style::default().fg(palette.input_border)),
            Span::raw(after),
        ]))
        .style(
            Style::default()
                .fg(palette.dialog_text)
                .bg(palette.input_background),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", self.field))
                .border_style(Style::default().fg(palette.input_border))
                .style(Style::default().bg(palette.input_background)),
        );
        frame.render_widget(input, chunks[1]);

        if let Some(ref error) = self.error {
            let error_widget = Paragraph::new(error.as_str())
                .style(dialog_style.fg(theme.error))
                .wrap(Wrap { trim: true });
            frame.render_widget(error_widget, chunks[2]);
        }

        let key_style = Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD);
        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Enter", key_style),
            Span::raw(" Confirm  "),
            Span::styled("Esc", key_style),
            Span::raw(" Cancel"),
        ]))
        .style(dialog_style);
        frame.render_widget(help, chunks[3]);
    }
}
