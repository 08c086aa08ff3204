//! Status bar widget for displaying status messages and help

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::help_registry::{self, HelpRegistry};
use super::{AppState, Mode, PopupType, Theme};
use crate::input::ActiveSource;

/// Lines between the top and the help line (6 high, 2 borders, 1 help).
const MAX_CONTENT_LINES: usize = 3;

/// Status bar widget
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar with contextual help
    pub fn render(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
        let show_hints = state.status_message.is_empty()
            && state.error_message.is_none()
            && state.active_popup.is_none();

        let mut content_lines: Vec<Line> = Vec::new();

        // First line: error, status message, or hints
        if let Some(error) = &state.error_message {
            content_lines.push(Line::from(vec![
                Span::styled("ERROR: ", Style::default().fg(theme.error)),
                Span::raw(error.as_str()),
            ]));
        } else if !state.status_message.is_empty() {
            content_lines.push(Line::from(state.status_message.as_str()));
        } else if show_hints {
            content_lines.push(Self::get_hints_line(state, theme));
        }

        content_lines.push(Self::get_info_line(state, theme));

        if let Some(reason) = state.listener.fallback_reason() {
            content_lines.push(Line::from(vec![
                Span::styled("Input: ", Style::default().fg(theme.warning)),
                Span::styled(
                    format!("terminal only ({reason})"),
                    Style::default().fg(theme.text_muted),
                ),
            ]));
        }

        let padding_needed = MAX_CONTENT_LINES.saturating_sub(content_lines.len());
        let mut status_text: Vec<Line> = content_lines
            .into_iter()
            .take(MAX_CONTENT_LINES)
            .collect();
        for _ in 0..padding_needed {
            status_text.push(Line::from(""));
        }
        status_text.push(Self::get_contextual_help_line(state, theme));

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(theme.background))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Status ")
                    .style(Style::default().bg(theme.background)),
            );

        f.render_widget(status, area);
    }

    /// Counters for the current mode.
    fn get_info_line(state: &AppState, theme: &Theme) -> Line<'static> {
        let label = Style::default().fg(theme.primary);
        let value = Style::default().fg(theme.text);

        match state.mode {
            Mode::Editor => {
                let canvas = &state.canvas;
                let selected = match canvas.single_selected() {
                    Some(key) => format!(
                        "{} [{}] at {},{} {}x{}",
                        key.display_label(),
                        if key.key_bind.is_empty() { "unbound" } else { key.key_bind.as_str() },
                        key.x,
                        key.y,
                        key.width,
                        key.height
                    ),
                    None => canvas.selected_ids().len().to_string(),
                };
                Line::from(vec![
                    Span::styled("Keys: ", label),
                    Span::styled(canvas.layout().keys.len().to_string(), value),
                    Span::styled("  Selected: ", label),
                    Span::styled(selected, value),
                    Span::styled("  Cursor: ", label),
                    Span::styled(format!("{},{}", state.cursor.0, state.cursor.1), value),
                ])
            }
            Mode::Visualizer => {
                let (held, presses) = state
                    .visualizer
                    .as_ref()
                    .map_or((0, 0), |v| (v.pressed_count(), v.press_count()));
                let source = match state.listener.source() {
                    ActiveSource::Evdev => "system-wide",
                    ActiveSource::Terminal => "terminal focus only",
                };
                Line::from(vec![
                    Span::styled("Held: ", label),
                    Span::styled(held.to_string(), value),
                    Span::styled("  Presses: ", label),
                    Span::styled(presses.to_string(), value),
                    Span::styled("  Input: ", label),
                    Span::styled(source, value),
                ])
            }
        }
    }

    /// Get a line of contextual hints from the help registry (top hints line)
    fn get_hints_line(state: &AppState, theme: &Theme) -> Line<'static> {
        let context_name = Self::get_current_context(state);
        let registry = HelpRegistry::default();

        let hints = registry.format_status_bar_hints(context_name, 5);
        if hints.is_empty() {
            return Line::from("");
        }

        let mut spans: Vec<Span<'static>> = Vec::new();
        for (i, (key, action)) in hints.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(
                key,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(action, Style::default().fg(theme.text_muted)));
        }

        Line::from(spans)
    }

    /// Get the current context name based on application state
    pub(crate) fn get_current_context(state: &AppState) -> &'static str {
        match &state.active_popup {
            Some(PopupType::LabelEditor | PopupType::SaveAs) => help_registry::contexts::TEXT_INPUT,
            Some(PopupType::BindCapture) => help_registry::contexts::BIND_CAPTURE,
            Some(PopupType::LayoutPicker) => help_registry::contexts::LAYOUT_PICKER,
            Some(PopupType::HelpOverlay) => help_registry::contexts::HELP,
            Some(PopupType::UnsavedChangesPrompt) => help_registry::contexts::UNSAVED_PROMPT,
            None => match state.mode {
                Mode::Editor => help_registry::contexts::EDITOR,
                Mode::Visualizer => help_registry::contexts::VISUALIZER,
            },
        }
    }

    /// Get contextual help line from help registry (bottom help line)
    fn get_contextual_help_line(state: &AppState, theme: &Theme) -> Line<'static> {
        let context_name = Self::get_current_context(state);
        let registry = HelpRegistry::default();

        let help_hints: Vec<(String, String)> = registry
            .get_status_bar_hints(context_name)
            .iter()
            .take(5)
            .map(|binding| {
                let key = if binding.alt_keys.is_empty() {
                    binding.keys.join(",")
                } else {
                    format!("{}/{}", binding.keys.join(","), binding.alt_keys.join(","))
                };
                let action = binding.hint.as_ref().unwrap_or(&binding.action).clone();
                (key, action)
            })
            .collect();

        let mut spans: Vec<Span<'static>> = vec![Span::styled(
            "Help: ",
            Style::default().fg(theme.primary),
        )];

        if help_hints.is_empty() {
            spans.push(Span::raw("Press ? for help"));
            return Line::from(spans);
        }

        for (i, (key, action)) in help_hints.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" | "));
            }
            spans.push(Span::styled(key, Style::default().fg(theme.accent)));
            spans.push(Span::raw(": "));
            spans.push(Span::raw(action));
        }

        Line::from(spans)
    }
}
