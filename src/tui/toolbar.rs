//! Toolbar shown above the canvas: mode, layout name, save state, sound
//! and input source.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{AppState, Mode};
use crate::input::ActiveSource;

/// Toolbar widget
pub struct Toolbar;

impl Toolbar {
    /// Render the toolbar
    pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
        let palette = &state.theme.canvas;
        let chip = |text: String, bg: Color, fg: Color| {
            Span::styled(format!(" {text} "), Style::default().fg(fg).bg(bg))
        };
        let mode_chip = |mode: Mode, text: &str| {
            if state.mode == mode {
                Span::styled(
                    format!(" {text} "),
                    Style::default()
                        .fg(palette.toolbar_text)
                        .bg(palette.toolbar_active)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                chip(text.to_string(), palette.toolbar_chip, palette.toolbar_text)
            }
        };

        let dirty = if state.canvas.is_dirty() { " *" } else { "" };
        let save_chip = if state.mode == Mode::Visualizer {
            chip(
                "Ctrl+S Save".to_string(),
                palette.toolbar_disabled_bg,
                palette.toolbar_disabled_text,
            )
        } else {
            chip("Ctrl+S Save".to_string(), palette.toolbar_chip, palette.toolbar_text)
        };
        let sound = if state.sounds.is_enabled() {
            format!("Sound on ({})", state.sounds.player_name())
        } else {
            "Sound off".to_string()
        };
        let source = match state.listener.source() {
            ActiveSource::Evdev => format!("evdev ({} devices)", state.listener.device_count()),
            ActiveSource::Terminal => "terminal".to_string(),
        };

        let line = Line::from(vec![
            mode_chip(Mode::Editor, "Editor"),
            Span::raw(" "),
            mode_chip(Mode::Visualizer, "Visualizer"),
            Span::raw("  "),
            Span::styled(
                format!("{}{dirty}", state.canvas.layout().metadata.name),
                Style::default()
                    .fg(state.theme.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            save_chip,
            Span::raw(" "),
            chip(sound, palette.toolbar_chip, palette.toolbar_text),
            Span::raw(" "),
            chip(source, palette.toolbar_chip, palette.toolbar_text),
        ]);

        let toolbar = Paragraph::new(line)
            .style(Style::default().bg(state.theme.background))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.border))
                    .style(Style::default().bg(state.theme.background)),
            );
        f.render_widget(toolbar, area);
    }
}
