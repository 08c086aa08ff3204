//! Scrollable help overlay listing every shortcut by context.
//!
//! Content is generated from the help registry, so it always matches the
//! status bar hints.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
    },
    Frame,
};

use super::help_registry::{contexts, HelpRegistry};
use super::{Component, Theme};

/// Sections in display order.
const SECTIONS: &[&str] = &[
    contexts::EDITOR,
    contexts::MOUSE,
    contexts::VISUALIZER,
    contexts::BIND_CAPTURE,
    contexts::TEXT_INPUT,
    contexts::LAYOUT_PICKER,
    contexts::UNSAVED_PROMPT,
    contexts::HELP,
];

/// Width of the key column.
const KEY_COLUMN: usize = 30;

/// Lines scrolled by PageUp/PageDown.
const PAGE: usize = 10;

/// Help overlay component state.
#[derive(Debug, Clone)]
pub struct HelpOverlay {
    scroll_offset: usize,
    total_lines: usize,
    close: bool,
}

impl HelpOverlay {
    /// Creates a new help overlay, scrolled to the top.
    #[must_use]
    pub fn new() -> Self {
        let total_lines = Self::help_content(&HelpRegistry::default(), &Theme::default()).len();
        Self {
            scroll_offset: 0,
            total_lines,
            close: false,
        }
    }

    /// Current scroll offset (line number).
    #[must_use]
    pub const fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Scroll up by one line.
    pub const fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    /// Scroll down by one line.
    pub const fn scroll_down(&mut self) {
        if self.scroll_offset + 1 < self.total_lines {
            self.scroll_offset += 1;
        }
    }

    /// Scroll to the top.
    pub const fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    /// Scroll to the bottom.
    pub const fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.total_lines.saturating_sub(1);
    }

    /// Scroll down by a page.
    pub fn page_down(&mut self, visible_height: usize) {
        self.scroll_offset =
            (self.scroll_offset + visible_height).min(self.total_lines.saturating_sub(1));
    }

    /// Scroll up by a page.
    pub const fn page_up(&mut self, visible_height: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(visible_height);
    }

    /// Builds the help text: one section per context.
    fn help_content(registry: &HelpRegistry, theme: &Theme) -> Vec<Line<'static>> {
        let rule = "═".repeat(63);
        let mut lines = vec![
            Line::from(Span::styled(rule.clone(), Style::default().fg(theme.primary))),
            Line::from(Span::styled(
                format!("{:^63}", format!("{} - Help", registry.app_name())),
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(rule.clone(), Style::default().fg(theme.primary))),
            Line::from(""),
        ];

        for name in SECTIONS {
            let Some(context) = registry.get_context(name) else {
                continue;
            };
            lines.push(Line::from(Span::styled(
                format!("═══ {} ═══", context.name.to_uppercase()),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                context.description.clone(),
                Style::default().fg(theme.text_muted),
            )));
            lines.push(Line::from(""));

            for binding in registry.get_bindings(name) {
                let (keys, action) = HelpRegistry::format_binding_for_help(binding);
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        format!("{keys:<KEY_COLUMN$}"),
                        Style::default().fg(theme.success),
                    ),
                    Span::styled(action, Style::default().fg(theme.text)),
                ]));
            }
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(rule.clone(), Style::default().fg(theme.primary))));
        lines.push(Line::from(Span::styled(
            format!("{:^63}", "Esc to close • ↑↓ to scroll"),
            Style::default().fg(theme.text_muted),
        )));
        lines.push(Line::from(Span::styled(rule, Style::default().fg(theme.primary))));
        lines
    }
}

impl Default for HelpOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for HelpOverlay {
    type Event = ();

    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(),
            KeyCode::PageUp => self.page_up(PAGE),
            KeyCode::PageDown => self.page_down(PAGE),
            KeyCode::Home | KeyCode::Char('g') => self.scroll_to_top(),
            KeyCode::End | KeyCode::Char('G') => self.scroll_to_bottom(),
            KeyCode::Esc | KeyCode::Char('q' | '?') | KeyCode::F(1) => {
                self.close = true;
                return Some(());
            }
            _ => {}
        }
        None
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let width = (area.width * 70) / 100;
        let height = (area.height * 80) / 100;
        let modal_area = Rect {
            x: area.x + area.width.saturating_sub(width) / 2,
            y: area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        };

        frame.render_widget(Clear, modal_area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(modal_area);
        let content_area = chunks[0];
        let scrollbar_area = chunks[1];

        let content = Self::help_content(&HelpRegistry::default(), theme);
        let visible_height = content_area.height.saturating_sub(2) as usize;

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .title(" Help - Keyboard Shortcuts ")
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.primary)),
            )
            .style(Style::default().fg(theme.text).bg(theme.background))
            .wrap(Wrap { trim: false })
            .scroll((u16::try_from(self.scroll_offset).unwrap_or(u16::MAX), 0));
        frame.render_widget(paragraph, content_area);

        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"))
            .track_symbol(Some("│"))
            .thumb_symbol("█")
            .style(Style::default().fg(theme.primary));
        let mut scrollbar_state =
            ScrollbarState::new(self.total_lines.saturating_sub(visible_height))
                .position(self.scroll_offset);
        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }

    fn should_close(&self) -> bool {
        self.close
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(help: &mut HelpOverlay, code: KeyCode) -> Option<()> {
        help.handle_input(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_content_covers_every_section() {
        let registry = HelpRegistry::default();
        let text: String = HelpOverlay::help_content(&registry, &Theme::default())
            .iter()
            .flat_map(|line| line.spans.iter().map(|s| s.content.to_string()))
            .collect();
        for name in SECTIONS {
            let context = registry.get_context(name).unwrap();
            assert!(text.contains(&context.name.to_uppercase()), "{name} missing");
        }
        assert!(text.contains("Switch to the visualizer"));
    }

    #[test]
    fn test_scrolling_is_bounded() {
        let mut help = HelpOverlay::new();
        press(&mut help, KeyCode::Up);
        assert_eq!(help.scroll_offset(), 0);

        press(&mut help, KeyCode::Down);
        press(&mut help, KeyCode::Down);
        assert_eq!(help.scroll_offset(), 2);

        press(&mut help, KeyCode::End);
        let bottom = help.scroll_offset();
        press(&mut help, KeyCode::PageDown);
        assert_eq!(help.scroll_offset(), bottom);

        press(&mut help, KeyCode::Home);
        assert_eq!(help.scroll_offset(), 0);
    }

    #[test]
    fn test_close_keys() {
        let mut help = HelpOverlay::new();
        assert!(!help.should_close());
        assert_eq!(press(&mut help, KeyCode::Char('?')), Some(()));
        assert!(help.should_close());
    }
}
