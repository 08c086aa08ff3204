//! Layout picker for loading saved layouts.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout as RatatuiLayout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::path::{Path, PathBuf};

use super::{centered_rect, Component, Theme};
use crate::services::{LayoutInfo, LayoutService};

/// Action returned by the layout picker when the user makes a choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerAction {
    /// Start an empty layout
    CreateNew,
    /// Load an existing layout
    LoadLayout(PathBuf),
    /// Close without loading
    Cancel,
}

/// Layout picker component state.
///
/// Row 0 is "Create New"; rows 1.. are the saved layouts.
#[derive(Debug, Clone)]
pub struct LayoutPicker {
    dir: PathBuf,
    layouts: Vec<LayoutInfo>,
    selected: usize,
    discard_warning: bool,
}

impl LayoutPicker {
    /// Creates a picker over already listed layouts.
    pub fn new(dir: impl Into<PathBuf>, layouts: Vec<LayoutInfo>) -> Self {
        let selected = usize::from(!layouts.is_empty());
        Self {
            dir: dir.into(),
            layouts,
            selected,
            discard_warning: false,
        }
    }

    /// Lists `dir` and creates a picker over it.
    pub fn scan(dir: &Path) -> anyhow::Result<Self> {
        Ok(Self::new(dir, LayoutService::list_layouts(dir)?))
    }

    /// Warns that loading discards unsaved changes.
    #[must_use]
    pub const fn with_discard_warning(mut self, warn: bool) -> Self {
        self.discard_warning = warn;
        self
    }

    /// Layouts on offer.
    #[must_use]
    pub fn layouts(&self) -> &[LayoutInfo] {
        &self.layouts
    }

    /// Highlighted row.
    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    fn row_count(&self) -> usize {
        self.layouts.len() + 1
    }
}

impl Component for LayoutPicker {
    type Event = PickerAction;

    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self
                    .selected
                    .checked_sub(1)
                    .unwrap_or(self.row_count() - 1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1) % self.row_count();
                None
            }
            KeyCode::Home => {
                self.selected = 0;
                None
            }
            KeyCode::End => {
                self.selected = self.row_count() - 1;
                None
            }
            KeyCode::Enter => Some(match self.selected {
                0 => PickerAction::CreateNew,
                n => self
                    .layouts
                    .get(n - 1)
                    .map_or(PickerAction::CreateNew, |info| {
                        PickerAction::LoadLayout(info.path.clone())
                    }),
            }),
            KeyCode::Esc | KeyCode::Char('q') => Some(PickerAction::Cancel),
            _ => None,
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let dialog_area = centered_rect(70, 70, area);
        let dialog_style = Style::default()
            .fg(theme.canvas.dialog_text)
            .bg(theme.canvas.dialog_background);

        f.render_widget(Clear, dialog_area);
        f.render_widget(Block::default().style(dialog_style), dialog_area);

        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(5),    // List
                Constraint::Length(3), // Instructions
            ])
            .split(dialog_area);

        let mut title_lines = vec![Line::from(Span::styled(
            "Open Layout",
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ))];
        if self.discard_warning {
            title_lines = vec![Line::from(vec![
                Span::styled(
                    "Open Layout  ",
                    Style::default()
                        .fg(theme.primary)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    "(unsaved changes will be discarded)",
                    Style::default().fg(theme.warning),
                ),
            ])];
        }
        let title = Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).style(dialog_style));
        f.render_widget(title, chunks[0]);

        let mut items: Vec<ListItem> = Vec::with_capacity(self.row_count());
        items.push(ListItem::new("+ Create New Layout").style(Style::default().fg(theme.success)));
        for info in &self.layouts {
            let file = info
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            items.push(ListItem::new(Line::from(vec![
                Span::raw(info.name.clone()),
                Span::styled(
                    format!(
                        "  {} keys  {}  {file}",
                        info.key_count,
                        info.modified.format("%Y-%m-%d %H:%M")
                    ),
                    Style::default().fg(theme.text_muted),
                ),
            ])));
        }

        let list_title = if self.layouts.is_empty() {
            format!(" No saved layouts in {} ", self.dir.display())
        } else {
            format!(" {} ({} saved) ", self.dir.display(), self.layouts.len())
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(list_title)
                    .style(dialog_style),
            )
            .highlight_style(
                Style::default()
                    .fg(theme.accent)
                    .bg(theme.highlight_bg)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut list_state = ListState::default();
        list_state.select(Some(self.selected));
        f.render_stateful_widget(list, chunks[1], &mut list_state);

        let instructions = Paragraph::new("↑↓: Navigate  |  Enter: Open  |  Esc: Cancel")
            .style(Style::default().fg(theme.text_muted))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).style(dialog_style));
        f.render_widget(instructions, chunks[2]);
    }
}
