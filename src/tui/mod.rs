//! Terminal user interface components and state management.
//!
//! This module contains the main TUI loop, `AppState`, event handling,
//! and all UI widgets using Ratatui.

// Allow clone assignment patterns - common in UI state management
#![allow(clippy::assigning_clones)]
// Input handlers use Result<bool> for consistency even when they never fail
#![allow(clippy::unnecessary_wraps)]
// Allow small types passed by reference for API consistency
#![allow(clippy::trivially_copy_pass_by_ref)]
// Allow intentional type casts for terminal coordinates
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]

pub mod bind_capture;
pub mod canvas_view;
pub mod component;
pub mod handlers;
pub mod help_overlay;
pub mod help_registry;
pub mod layout_picker;
pub mod status_bar;
pub mod text_prompt;
pub mod theme;
pub mod toolbar;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout as RatatuiLayout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::audio::SoundMapper;
use crate::config::Config;
use crate::input::KeyListener;
use crate::models::Layout;
use crate::services::{CanvasBounds, EditorCanvas, LayoutService, Visualizer};

pub use bind_capture::{BindCapture, BindCaptureEvent, BindTarget};
pub use canvas_view::{CanvasView, Viewport};
pub use component::Component;
pub use help_overlay::HelpOverlay;
pub use layout_picker::{LayoutPicker, PickerAction};
pub use status_bar::StatusBar;
pub use text_prompt::{TextPrompt, TextPromptEvent};
pub use theme::Theme;
pub use toolbar::Toolbar;

/// Name given to layouts created in the editor.
pub const UNTITLED_LAYOUT: &str = "Untitled";

/// Two clicks on the same cell within this window are a double click.
pub(crate) const DOUBLE_CLICK: Duration = Duration::from_millis(400);

/// What the main area is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Building and editing the layout
    Editor,
    /// Highlighting keys as they are pressed
    Visualizer,
}

/// Popup types that can be displayed over the main UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupType {
    /// Edit the label of one key
    LabelEditor,
    /// Choose a file name for the layout
    SaveAs,
    /// Wait for the physical key to bind
    BindCapture,
    /// Load a saved layout
    LayoutPicker,
    /// Keyboard shortcut reference
    HelpOverlay,
    /// Confirm quitting with unsaved changes
    UnsavedChangesPrompt,
}

/// Active component variants.
#[derive(Debug)]
pub enum ActiveComponent {
    /// Label editor for key `key_id`
    LabelEditor {
        /// The text prompt
        prompt: TextPrompt,
        /// Key being relabelled
        key_id: String,
    },
    /// File name prompt for save-as
    SaveAs {
        /// The text prompt
        prompt: TextPrompt,
        /// Quit once the save succeeds
        quit_after: bool,
    },
    /// Binding capture popup
    BindCapture(BindCapture),
    /// Layout picker
    LayoutPicker(LayoutPicker),
    /// Help overlay
    HelpOverlay(HelpOverlay),
}

/// Application state - single source of truth
///
/// All UI components read from this state immutably.
/// Only event handlers modify state explicitly.
pub struct AppState {
    // Core data
    /// Layout being edited, with selection and drag state
    pub canvas: EditorCanvas,
    /// Path the layout was loaded from or last saved to
    pub source_path: Option<PathBuf>,
    /// Directory for save-as and the layout picker
    pub layouts_dir: PathBuf,

    // Modes
    /// Editor or visualizer
    pub mode: Mode,
    /// Highlight state while visualizing
    pub visualizer: Option<Visualizer>,

    // System resources
    /// Physical key source
    pub listener: KeyListener,
    /// Sound feedback
    pub sounds: SoundMapper,
    /// Application configuration
    pub config: Config,

    // UI state
    /// Current UI theme
    pub theme: Theme,
    /// Whether the toolbar is shown
    pub show_toolbar: bool,
    /// Editor cursor, in layout units (centre of a cell)
    pub cursor: (i32, i32),
    /// Editor scroll offset in cells
    pub scroll: (u16, u16),
    /// Terminal size at the last frame
    pub screen: Rect,
    /// Last left click, for double-click detection
    pub last_click: Option<(Instant, u16, u16)>,
    /// Terminal keys arriving before this instant are dropped
    pub suppress_keys_until: Option<Instant>,
    /// Currently active popup (if any)
    pub active_popup: Option<PopupType>,
    /// Currently active component (if any)
    pub active_component: Option<ActiveComponent>,
    /// Status bar message
    pub status_message: String,
    /// Current error message (if any)
    pub error_message: Option<String>,

    // Control flags
    /// Whether application should exit
    pub should_quit: bool,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Errors
    ///
    /// Returns error if the layouts directory cannot be determined
    pub fn new(
        config: Config,
        layout: Layout,
        source_path: Option<PathBuf>,
        listener: KeyListener,
        sounds: SoundMapper,
    ) -> Result<Self> {
        let layouts_dir = config.layouts_dir()?;
        let canvas = EditorCanvas::new(layout, CanvasBounds::from_config(&config.editor));
        let theme = Theme::from_config(&config);
        let cursor = (
            config.editor.units_per_column / 2,
            config.editor.units_per_row / 2,
        );

        Ok(Self {
            canvas,
            source_path,
            layouts_dir,
            mode: Mode::Editor,
            visualizer: None,
            listener,
            sounds,
            theme,
            show_toolbar: config.ui.show_toolbar,
            cursor,
            scroll: (0, 0),
            screen: Rect::new(0, 0, 120, 40),
            last_click: None,
            suppress_keys_until: None,
            active_popup: None,
            active_component: None,
            status_message: String::new(),
            error_message: None,
            should_quit: false,
            config,
        })
    }

    /// Set status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.error_message = None;
    }

    /// Set error message
    pub fn set_error(&mut self, error: impl Into<String>) {
        let error = error.into();
        tracing::warn!("{error}");
        self.error_message = Some(error);
    }

    /// Clear error message
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    // === Layout files ===

    /// Replaces the layout with one loaded from `path`.
    pub fn load_layout(&mut self, path: &Path) -> Result<()> {
        let layout = LayoutService::load(path)?;
        self.canvas.replace_layout(layout);
        self.source_path = Some(path.to_path_buf());
        self.reset_view();
        Ok(())
    }

    /// Starts an empty, unsaved layout.
    pub fn new_layout(&mut self) {
        self.canvas.replace_layout(Layout::new(UNTITLED_LAYOUT));
        self.source_path = None;
        self.reset_view();
    }

    /// Writes the layout to `path` and makes it the current file.
    pub fn save_to(&mut self, path: &Path) -> Result<()> {
        LayoutService::save(self.canvas.layout(), path)?;
        self.canvas.mark_clean();
        self.source_path = Some(path.to_path_buf());
        Ok(())
    }

    fn reset_view(&mut self) {
        self.cursor = (
            self.config.editor.units_per_column / 2,
            self.config.editor.units_per_row / 2,
        );
        self.scroll = (0, 0);
    }

    // === Modes ===

    /// How long a key stays lit without a release event.
    #[must_use]
    pub fn release_after(&self) -> Option<Duration> {
        (!self.listener.reports_releases())
            .then(|| Duration::from_millis(self.config.input.release_after_ms))
    }

    /// Switches to the visualizer.
    ///
    /// Fails, leaving the editor active, when the layout cannot be routed.
    pub fn enter_visualizer(&mut self) -> Result<()> {
        let visualizer = Visualizer::start(self.canvas.layout(), self.release_after())?;
        self.canvas.end_drag();
        self.listener.monitor(visualizer.scan_codes());
        self.listener.flush();
        self.visualizer = Some(visualizer);
        self.mode = Mode::Visualizer;
        Ok(())
    }

    /// Returns to the editor and clears all highlights.
    pub fn leave_visualizer(&mut self) {
        if let Some(mut visualizer) = self.visualizer.take() {
            visualizer.stop();
        }
        self.listener.monitor_all();
        self.listener.flush();
        self.mode = Mode::Editor;
    }

    /// Whether terminal keys are currently being dropped.
    #[must_use]
    pub fn is_suppressing_keys(&self, now: Instant) -> bool {
        self.suppress_keys_until.is_some_and(|until| now < until)
    }

    // === Viewport ===

    /// Viewport for a canvas drawn in `inner`.
    #[must_use]
    pub fn viewport_for(&self, inner: Rect) -> Viewport {
        match self.mode {
            Mode::Editor => Viewport::editor(inner, self.scroll, &self.config.editor),
            Mode::Visualizer => {
                Viewport::fitted(inner, self.canvas.layout().extent(), &self.config.editor)
            }
        }
    }

    /// Viewport of the canvas at the current screen size.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        let areas = ScreenAreas::split(self.screen, self.show_toolbar);
        self.viewport_for(CanvasView::block(self).inner(areas.canvas))
    }

    fn max_scroll(&self, viewport: &Viewport) -> (u16, u16) {
        let bounds = self.canvas.bounds();
        let columns = (bounds.width + viewport.units_per_column - 1) / viewport.units_per_column;
        let rows = (bounds.height + viewport.units_per_row - 1) / viewport.units_per_row;
        (
            (columns.max(0) as u16).saturating_sub(viewport.area.width),
            (rows.max(0) as u16).saturating_sub(viewport.area.height),
        )
    }

    /// Scrolls the editor canvas by whole cells.
    pub fn scroll_by(&mut self, columns: i32, rows: i32) {
        let viewport = self.viewport();
        let (max_x, max_y) = self.max_scroll(&viewport);
        self.scroll.0 = (i32::from(self.scroll.0) + columns).clamp(0, i32::from(max_x)) as u16;
        self.scroll.1 = (i32::from(self.scroll.1) + rows).clamp(0, i32::from(max_y)) as u16;
    }

    /// Moves the cursor by whole cells, staying on the canvas.
    pub fn move_cursor(&mut self, columns: i32, rows: i32) {
        let upc = self.config.editor.units_per_column.max(1);
        let upr = self.config.editor.units_per_row.max(1);
        let bounds = *self.canvas.bounds();
        let column = (self.cursor.0 / upc + columns).clamp(0, ((bounds.width - 1) / upc).max(0));
        let row = (self.cursor.1 / upr + rows).clamp(0, ((bounds.height - 1) / upr).max(0));
        self.cursor = (column * upc + upc / 2, row * upr + upr / 2);
        self.ensure_cursor_visible();
    }

    /// Puts the cursor on the cell containing a layout point.
    pub fn place_cursor(&mut self, x: i32, y: i32) {
        let upc = self.config.editor.units_per_column.max(1);
        let upr = self.config.editor.units_per_row.max(1);
        self.cursor = (0, 0);
        self.move_cursor(x.max(0) / upc, y.max(0) / upr);
    }

    /// Scrolls so the cursor cell is on screen.
    pub fn ensure_cursor_visible(&mut self) {
        let viewport = self.viewport();
        let (width, height) = (viewport.area.width, viewport.area.height);
        if width == 0 || height == 0 {
            return;
        }
        let column = (self.cursor.0 / viewport.units_per_column).max(0) as u16;
        let row = (self.cursor.1 / viewport.units_per_row).max(0) as u16;

        if column < self.scroll.0 {
            self.scroll.0 = column;
        } else if column >= self.scroll.0 + width {
            self.scroll.0 = column + 1 - width;
        }
        if row < self.scroll.1 {
            self.scroll.1 = row;
        } else if row >= self.scroll.1 + height {
            self.scroll.1 = row + 1 - height;
        }
    }

    // === Popups ===

    /// Open the label editor for a key
    pub fn open_label_editor(&mut self, key_id: &str) {
        let Some(key) = self.canvas.layout().find_key(key_id) else {
            return;
        };
        let prompt = TextPrompt::new(" Edit Label ", "Label", &key.label);
        self.active_component = Some(ActiveComponent::LabelEditor {
            prompt,
            key_id: key_id.to_string(),
        });
        self.active_popup = Some(PopupType::LabelEditor);
    }

    /// Open the save-as prompt; `quit_after` ends the session once saved
    pub fn open_save_as(&mut self, quit_after: bool) {
        let name = self.canvas.layout().metadata.name.clone();
        let prompt = TextPrompt::new(" Save Layout As ", "Layout name", &name).required();
        self.active_component = Some(ActiveComponent::SaveAs { prompt, quit_after });
        self.active_popup = Some(PopupType::SaveAs);
    }

    /// Open the binding capture popup
    pub fn open_bind_capture(&mut self, target: BindTarget) {
        let note = match self.listener.source() {
            crate::input::ActiveSource::Evdev => "Reading all keyboards; Esc can be bound too.",
            crate::input::ActiveSource::Terminal => {
                "Reading the terminal; some keys (modifiers alone) cannot be seen."
            }
        };
        self.listener.flush();
        self.active_component = Some(ActiveComponent::BindCapture(BindCapture::new(target, note)));
        self.active_popup = Some(PopupType::BindCapture);
    }

    /// Open the layout picker over the layouts directory
    pub fn open_layout_picker(&mut self) -> Result<()> {
        let picker =
            LayoutPicker::scan(&self.layouts_dir)?.with_discard_warning(self.canvas.is_dirty());
        self.active_component = Some(ActiveComponent::LayoutPicker(picker));
        self.active_popup = Some(PopupType::LayoutPicker);
        Ok(())
    }

    /// Open the help overlay component
    pub fn open_help_overlay(&mut self) {
        self.active_component = Some(ActiveComponent::HelpOverlay(HelpOverlay::new()));
        self.active_popup = Some(PopupType::HelpOverlay);
    }

    /// Close the currently active component
    pub fn close_component(&mut self) {
        self.active_component = None;
        self.active_popup = None;
    }
}

/// Vertical split of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    /// Toolbar, when shown
    pub toolbar: Option<Rect>,
    /// Canvas block
    pub canvas: Rect,
    /// Status bar
    pub status: Rect,
}

impl ScreenAreas {
    /// Splits `area` into toolbar, canvas and status bar.
    #[must_use]
    pub fn split(area: Rect, show_toolbar: bool) -> Self {
        if show_toolbar {
            let chunks = RatatuiLayout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3), // Toolbar
                    Constraint::Min(5),    // Canvas
                    Constraint::Length(6), // Status bar
                ])
                .split(area);
            Self {
                toolbar: Some(chunks[0]),
                canvas: chunks[1],
                status: chunks[2],
            }
        } else {
            let chunks = RatatuiLayout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(5), Constraint::Length(6)])
                .split(area);
            Self {
                toolbar: None,
                canvas: chunks[0],
                status: chunks[1],
            }
        }
    }
}

/// Initialize terminal for TUI
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main event loop
pub fn run_tui(
    state: &mut AppState,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    let poll_interval = Duration::from_millis(state.config.input.poll_interval_ms.max(1));

    loop {
        let size = terminal.size()?;
        state.screen = Rect::new(0, 0, size.width, size.height);

        terminal.draw(|f| render(f, state))?;

        if event::poll(poll_interval)? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key_event(state, key)? {
                        break; // User quit
                    }
                }
                Event::Mouse(mouse) => handlers::handle_mouse_event(state, mouse, Instant::now())?,
                // Resize redraws on the next loop
                _ => {}
            }
        }

        handlers::handle_listener_events(state, Instant::now());

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

/// Render the UI from current state
fn render(f: &mut Frame, state: &AppState) {
    // Fill entire screen with theme background color first
    let full_bg = Block::default().style(Style::default().bg(state.theme.background));
    f.render_widget(full_bg, f.area());

    let areas = ScreenAreas::split(f.area(), state.show_toolbar);

    if let Some(toolbar) = areas.toolbar {
        Toolbar::render(f, toolbar, state);
    }
    CanvasView::render(f, areas.canvas, state);
    StatusBar::render(f, areas.status, state, &state.theme);

    if let Some(popup_type) = &state.active_popup {
        render_popup(f, popup_type, state);
    }

    // Render error overlay on top of everything if error is present
    if let Some(ref error) = state.error_message {
        render_error_overlay(f, error, &state.theme);
    }
}

/// Render active popup
fn render_popup(f: &mut Frame, popup_type: &PopupType, state: &AppState) {
    let area = f.area();
    match (popup_type, &state.active_component) {
        (PopupType::LabelEditor, Some(ActiveComponent::LabelEditor { prompt, .. }))
        | (PopupType::SaveAs, Some(ActiveComponent::SaveAs { prompt, .. })) => {
            prompt.render(f, area, &state.theme);
        }
        (PopupType::BindCapture, Some(ActiveComponent::BindCapture(capture))) => {
            capture.render(f, area, &state.theme);
        }
        (PopupType::LayoutPicker, Some(ActiveComponent::LayoutPicker(picker))) => {
            picker.render(f, area, &state.theme);
        }
        (PopupType::HelpOverlay, Some(ActiveComponent::HelpOverlay(help))) => {
            help.render(f, area, &state.theme);
        }
        (PopupType::UnsavedChangesPrompt, _) => render_unsaved_prompt(f, &state.theme),
        _ => {}
    }
}

/// Render unsaved changes prompt
fn render_unsaved_prompt(f: &mut Frame, theme: &Theme) {
    let area = centered_rect(60, 30, f.area());

    f.render_widget(Clear, area);
    let background = Block::default().style(Style::default().bg(theme.background));
    f.render_widget(background, area);

    let text = vec![
        Line::from(""),
        Line::from("You have unsaved changes."),
        Line::from(""),
        Line::from("  [S] Save and quit"),
        Line::from("  [Q] Quit without saving"),
        Line::from("  [Esc] Cancel"),
    ];

    let prompt = Paragraph::new(text).block(
        Block::default()
            .title(" Unsaved Changes ")
            .borders(Borders::ALL)
            .style(Style::default().fg(theme.warning)),
    );

    f.render_widget(prompt, area);
}

/// Render error overlay on top of all other UI elements
fn render_error_overlay(f: &mut Frame, error: &str, theme: &Theme) {
    let area = centered_rect(70, 40, f.area());

    f.render_widget(Clear, area);
    let background = Block::default().style(Style::default().bg(theme.background));
    f.render_widget(background, area);

    let chunks = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(3),    // Error message
            Constraint::Length(3), // Help text
        ])
        .split(area);

    let title = Paragraph::new("ERROR")
        .style(
            Style::default()
                .fg(theme.error)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().fg(theme.error).bg(theme.background)),
        );
    f.render_widget(title, chunks[0]);

    let error_text = Paragraph::new(error)
        .style(Style::default().fg(theme.text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Details ")
                .style(Style::default().bg(theme.background)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(error_text, chunks[1]);

    let help = Paragraph::new(vec![Line::from(vec![
        Span::styled(
            "Enter/Esc",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Dismiss"),
    ])])
    .style(Style::default().fg(theme.text).bg(theme.background))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(theme.background)),
    );
    f.render_widget(help, chunks[2]);
}

/// Helper to create a centered rectangle
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    RatatuiLayout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Handle keyboard input events
pub(crate) fn handle_key_event(state: &mut AppState, key: event::KeyEvent) -> Result<bool> {
    use crossterm::event::KeyCode;

    // The terminal also sees a key just captured from the devices
    if state.is_suppressing_keys(Instant::now()) {
        return Ok(false);
    }
    state.suppress_keys_until = None;

    // If error overlay is shown, allow dismissing with Enter or Esc
    if state.error_message.is_some() {
        if key.kind != KeyEventKind::Release && matches!(key.code, KeyCode::Enter | KeyCode::Esc)
        {
            state.clear_error();
        }
        // Block all other input while error is shown
        return Ok(false);
    }

    // Route to popup handler if popup is active
    if state.active_popup.is_some() {
        if key.kind == KeyEventKind::Release {
            return Ok(false);
        }
        return handlers::handle_popup_input(state, key);
    }

    // Main UI key handling
    handlers::handle_main_input(state, key)
}


#[cfg(test)]
mod tests {
    use super::test_support::state_in;
    use super::*;
    use crate::models::KeyBinding;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    #[test]
    fn test_screen_split_with_and_without_toolbar() {
        let area = Rect::new(0, 0, 80, 30);
        let with = ScreenAreas::split(area, true);
        assert_eq!(with.toolbar.map(|r| r.height), Some(3));
        assert_eq!(with.status.height, 6);
        assert_eq!(with.canvas.height, 21);

        let without = ScreenAreas::split(area, false);
        assert!(without.toolbar.is_none());
        assert_eq!(without.canvas.height, 24);
    }

    #[test]
    fn test_cursor_stays_on_canvas_and_scrolls_into_view() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state.screen = Rect::new(0, 0, 40, 20);

        state.move_cursor(-3, -3);
        assert_eq!(state.cursor, (2, 5));

        state.move_cursor(100, 0);
        assert_eq!(state.cursor.0, 502);
        let viewport = state.viewport();
        assert!(viewport.units_to_cell(state.cursor.0, state.cursor.1).is_some());

        state.move_cursor(1000, 1000);
        assert_eq!(state.cursor, (797, 395));
        assert!(state.scroll.0 > 0 && state.scroll.1 > 0);
    }

    #[test]
    fn test_visualizer_round_trip() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state
            .canvas
            .create_key_at(100, 100, &KeyBinding::new("a", 30))
            .unwrap();

        state.enter_visualizer().unwrap();
        assert_eq!(state.mode, Mode::Visualizer);
        assert_eq!(state.release_after(), Some(Duration::from_millis(150)));

        state.leave_visualizer();
        assert_eq!(state.mode, Mode::Editor);
        assert!(state.visualizer.is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state
            .canvas
            .create_key_at(100, 100, &KeyBinding::new("a", 30))
            .unwrap();
        let path = temp.path().join("layouts").join("main.json");

        state.save_to(&path).unwrap();
        assert!(!state.canvas.is_dirty());
        assert_eq!(state.source_path.as_deref(), Some(path.as_path()));

        state.new_layout();
        assert!(state.canvas.layout().keys.is_empty());
        assert!(state.source_path.is_none());

        state.load_layout(&path).unwrap();
        assert_eq!(state.canvas.layout().keys.len(), 1);
    }

    #[test]
    fn test_error_overlay_blocks_input_until_dismissed() {
        let temp = TempDir::new().unwrap();
        let mut state = state_in(temp.path());
        state.set_error("boom");

        let quit = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(!handle_key_event(&mut state, quit).unwrap());
        assert!(state.error_message.is_some());

        handle_key_event(&mut state, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)).unwrap();
        assert!(state.error_message.is_none());
        assert!(handle_key_event(&mut state, quit).unwrap());
    }
}
