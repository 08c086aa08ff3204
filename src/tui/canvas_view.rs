//! Canvas widget: draws the layout's keys as terminal rectangles.
//!
//! Layout coordinates are in units; one terminal cell covers
//! `units_per_column` x `units_per_row` units at scale 1.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{AppState, Mode, Theme};
use crate::config::EditorConfig;
use crate::models::{KeyDefinition, KeyRect, RgbColor};
use crate::services::visualizer::fit_scale;

/// Maps layout units to terminal cells and back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Cells available for drawing
    pub area: Rect,
    /// Columns and rows scrolled off the top-left
    pub scroll: (u16, u16),
    /// Units per terminal column
    pub units_per_column: i32,
    /// Units per terminal row
    pub units_per_row: i32,
    /// Layout scale, 1.0 in the editor
    pub scale: f64,
}

impl Viewport {
    /// Unscaled viewport used by the editor.
    #[must_use]
    pub fn editor(area: Rect, scroll: (u16, u16), editor: &EditorConfig) -> Self {
        Self {
            area,
            scroll,
            units_per_column: editor.units_per_column.max(1),
            units_per_row: editor.units_per_row.max(1),
            scale: 1.0,
        }
    }

    /// Viewport that fits a layout of size `extent` into `area`.
    #[must_use]
    pub fn fitted(area: Rect, extent: (i32, i32), editor: &EditorConfig) -> Self {
        let upc = editor.units_per_column.max(1);
        let upr = editor.units_per_row.max(1);
        let available = (
            i32::from(area.width) * upc,
            i32::from(area.height) * upr,
        );
        Self {
            area,
            scroll: (0, 0),
            units_per_column: upc,
            units_per_row: upr,
            scale: fit_scale(extent, available),
        }
    }

    /// Layout point under the centre of a terminal cell, if the cell is
    /// inside the viewport.
    #[must_use]
    pub fn cell_to_units(&self, column: u16, row: u16) -> Option<(i32, i32)> {
        if !self.contains(column, row) {
            return None;
        }
        let col = i32::from(column - self.area.x) + i32::from(self.scroll.0);
        let row = i32::from(row - self.area.y) + i32::from(self.scroll.1);
        let x = f64::from(col * self.units_per_column + self.units_per_column / 2) / self.scale;
        let y = f64::from(row * self.units_per_row + self.units_per_row / 2) / self.scale;
        Some((x.floor() as i32, y.floor() as i32))
    }

    /// Terminal cell containing a layout point, if visible.
    #[must_use]
    pub fn units_to_cell(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        let col = (f64::from(x) * self.scale / f64::from(self.units_per_column)).floor() as i32
            - i32::from(self.scroll.0);
        let row = (f64::from(y) * self.scale / f64::from(self.units_per_row)).floor() as i32
            - i32::from(self.scroll.1);
        if col < 0 || row < 0 || col >= i32::from(self.area.width) || row >= i32::from(self.area.height)
        {
            return None;
        }
        Some((self.area.x + col as u16, self.area.y + row as u16))
    }

    /// Cells covered by a key, clipped to the viewport. Every visible key
    /// gets at least one cell.
    #[must_use]
    pub fn rect_to_cells(&self, rect: KeyRect) -> Option<Rect> {
        let to_col =
            |x: i32| (f64::from(x) * self.scale / f64::from(self.units_per_column)).round() as i32;
        let to_row =
            |y: i32| (f64::from(y) * self.scale / f64::from(self.units_per_row)).round() as i32;

        let left = to_col(rect.x) - i32::from(self.scroll.0);
        let top = to_row(rect.y) - i32::from(self.scroll.1);
        let right = (to_col(rect.right()) - i32::from(self.scroll.0)).max(left + 1);
        let bottom = (to_row(rect.bottom()) - i32::from(self.scroll.1)).max(top + 1);

        let left = left.max(0);
        let top = top.max(0);
        let right = right.min(i32::from(self.area.width));
        let bottom = bottom.min(i32::from(self.area.height));
        if left >= right || top >= bottom {
            return None;
        }

        Some(Rect {
            x: self.area.x + left as u16,
            y: self.area.y + top as u16,
            width: (right - left) as u16,
            height: (bottom - top) as u16,
        })
    }

    /// Number of whole units covered by the visible columns and rows.
    #[must_use]
    pub fn visible_units(&self) -> (i32, i32) {
        (
            i32::from(self.area.width) * self.units_per_column,
            i32::from(self.area.height) * self.units_per_row,
        )
    }

    const fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.area.x
            && row >= self.area.y
            && column < self.area.x + self.area.width
            && row < self.area.y + self.area.height
    }
}

/// How a key is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyLook {
    Idle,
    Selected,
    Pressed,
}

/// Blends two RGB terminal colors; non-RGB colors are left as `from`.
fn blend(from: Color, to: Color, percent: u8) -> Color {
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => RgbColor::new(r1, g1, b1)
            .mix(&RgbColor::new(r2, g2, b2), percent)
            .to_ratatui_color(),
        _ => from,
    }
}

/// Canvas widget
pub struct CanvasView;

impl CanvasView {
    /// Block drawn around the canvas; its inner area is the viewport.
    #[must_use]
    pub fn block(state: &AppState) -> Block<'static> {
        let palette = &state.theme.canvas;
        let title = match state.mode {
            Mode::Editor => {
                let bounds = state.canvas.bounds();
                format!(" Editor {}x{} ", bounds.width, bounds.height)
            }
            Mode::Visualizer => " Visualizer ".to_string(),
        };
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .style(Style::default().bg(state.theme.background))
    }

    /// Render the canvas
    pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let block = Self::block(state);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let viewport = state.viewport_for(inner);
        let layout = state.canvas.layout();

        if state.mode == Mode::Editor {
            let bounds = state.canvas.bounds();
            if let Some(surface) =
                viewport.rect_to_cells(KeyRect::new(0, 0, bounds.width, bounds.height))
            {
                f.render_widget(
                    Block::default().style(Style::default().bg(theme.canvas.background)),
                    surface,
                );
            }
        } else {
            f.render_widget(
                Block::default().style(Style::default().bg(theme.canvas.background)),
                inner,
            );
        }

        if layout.keys.is_empty() {
            let hint = match state.mode {
                Mode::Editor => "Empty layout: click the canvas or press n to add a key",
                Mode::Visualizer => "Nothing to visualize: the layout has no keys",
            };
            let empty = Paragraph::new(hint)
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme.text_muted));
            f.render_widget(
                empty,
                Rect {
                    y: inner.y + inner.height / 2,
                    height: 1.min(inner.height),
                    ..inner
                },
            );
        }

        for key in &layout.keys {
            let Some(cells) = viewport.rect_to_cells(key.rect()) else {
                continue;
            };
            let look = match state.mode {
                Mode::Visualizer
                    if state
                        .visualizer
                        .as_ref()
                        .is_some_and(|v| v.is_pressed(&key.id)) =>
                {
                    KeyLook::Pressed
                }
                Mode::Editor if state.canvas.is_selected(&key.id) => KeyLook::Selected,
                _ => KeyLook::Idle,
            };
            Self::render_key(f, cells, key, look, theme);
        }

        if state.mode == Mode::Editor {
            Self::render_cursor(f, &viewport, state.cursor);
        }
    }

    fn render_key(f: &mut Frame, cells: Rect, key: &KeyDefinition, look: KeyLook, theme: &Theme) {
        let palette = &theme.canvas;
        let (fill, border, text) = match look {
            KeyLook::Idle => (palette.key, palette.key_border, palette.label),
            KeyLook::Selected => (
                palette.key_selected,
                palette.key_border_selected,
                palette.label,
            ),
            KeyLook::Pressed => (palette.key_pressed, palette.glow_edge, palette.label_pressed),
        };

        if cells.width < 3 || cells.height < 3 {
            let label: String = key.display_label().chars().take(cells.width as usize).collect();
            let tiny = Paragraph::new(label).style(Style::default().fg(text).bg(fill));
            f.render_widget(tiny, cells);
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(fill));
        let inner = block.inner(cells);
        f.render_widget(block, cells);

        if look == KeyLook::Pressed {
            Self::render_glow(f, inner, palette.glow_center, palette.key_pressed);
        }

        let mut lines = vec![Line::from(Span::styled(
            key.display_label().to_string(),
            Style::default().fg(text).add_modifier(Modifier::BOLD),
        ))];
        if inner.height > 1 && !key.key_bind.is_empty() && key.key_bind != key.display_label() {
            lines.push(Line::from(Span::styled(
                key.key_bind.clone(),
                Style::default().fg(palette.label_shadow),
            )));
        }
        let top_pad = inner.height.saturating_sub(lines.len() as u16) / 2;
        let label_area = Rect {
            y: inner.y + top_pad,
            height: inner.height - top_pad,
            ..inner
        };
        f.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            label_area,
        );

        if look == KeyLook::Selected {
            let handle = Style::default().fg(palette.handle);
            let buf = f.buffer_mut();
            for (x, y) in [
                (cells.x, cells.y),
                (cells.right() - 1, cells.y),
                (cells.x, cells.bottom() - 1),
                (cells.right() - 1, cells.bottom() - 1),
            ] {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_symbol("■").set_style(handle);
                }
            }
        }
    }

    /// Radial ramp from `center` in the middle to `edge` at the border.
    fn render_glow(f: &mut Frame, area: Rect, center: Color, edge: Color) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let cx = f64::from(area.width - 1) / 2.0;
        let cy = f64::from(area.height - 1) / 2.0;
        let max = cx.hypot(cy).max(1.0);
        let buf = f.buffer_mut();
        for row in 0..area.height {
            for col in 0..area.width {
                let distance = (f64::from(col) - cx).hypot(f64::from(row) - cy);
                let percent = ((distance / max) * 100.0).round().clamp(0.0, 100.0) as u8;
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_bg(blend(center, edge, percent));
                }
            }
        }
    }

    fn render_cursor(f: &mut Frame, viewport: &Viewport, cursor: (i32, i32)) {
        if let Some((x, y)) = viewport.units_to_cell(cursor.0, cursor.1) {
            if let Some(cell) = f.buffer_mut().cell_mut((x, y)) {
                let style = cell.style().add_modifier(Modifier::REVERSED);
                cell.set_style(style);
                if cell.symbol().trim().is_empty() {
                    cell.set_symbol("+");
                }
            }
        }
    }
}
