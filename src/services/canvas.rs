//! Editor surface: create, select, drag, resize and delete keys.
//!
//! Everything here works in layout units and knows nothing about the
//! terminal. The TUI converts mouse cells to layout units and calls in.

use anyhow::Result;

use crate::config::EditorConfig;
use crate::models::{KeyBinding, KeyDefinition, KeyRect, Layout, LayoutMetadata};

/// Size limits of the editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasBounds {
    /// Canvas width
    pub width: i32,
    /// Canvas height
    pub height: i32,
    /// Edge length of new keys
    pub default_key_size: i32,
    /// Smallest key width/height
    pub min_key_size: i32,
    /// Width of the corner zone that grabs a resize handle
    pub handle_width: i32,
    /// Height of the corner zone that grabs a resize handle
    pub handle_height: i32,
}

impl CanvasBounds {
    /// Bounds from the editor config; handles are one terminal cell.
    #[must_use]
    pub fn from_config(editor: &EditorConfig) -> Self {
        Self {
            width: editor.canvas_width,
            height: editor.canvas_height,
            default_key_size: editor.default_key_size,
            min_key_size: editor.min_key_size,
            handle_width: editor.units_per_column,
            handle_height: editor.units_per_row,
        }
    }
}

impl Default for CanvasBounds {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

/// Corner a key is resized from. The opposite corner stays put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    /// Top-left corner
    TopLeft,
    /// Top-right corner
    TopRight,
    /// Bottom-left corner
    BottomLeft,
    /// Bottom-right corner
    BottomRight,
}

impl ResizeHandle {
    const fn moves_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft)
    }

    const fn moves_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight)
    }
}

#[derive(Debug, Clone)]
enum DragMode {
    Move,
    Resize { id: String, handle: ResizeHandle },
}

#[derive(Debug, Clone)]
struct DragState {
    origin: (i32, i32),
    start: Vec<(String, KeyRect)>,
    mode: DragMode,
    moved: bool,
}

/// Clamps a rectangle's position so it lies inside the bounds.
fn clamp_position(rect: KeyRect, bounds: &CanvasBounds) -> KeyRect {
    let max_x = (bounds.width - rect.width).max(0);
    let max_y = (bounds.height - rect.height).max(0);
    KeyRect::new(
        rect.x.clamp(0, max_x),
        rect.y.clamp(0, max_y),
        rect.width,
        rect.height,
    )
}

/// Resizes `rect` by dragging `handle` by `(dx, dy)`.
///
/// The opposite corner is fixed, both sides stay at least `min_key_size`,
/// and the moving edges stop at the canvas border.
#[must_use]
pub fn resize_rect(
    rect: KeyRect,
    handle: ResizeHandle,
    dx: i32,
    dy: i32,
    bounds: &CanvasBounds,
) -> KeyRect {
    let min = bounds.min_key_size;

    let (x, width) = if handle.moves_left() {
        let right = rect.right();
        let left = (rect.x + dx).clamp(0, (right - min).max(0));
        (left, right - left)
    } else {
        let right = (rect.right() + dx).clamp(rect.x + min, bounds.width.max(rect.x + min));
        (rect.x, right - rect.x)
    };

    let (y, height) = if handle.moves_top() {
        let bottom = rect.bottom();
        let top = (rect.y + dy).clamp(0, (bottom - min).max(0));
        (top, bottom - top)
    } else {
        let bottom =
            (rect.bottom() + dy).clamp(rect.y + min, bounds.height.max(rect.y + min));
        (rect.y, bottom - rect.y)
    };

    KeyRect::new(x, y, width, height)
}

/// A layout being edited, with selection and drag state.
#[derive(Debug, Clone)]
pub struct EditorCanvas {
    layout: Layout,
    bounds: CanvasBounds,
    selection: Vec<String>,
    drag: Option<DragState>,
    dirty: bool,
}

impl EditorCanvas {
    /// Wraps a layout. The canvas grows to fit keys that lie beyond it.
    pub fn new(layout: Layout, bounds: CanvasBounds) -> Self {
        let mut canvas = Self {
            layout,
            bounds,
            selection: Vec::new(),
            drag: None,
            dirty: false,
        };
        canvas.fit_bounds();
        canvas
    }

    fn fit_bounds(&mut self) {
        let (w, h) = self.layout.extent();
        self.bounds.width = self.bounds.width.max(w);
        self.bounds.height = self.bounds.height.max(h);
    }

    /// The layout being edited.
    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Current bounds.
    #[must_use]
    pub const fn bounds(&self) -> &CanvasBounds {
        &self.bounds
    }

    /// Swaps in another layout, dropping selection and unsaved state.
    pub fn replace_layout(&mut self, layout: Layout) {
        self.layout = layout;
        self.selection.clear();
        self.drag = None;
        self.dirty = false;
        self.fit_bounds();
    }

    /// Returns true if there are unsaved changes.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the layout as saved.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn changed(&mut self) {
        self.dirty = true;
        self.layout.touch();
    }

    /// Renames the layout.
    pub fn rename(&mut self, name: &str) {
        if self.layout.metadata.name != name {
            self.layout.metadata.name = name.to_string();
            self.changed();
        }
    }

    /// Puts back metadata saved before a rename that could not be written.
    pub fn restore_metadata(&mut self, metadata: LayoutMetadata, dirty: bool) {
        self.layout.metadata = metadata;
        self.dirty = dirty;
    }

    // ------------------------------------------------------------------
    // Hit testing
    // ------------------------------------------------------------------

    /// Id of the topmost key under the point.
    #[must_use]
    pub fn key_at(&self, x: i32, y: i32) -> Option<&str> {
        self.layout.key_at(x, y).map(|k| k.id.as_str())
    }

    /// Resize handle of key `id` under the point.
    #[must_use]
    pub fn handle_at(&self, id: &str, x: i32, y: i32) -> Option<ResizeHandle> {
        let rect = self.layout.find_key(id)?.rect();
        if !rect.contains(x, y) {
            return None;
        }
        let near_left = x < rect.x + self.bounds.handle_width;
        let near_right = x >= rect.right() - self.bounds.handle_width;
        let near_top = y < rect.y + self.bounds.handle_height;
        let near_bottom = y >= rect.bottom() - self.bounds.handle_height;

        match (near_left, near_right, near_top, near_bottom) {
            (true, _, true, _) => Some(ResizeHandle::TopLeft),
            (_, true, true, _) => Some(ResizeHandle::TopRight),
            (true, _, _, true) => Some(ResizeHandle::BottomLeft),
            (_, true, _, true) => Some(ResizeHandle::BottomRight),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Selected key ids, in selection order.
    #[must_use]
    pub fn selected_ids(&self) -> &[String] {
        &self.selection
    }

    /// Returns true if the key is selected.
    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.iter().any(|s| s == id)
    }

    /// The single selected key, if exactly one is selected.
    #[must_use]
    pub fn single_selected(&self) -> Option<&KeyDefinition> {
        match self.selection.as_slice() {
            [id] => self.layout.find_key(id),
            _ => None,
        }
    }

    /// Selects only `id`.
    pub fn select_only(&mut self, id: &str) {
        self.selection.clear();
        if self.layout.find_key(id).is_some() {
            self.selection.push(id.to_string());
        }
    }

    /// Adds or removes `id` from the selection.
    pub fn toggle_selected(&mut self, id: &str) {
        if let Some(pos) = self.selection.iter().position(|s| s == id) {
            self.selection.remove(pos);
        } else if self.layout.find_key(id).is_some() {
            self.selection.push(id.to_string());
        }
    }

    /// Deselects everything.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selects every key.
    pub fn select_all(&mut self) {
        self.selection = self.layout.keys.iter().map(|k| k.id.clone()).collect();
    }

    /// Moves a single selection to the next (or previous) key in layout order.
    pub fn cycle_selection(&mut self, forward: bool) {
        let count = self.layout.keys.len();
        if count == 0 {
            return;
        }
        let current = self
            .selection
            .last()
            .and_then(|id| self.layout.keys.iter().position(|k| &k.id == id));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
        };
        let id = self.layout.keys[next].id.clone();
        self.select_only(&id);
    }

    // ------------------------------------------------------------------
    // Create / delete / edit
    // ------------------------------------------------------------------

    /// Creates a default-size key centred on the point and selects it.
    ///
    /// Fails if another key is already bound to the same scan code.
    pub fn create_key_at(&mut self, x: i32, y: i32, binding: &KeyBinding) -> Result<String> {
        self.ensure_unbound(binding.scan_code, None)?;

        let size = self.bounds.default_key_size;
        let rect = clamp_position(
            KeyRect::new(x - size / 2, y - size / 2, size, size),
            &self.bounds,
        );
        let key = KeyDefinition::bound(binding, rect);
        let id = key.id.clone();

        tracing::debug!(key = %binding.name, x = rect.x, y = rect.y, "key created");
        self.layout.add_key(key);
        self.select_only(&id);
        self.changed();
        Ok(id)
    }

    fn ensure_unbound(&self, scan_code: u16, except: Option<&str>) -> Result<()> {
        if let Some(existing) = self
            .layout
            .keys
            .iter()
            .find(|k| k.scan_code == Some(scan_code) && Some(k.id.as_str()) != except)
        {
            anyhow::bail!(
                "Key '{}' is already bound to scan code {scan_code}",
                existing.display_label()
            );
        }
        Ok(())
    }

    /// Deletes a key.
    pub fn remove_key(&mut self, id: &str) -> bool {
        if self.layout.remove_key(id).is_none() {
            return false;
        }
        self.selection.retain(|s| s != id);
        self.changed();
        true
    }

    /// Deletes every selected key; returns how many were removed.
    pub fn remove_selected(&mut self) -> usize {
        let ids = std::mem::take(&mut self.selection);
        let removed = ids
            .iter()
            .filter(|id| self.layout.remove_key(id).is_some())
            .count();
        if removed > 0 {
            self.changed();
        }
        removed
    }

    /// Deletes all keys.
    pub fn clear(&mut self) {
        if self.layout.keys.is_empty() {
            return;
        }
        self.layout.keys.clear();
        self.selection.clear();
        self.drag = None;
        self.changed();
    }

    /// Changes a key's label.
    pub fn set_label(&mut self, id: &str, label: &str) -> Result<()> {
        let key = self
            .layout
            .find_key_mut(id)
            .ok_or_else(|| anyhow::anyhow!("No key with id {id}"))?;
        if key.label != label {
            key.label = label.to_string();
            self.changed();
        }
        Ok(())
    }

    /// Binds a key to another physical key.
    pub fn rebind(&mut self, id: &str, binding: &KeyBinding) -> Result<()> {
        self.ensure_unbound(binding.scan_code, Some(id))?;
        let key = self
            .layout
            .find_key_mut(id)
            .ok_or_else(|| anyhow::anyhow!("No key with id {id}"))?;
        key.bind(binding);
        self.changed();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Move / resize
    // ------------------------------------------------------------------

    /// Moves every selected key, keeping each inside the canvas.
    pub fn move_selected(&mut self, dx: i32, dy: i32) {
        let bounds = self.bounds;
        let mut moved = false;
        for id in &self.selection {
            if let Some(key) = self.layout.find_key_mut(id) {
                let rect = key.rect();
                let target = clamp_position(
                    KeyRect::new(rect.x + dx, rect.y + dy, rect.width, rect.height),
                    &bounds,
                );
                if target != rect {
                    key.set_rect(target);
                    moved = true;
                }
            }
        }
        if moved {
            self.changed();
        }
    }

    /// Resizes one key from a handle by `(dx, dy)`.
    pub fn resize(&mut self, id: &str, handle: ResizeHandle, dx: i32, dy: i32) -> bool {
        let bounds = self.bounds;
        let Some(key) = self.layout.find_key_mut(id) else {
            return false;
        };
        let rect = key.rect();
        let target = resize_rect(rect, handle, dx, dy, &bounds);
        if target == rect {
            return false;
        }
        key.set_rect(target);
        self.changed();
        true
    }

    /// Grows or shrinks every selected key from its bottom-right corner.
    pub fn resize_selected(&mut self, dw: i32, dh: i32) {
        let ids = self.selection.clone();
        for id in ids {
            self.resize(&id, ResizeHandle::BottomRight, dw, dh);
        }
    }

    /// Starts dragging the selected keys from the pointer position.
    pub fn begin_move(&mut self, x: i32, y: i32) {
        let start = self
            .selection
            .iter()
            .filter_map(|id| self.layout.find_key(id).map(|k| (id.clone(), k.rect())))
            .collect();
        self.drag = Some(DragState {
            origin: (x, y),
            start,
            mode: DragMode::Move,
            moved: false,
        });
    }

    /// Starts resizing key `id` from a handle.
    pub fn begin_resize(&mut self, id: &str, handle: ResizeHandle, x: i32, y: i32) {
        let Some(key) = self.layout.find_key(id) else {
            return;
        };
        self.drag = Some(DragState {
            origin: (x, y),
            start: vec![(id.to_string(), key.rect())],
            mode: DragMode::Resize {
                id: id.to_string(),
                handle,
            },
            moved: false,
        });
    }

    /// Returns true while a drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Follows the pointer during a drag.
    ///
    /// Positions are computed from where each key was when the drag began,
    /// so clamping at the border never distorts the group.
    pub fn update_drag(&mut self, x: i32, y: i32) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let (dx, dy) = (x - drag.origin.0, y - drag.origin.1);
        let bounds = self.bounds;
        let mut changed = false;

        match &drag.mode {
            DragMode::Move => {
                for (id, start) in &drag.start {
                    if let Some(key) = self.layout.find_key_mut(id) {
                        let target = clamp_position(
                            KeyRect::new(start.x + dx, start.y + dy, start.width, start.height),
                            &bounds,
                        );
                        if key.rect() != target {
                            key.set_rect(target);
                            changed = true;
                        }
                    }
                }
            }
            DragMode::Resize { id, handle } => {
                if let (Some(key), Some((_, start))) =
                    (self.layout.find_key_mut(id), drag.start.first())
                {
                    let target = resize_rect(*start, *handle, dx, dy, &bounds);
                    if key.rect() != target {
                        key.set_rect(target);
                        changed = true;
                    }
                }
            }
        }

        if changed {
            drag.moved = true;
            self.dirty = true;
        }
    }

    /// Ends the drag; returns true if anything moved.
    pub fn end_drag(&mut self) -> bool {
        let moved = self.drag.take().is_some_and(|d| d.moved);
        if moved {
            self.changed();
        }
        moved
    }
}
