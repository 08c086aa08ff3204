//! Service layer for business logic.
//!
//! Services coordinate the models without touching the terminal: file I/O,
//! editing operations, and live visualization state.

pub mod canvas;
pub mod layouts;
pub mod router;
pub mod visualizer;

pub use canvas::{CanvasBounds, EditorCanvas, ResizeHandle};
pub use layouts::{LayoutInfo, LayoutService};
pub use router::KeyRouter;
pub use visualizer::{Highlight, Visualizer};
