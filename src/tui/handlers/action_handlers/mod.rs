//! Action handlers organized by category

/// File operations handlers (save, save as, open, quit)
pub mod file_ops;

/// Key creation, editing and deletion handlers
pub mod key_ops;

/// Mode and view toggles
pub mod modes;

/// Cursor movement handlers
pub mod navigation;

/// Key selection handlers
pub mod selection;
