//! Keyboard shortcuts and the actions they trigger.
//!
//! Every command the TUI runs from a key is an [`Action`]; the registry maps
//! key chords to actions per context. The visualizer context only binds Ctrl
//! chords so every other key stays available for visualizing.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// All possible actions in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // === CURSOR ===
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,

    // === KEY EDITING ===
    NewKey,
    SelectAtCursor,
    EditLabel,
    RebindKey,
    NudgeUp,
    NudgeDown,
    NudgeLeft,
    NudgeRight,
    GrowWidth,
    ShrinkWidth,
    GrowHeight,
    ShrinkHeight,
    DeleteSelected,
    ClearLayout,

    // === SELECTION ===
    SelectNext,
    SelectPrevious,
    SelectAll,
    ClearSelection,

    // === FILE OPERATIONS ===
    Save,
    SaveAs,
    OpenLayout,
    Quit,

    // === MODES & VIEW ===
    ToggleVisualizer,
    ToggleToolbar,
    ToggleSound,
    ToggleHelp,
}

impl Action {
    /// Stable identifier, used in logs.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::CursorUp => "cursor_up",
            Self::CursorDown => "cursor_down",
            Self::CursorLeft => "cursor_left",
            Self::CursorRight => "cursor_right",

            Self::NewKey => "new_key",
            Self::SelectAtCursor => "select_at_cursor",
            Self::EditLabel => "edit_label",
            Self::RebindKey => "rebind_key",
            Self::NudgeUp => "nudge_up",
            Self::NudgeDown => "nudge_down",
            Self::NudgeLeft => "nudge_left",
            Self::NudgeRight => "nudge_right",
            Self::GrowWidth => "grow_width",
            Self::ShrinkWidth => "shrink_width",
            Self::GrowHeight => "grow_height",
            Self::ShrinkHeight => "shrink_height",
            Self::DeleteSelected => "delete_selected",
            Self::ClearLayout => "clear_layout",

            Self::SelectNext => "select_next",
            Self::SelectPrevious => "select_previous",
            Self::SelectAll => "select_all",
            Self::ClearSelection => "clear_selection",

            Self::Save => "save",
            Self::SaveAs => "save_as",
            Self::OpenLayout => "open_layout",
            Self::Quit => "quit",

            Self::ToggleVisualizer => "toggle_visualizer",
            Self::ToggleToolbar => "toggle_toolbar",
            Self::ToggleSound => "toggle_sound",
            Self::ToggleHelp => "toggle_help",
        }
    }
}

/// Shortcut context names.
pub mod contexts {
    /// Editor canvas
    pub const EDITOR: &str = "editor";
    /// Visualizer
    pub const VISUALIZER: &str = "visualizer";
}

/// A key binding (key + modifiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Create a new key binding.
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Create a key binding from a KeyEvent.
    ///
    /// Shift on a character is dropped when the character already carries
    /// it, since terminals disagree on whether to report it.
    #[must_use]
    pub fn from_event(event: KeyEvent) -> Self {
        let mut modifiers = event.modifiers;
        if let KeyCode::Char(c) = event.code {
            if !c.is_ascii_alphabetic() {
                modifiers.remove(KeyModifiers::SHIFT);
            }
        }
        Self {
            code: event.code,
            modifiers,
        }
    }
}

/// Maps (context, key chord) to an action.
pub struct ShortcutRegistry {
    bindings: HashMap<(String, KeyBinding), Action>,
}

impl ShortcutRegistry {
    /// Create a new shortcut registry with default bindings.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            bindings: HashMap::new(),
        };

        registry.register_editor_shortcuts();
        registry.register_visualizer_shortcuts();
        registry
    }

    /// Commands available in both modes.
    fn register_global(&mut self, ctx: &str) {
        use KeyCode as K;
        use KeyModifiers as M;

        self.register(ctx, K::Char('v'), M::CONTROL, Action::ToggleVisualizer);
        self.register(ctx, K::Char('t'), M::CONTROL, Action::ToggleToolbar);
        self.register(ctx, K::Char('e'), M::CONTROL, Action::ToggleSound);
        self.register(ctx, K::Char('g'), M::CONTROL, Action::ToggleHelp);
        self.register(ctx, K::Char('q'), M::CONTROL, Action::Quit);
    }

    fn register_editor_shortcuts(&mut self) {
        use KeyCode as K;
        use KeyModifiers as M;

        let ctx = contexts::EDITOR;
        self.register_global(ctx);

        // === CURSOR ===
        self.register(ctx, K::Up, M::NONE, Action::CursorUp);
        self.register(ctx, K::Down, M::NONE, Action::CursorDown);
        self.register(ctx, K::Left, M::NONE, Action::CursorLeft);
        self.register(ctx, K::Right, M::NONE, Action::CursorRight);

        // === KEY EDITING ===
        self.register(ctx, K::Char('n'), M::NONE, Action::NewKey);
        self.register(ctx, K::Char(' '), M::NONE, Action::SelectAtCursor);
        self.register(ctx, K::Enter, M::NONE, Action::EditLabel);
        self.register(ctx, K::Char('b'), M::NONE, Action::RebindKey);
        self.register(ctx, K::Up, M::SHIFT, Action::NudgeUp);
        self.register(ctx, K::Down, M::SHIFT, Action::NudgeDown);
        self.register(ctx, K::Left, M::SHIFT, Action::NudgeLeft);
        self.register(ctx, K::Right, M::SHIFT, Action::NudgeRight);
        self.register(ctx, K::Right, M::ALT, Action::GrowWidth);
        self.register(ctx, K::Left, M::ALT, Action::ShrinkWidth);
        self.register(ctx, K::Down, M::ALT, Action::GrowHeight);
        self.register(ctx, K::Up, M::ALT, Action::ShrinkHeight);
        self.register(ctx, K::Char('x'), M::NONE, Action::DeleteSelected);
        self.register(ctx, K::Delete, M::NONE, Action::DeleteSelected);
        self.register(ctx, K::Char('X'), M::SHIFT, Action::ClearLayout);

        // === SELECTION ===
        self.register(ctx, K::Tab, M::NONE, Action::SelectNext);
        self.register(ctx, K::BackTab, M::SHIFT, Action::SelectPrevious);
        self.register(ctx, K::BackTab, M::NONE, Action::SelectPrevious);
        self.register(ctx, K::Char('a'), M::CONTROL, Action::SelectAll);
        self.register(ctx, K::Esc, M::NONE, Action::ClearSelection);

        // === FILE OPERATIONS ===
        self.register(ctx, K::Char('s'), M::CONTROL, Action::Save);
        self.register(ctx, K::Char('S'), M::SHIFT, Action::SaveAs);
        self.register(ctx, K::Char('o'), M::CONTROL, Action::OpenLayout);

        // === HELP ===
        self.register(ctx, K::Char('?'), M::NONE, Action::ToggleHelp);
        self.register(ctx, K::F(1), M::NONE, Action::ToggleHelp);
    }

    fn register_visualizer_shortcuts(&mut self) {
        self.register_global(contexts::VISUALIZER);
    }

    fn register(&mut self, context: &str, code: KeyCode, modifiers: KeyModifiers, action: Action) {
        let binding = KeyBinding::new(code, modifiers);
        self.bindings.insert((context.to_string(), binding), action);
    }

    /// Look up an action for a given context and key event.
    #[must_use]
    pub fn lookup(&self, context: &str, event: KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(event);
        self.bindings.get(&(context.to_string(), binding)).copied()
    }

    /// Check if a key event matches a specific action in the given context.
    #[must_use]
    pub fn matches(&self, context: &str, event: KeyEvent, action: Action) -> bool {
        self.lookup(context, event) == Some(action)
    }
}

impl Default for ShortcutRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_editor_lookup() {
        let registry = ShortcutRegistry::new();
        assert_eq!(
            registry.lookup(contexts::EDITOR, key(KeyCode::Up, KeyModifiers::NONE)),
            Some(Action::CursorUp)
        );
        assert_eq!(
            registry.lookup(contexts::EDITOR, key(KeyCode::Up, KeyModifiers::SHIFT)),
            Some(Action::NudgeUp)
        );
        assert_eq!(
            registry.lookup(
                contexts::EDITOR,
                key(KeyCode::Char('s'), KeyModifiers::CONTROL)
            ),
            Some(Action::Save)
        );
        assert_eq!(
            registry.lookup(contexts::EDITOR, key(KeyCode::Char('S'), KeyModifiers::SHIFT)),
            Some(Action::SaveAs)
        );
    }

    #[test]
    fn test_question_mark_with_or_without_shift() {
        let registry = ShortcutRegistry::new();
        for modifiers in [KeyModifiers::NONE, KeyModifiers::SHIFT] {
            assert!(registry.matches(
                contexts::EDITOR,
                key(KeyCode::Char('?'), modifiers),
                Action::ToggleHelp
            ));
        }
    }

    #[test]
    fn test_visualizer_only_binds_ctrl_chords() {
        let registry = ShortcutRegistry::new();
        for code in [
            KeyCode::Char('a'),
            KeyCode::Char('x'),
            KeyCode::Char('?'),
            KeyCode::Esc,
            KeyCode::Enter,
            KeyCode::Up,
            KeyCode::F(1),
        ] {
            assert_eq!(
                registry.lookup(contexts::VISUALIZER, key(code, KeyModifiers::NONE)),
                None,
                "{code:?} must reach the visualizer"
            );
        }
        assert_eq!(
            registry.lookup(
                contexts::VISUALIZER,
                key(KeyCode::Char('v'), KeyModifiers::CONTROL)
            ),
            Some(Action::ToggleVisualizer)
        );
        assert_eq!(
            registry.lookup(
                contexts::VISUALIZER,
                key(KeyCode::Char('s'), KeyModifiers::CONTROL)
            ),
            None
        );
    }

    #[test]
    fn test_action_ids_are_unique() {
        let actions = [
            Action::CursorUp,
            Action::NewKey,
            Action::Save,
            Action::SaveAs,
            Action::ToggleVisualizer,
            Action::ToggleHelp,
        ];
        let mut ids: Vec<&str> = actions.iter().map(Action::id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), actions.len());
    }
}
