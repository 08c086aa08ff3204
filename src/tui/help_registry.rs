//! Keybinding definitions shared by the status bar and the help overlay.
//!
//! Loaded from an embedded TOML file so both views describe the same keys.

use serde::Deserialize;
use std::collections::HashMap;

/// Embedded help definitions TOML file
const HELP_TOML: &str = include_str!("../data/help.toml");

/// A single keybinding definition
#[derive(Debug, Clone, Deserialize)]
pub struct Binding {
    /// Primary key(s) for this action
    pub keys: Vec<String>,
    /// Alternative keys
    #[serde(default)]
    pub alt_keys: Vec<String>,
    /// Full description of the action
    pub action: String,
    /// Short status bar hint; bindings without one stay out of the status bar
    pub hint: Option<String>,
    /// Display order, lower first
    #[serde(default = "default_priority")]
    pub priority: u32,
}

const fn default_priority() -> u32 {
    50
}

/// A context with its bindings
#[derive(Debug, Clone, Deserialize)]
pub struct Context {
    /// Human-readable name
    pub name: String,
    /// When this context is active
    pub description: String,
    /// Keybindings for this context
    pub bindings: Vec<Binding>,
}

/// Metadata about the help file
#[derive(Debug, Clone, Deserialize)]
pub struct HelpMeta {
    /// Version of the help file format
    pub version: String,
    /// Name of the application
    pub app_name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct HelpFile {
    meta: HelpMeta,
    contexts: HashMap<String, Context>,
}

/// Help registry providing access to keybinding definitions
#[derive(Debug, Clone)]
pub struct HelpRegistry {
    meta: HelpMeta,
    contexts: HashMap<String, Context>,
}

impl HelpRegistry {
    /// Load the help registry from the embedded TOML file
    pub fn load() -> Result<Self, toml::de::Error> {
        let help_file: HelpFile = toml::from_str(HELP_TOML)?;
        Ok(Self {
            meta: help_file.meta,
            contexts: help_file.contexts,
        })
    }

    /// Get the app name from metadata
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.meta.app_name
    }

    /// Get help file version from metadata.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.meta.version
    }

    /// Get a context by name
    #[must_use]
    pub fn get_context(&self, name: &str) -> Option<&Context> {
        self.contexts.get(name)
    }

    /// Get all bindings for a context, sorted by priority
    #[must_use]
    pub fn get_bindings(&self, context_name: &str) -> Vec<&Binding> {
        let Some(context) = self.contexts.get(context_name) else {
            return Vec::new();
        };
        let mut bindings: Vec<&Binding> = context.bindings.iter().collect();
        bindings.sort_by_key(|b| b.priority);
        bindings
    }

    /// Bindings with a status bar hint, sorted by priority
    #[must_use]
    pub fn get_status_bar_hints(&self, context_name: &str) -> Vec<&Binding> {
        self.get_bindings(context_name)
            .into_iter()
            .filter(|b| b.hint.is_some())
            .collect()
    }

    /// Format a binding for the help overlay as (`keys`, `action`).
    #[must_use]
    pub fn format_binding_for_help(binding: &Binding) -> (String, String) {
        let keys = if binding.alt_keys.is_empty() {
            binding.keys.join("/")
        } else {
            format!(
                "{} ({})",
                binding.keys.join("/"),
                binding.alt_keys.join("/")
            )
        };
        (keys, binding.action.clone())
    }

    /// Up to `max_hints` (`key`, `hint`) pairs for the status bar.
    #[must_use]
    pub fn format_status_bar_hints(
        &self,
        context_name: &str,
        max_hints: usize,
    ) -> Vec<(String, String)> {
        self.get_status_bar_hints(context_name)
            .into_iter()
            .take(max_hints)
            .map(|b| {
                let key = b.keys.first().map_or("", String::as_str);
                let hint = b.hint.as_deref().unwrap_or(&b.action);
                (key.to_string(), hint.to_string())
            })
            .collect()
    }
}

impl Default for HelpRegistry {
    fn default() -> Self {
        Self::load().unwrap_or_else(|err| {
            tracing::error!("embedded help.toml is invalid: {err}");
            Self {
                meta: HelpMeta {
                    version: String::new(),
                    app_name: crate::branding::APP_DISPLAY_NAME.to_string(),
                },
                contexts: HashMap::new(),
            }
        })
    }
}

/// Known context names
pub mod contexts {
    /// Editor canvas
    pub const EDITOR: &str = "editor";
    /// Visualizer
    pub const VISUALIZER: &str = "visualizer";
    /// Label and file name prompts
    pub const TEXT_INPUT: &str = "text_input";
    /// Waiting for a physical key to bind
    pub const BIND_CAPTURE: &str = "bind_capture";
    /// Layout picker popup
    pub const LAYOUT_PICKER: &str = "layout_picker";
    /// Help overlay
    pub const HELP: &str = "help";
    /// Unsaved changes prompt
    pub const UNSAVED_PROMPT: &str = "unsaved_prompt";
    /// Pointer actions (informational)
    pub const MOUSE: &str = "mouse";
}
