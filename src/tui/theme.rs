//! Theme system for consistent UI colors across dark and light modes.
//!
//! Chrome colors (borders, status text, popups) follow the OS or the
//! configured [`ThemeMode`]. Canvas colors (keys, glow, toolbar, dialogs)
//! come from the color tables in the config file.

use ratatui::style::Color;

use crate::config::{Config, ThemeMode};

/// Colors used to paint the canvas, taken from the config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasPalette {
    /// Canvas background
    pub background: Color,
    /// Canvas border
    pub border: Color,
    /// Idle key fill
    pub key: Color,
    /// Selected key fill
    pub key_selected: Color,
    /// Held key fill
    pub key_pressed: Color,
    /// Inner glow of a held key
    pub glow_center: Color,
    /// Outer glow of a held key
    pub glow_edge: Color,
    /// Idle key border
    pub key_border: Color,
    /// Selected key border
    pub key_border_selected: Color,
    /// Label on idle keys
    pub label: Color,
    /// Label on held keys
    pub label_pressed: Color,
    /// Binding names and other secondary key text
    pub label_shadow: Color,
    /// Resize handle markers
    pub handle: Color,
    /// Toolbar chip background
    pub toolbar_chip: Color,
    /// Toolbar chip text
    pub toolbar_text: Color,
    /// Highlighted toolbar chip
    pub toolbar_active: Color,
    /// Unavailable toolbar chip background
    pub toolbar_disabled_bg: Color,
    /// Unavailable toolbar chip text
    pub toolbar_disabled_text: Color,
    /// Popup background
    pub dialog_background: Color,
    /// Popup text
    pub dialog_text: Color,
    /// Text input background
    pub input_background: Color,
    /// Text input border
    pub input_border: Color,
}

impl CanvasPalette {
    /// Converts the config color tables.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let keys = &config.key_colors;
        let window = &config.main_window;
        let dialog = &config.dialog_colors;
        Self {
            background: window.main_background.to_ratatui_color(),
            border: window.button_border.to_ratatui_color(),
            key: keys.normal.to_ratatui_color(),
            key_selected: keys.selected.to_ratatui_color(),
            key_pressed: keys.pressed.to_ratatui_color(),
            glow_center: keys.glow_center.to_ratatui_color(),
            glow_edge: keys.glow_edge.to_ratatui_color(),
            key_border: keys.highlight_normal.to_ratatui_color(),
            key_border_selected: keys.highlight_selected.to_ratatui_color(),
            label: keys.text_normal.to_ratatui_color(),
            label_pressed: keys.text_pressed.to_ratatui_color(),
            label_shadow: keys.text_shadow.to_ratatui_color(),
            handle: keys.resize_handle.to_ratatui_color(),
            toolbar_chip: window.button_normal.to_ratatui_color(),
            toolbar_text: window.button_text.to_ratatui_color(),
            toolbar_active: window.button_hover.to_ratatui_color(),
            toolbar_disabled_bg: window.button_disabled_bg.to_ratatui_color(),
            toolbar_disabled_text: window.button_disabled_text.to_ratatui_color(),
            dialog_background: dialog.dialog_background.to_ratatui_color(),
            dialog_text: dialog.text_color.to_ratatui_color(),
            input_background: dialog.input_background.to_ratatui_color(),
            input_border: dialog.input_border.to_ratatui_color(),
        }
    }
}

impl Default for CanvasPalette {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Semantic color theme for the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    // Primary UI colors
    /// Primary color for borders, titles, and emphasis
    pub primary: Color,
    /// Accent color for highlights, selections, and focus states
    pub accent: Color,
    /// Success state color for confirmations and success messages
    pub success: Color,
    /// Error state color for errors and destructive actions
    pub error: Color,
    /// Warning state color for warnings and cautions
    pub warning: Color,

    // Text hierarchy
    /// Primary text content color
    pub text: Color,
    /// Secondary text color for labels and less important content
    pub text_secondary: Color,
    /// Muted text color for help text, disabled items, and dim content
    pub text_muted: Color,

    // Backgrounds
    /// Main background color
    pub background: Color,
    /// Highlight/selection background color
    pub highlight_bg: Color,

    // State indicators
    /// Active/focused element color
    pub active: Color,

    /// Canvas colors from the config
    pub canvas: CanvasPalette,
}

impl Theme {
    /// Detects the OS theme and returns the matching chrome.
    #[must_use]
    pub fn detect() -> Self {
        match dark_light::detect() {
            Ok(dark_light::Mode::Light) => Self::light(),
            // Fall back to dark theme for dark mode, unspecified, or errors
            Ok(dark_light::Mode::Dark | dark_light::Mode::Unspecified) | Err(_) => Self::dark(),
        }
    }

    /// Chrome for dark terminal backgrounds.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            primary: Color::Cyan,
            accent: Color::Yellow,
            success: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,

            text: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,

            background: Color::Black,
            highlight_bg: Color::DarkGray,

            active: Color::Yellow,

            canvas: CanvasPalette::default(),
        }
    }

    /// Chrome for light terminal backgrounds.
    #[must_use]
    pub fn light() -> Self {
        Self {
            primary: Color::Blue,
            accent: Color::Rgb(180, 100, 0),
            success: Color::Rgb(0, 128, 0),
            error: Color::Red,
            warning: Color::Rgb(200, 100, 0),

            text: Color::Black,
            text_secondary: Color::Rgb(60, 60, 60),
            text_muted: Color::Gray,

            background: Color::White,
            highlight_bg: Color::Rgb(230, 230, 230),

            active: Color::Rgb(180, 100, 0),

            canvas: CanvasPalette::default(),
        }
    }

    /// Chrome for a mode preference; `Auto` asks the OS.
    #[must_use]
    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Auto => Self::detect(),
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Full theme for a config: mode-dependent chrome plus its canvas colors.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            canvas: CanvasPalette::from_config(config),
            ..Self::from_mode(config.ui.theme_mode)
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RgbColor;

    #[test]
    fn test_dark_and_light_differ() {
        assert_ne!(Theme::dark().background, Theme::light().background);
        assert_eq!(Theme::dark().text, Color::White);
        assert_eq!(Theme::light().text, Color::Black);
    }

    #[test]
    fn test_explicit_modes() {
        assert_eq!(Theme::from_mode(ThemeMode::Dark), Theme::dark());
        assert_eq!(Theme::from_mode(ThemeMode::Light), Theme::light());
    }

    #[test]
    fn test_canvas_colors_come_from_config() {
        let mut config = Config::default();
        config.ui.theme_mode = ThemeMode::Light;
        config.key_colors.pressed = RgbColor::new(1, 2, 3);
        config.dialog_colors.input_border = RgbColor::new(9, 8, 7);

        let theme = Theme::from_config(&config);
        assert_eq!(theme.primary, Theme::light().primary);
        assert_eq!(theme.canvas.key_pressed, Color::Rgb(1, 2, 3));
        assert_eq!(theme.canvas.input_border, Color::Rgb(9, 8, 7));
    }
}
