//! Terminal key events as physical key events.
//!
//! Terminals report characters, not scan codes, so a key is named the way
//! the scan-code table names it and looked up there. Shifted symbols map to
//! their unshifted key (`!` is the `1` key).

use crossterm::event::{
    KeyCode, KeyEvent as TermKeyEvent, KeyEventKind as TermKeyEventKind,
    KeyboardEnhancementFlags, MediaKeyCode, ModifierKeyCode, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use std::io::Write;

use super::{KeyEvent, KeyEventKind};
use crate::keymap::ScanCodeTable;

/// Name the scan-code table uses for a terminal key code.
pub fn key_name(code: &KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_lowercase().to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Tab | KeyCode::BackTab => "tab".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "page up".to_string(),
        KeyCode::PageDown => "page down".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::F(n) => format!("f{n}"),
        KeyCode::CapsLock => "caps lock".to_string(),
        KeyCode::ScrollLock => "scroll lock".to_string(),
        KeyCode::NumLock => "num lock".to_string(),
        KeyCode::PrintScreen => "print screen".to_string(),
        KeyCode::Pause => "pause".to_string(),
        KeyCode::Menu => "menu".to_string(),
        KeyCode::Modifier(modifier) => modifier_name(*modifier)?.to_string(),
        KeyCode::Media(media) => media_name(*media)?.to_string(),
        _ => return None,
    };
    Some(name)
}

const fn modifier_name(modifier: ModifierKeyCode) -> Option<&'static str> {
    Some(match modifier {
        ModifierKeyCode::LeftShift => "shift",
        ModifierKeyCode::RightShift => "right shift",
        ModifierKeyCode::LeftControl => "ctrl",
        ModifierKeyCode::RightControl => "right ctrl",
        ModifierKeyCode::LeftAlt => "alt",
        ModifierKeyCode::RightAlt => "alt gr",
        ModifierKeyCode::LeftSuper | ModifierKeyCode::LeftMeta => "left windows",
        ModifierKeyCode::RightSuper | ModifierKeyCode::RightMeta => "right windows",
        _ => return None,
    })
}

const fn media_name(media: MediaKeyCode) -> Option<&'static str> {
    Some(match media {
        MediaKeyCode::PlayPause | MediaKeyCode::Play | MediaKeyCode::Pause => "play/pause media",
        MediaKeyCode::Stop => "stop media",
        MediaKeyCode::TrackNext => "next track",
        MediaKeyCode::TrackPrevious => "previous track",
        MediaKeyCode::LowerVolume => "volume down",
        MediaKeyCode::RaiseVolume => "volume up",
        MediaKeyCode::MuteVolume => "volume mute",
        _ => return None,
    })
}

/// Converts a terminal key event; `None` for keys the table does not know.
pub fn translate(table: &ScanCodeTable, key: &TermKeyEvent) -> Option<KeyEvent> {
    let name = key_name(&key.code)?;
    let scan_code = table.code_for(&name)?;
    let kind = match key.kind {
        TermKeyEventKind::Press => KeyEventKind::Press,
        TermKeyEventKind::Repeat => KeyEventKind::Repeat,
        TermKeyEventKind::Release => KeyEventKind::Release,
    };
    Some(KeyEvent::new(table, scan_code, kind))
}

/// Asks the terminal to report key releases and repeats.
///
/// Returns false when the terminal does not speak the keyboard enhancement
/// protocol; releases must then be synthesized.
pub fn enable_release_reporting<W: Write>(out: &mut W) -> bool {
    match crossterm::terminal::supports_keyboard_enhancement() {
        Ok(true) => {}
        Ok(false) => return false,
        Err(err) => {
            tracing::debug!("keyboard enhancement query failed: {err}");
            return false;
        }
    }

    let flags = KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES;
    match crossterm::execute!(out, PushKeyboardEnhancementFlags(flags)) {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!("failed to enable key release reporting: {err}");
            false
        }
    }
}

/// Undoes [`enable_release_reporting`].
pub fn disable_release_reporting<W: Write>(out: &mut W) {
    if let Err(err) = crossterm::execute!(out, PopKeyboardEnhancementFlags) {
        tracing::debug!("failed to restore keyboard flags: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn table() -> ScanCodeTable {
        ScanCodeTable::load().unwrap()
    }

    #[test]
    fn test_characters_map_to_physical_keys() {
        let table = table();
        let key = TermKeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        let event = translate(&table, &key).unwrap();
        assert_eq!(event.scan_code, 30);
        assert_eq!(event.name, "a");

        let bang = TermKeyEvent::new(KeyCode::Char('!'), KeyModifiers::SHIFT);
        assert_eq!(translate(&table, &bang).unwrap().name, "1");
    }

    #[test]
    fn test_named_keys() {
        let table = table();
        for (code, name) in [
            (KeyCode::Enter, "enter"),
            (KeyCode::Char(' '), "space"),
            (KeyCode::F(5), "f5"),
            (KeyCode::PageDown, "page down"),
            (
                KeyCode::Modifier(ModifierKeyCode::RightShift),
                "right shift",
            ),
        ] {
            let event = translate(&table, &TermKeyEvent::new(code, KeyModifiers::NONE)).unwrap();
            assert_eq!(event.name, name);
        }
    }

    #[test]
    fn test_release_kind_is_kept() {
        let table = table();
        let key = TermKeyEvent::new_with_kind(
            KeyCode::Char('x'),
            KeyModifiers::NONE,
            TermKeyEventKind::Release,
        );
        assert_eq!(translate(&table, &key).unwrap().kind, KeyEventKind::Release);
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let table = table();
        let key = TermKeyEvent::new(KeyCode::Char('é'), KeyModifiers::NONE);
        assert!(translate(&table, &key).is_none());
        let key = TermKeyEvent::new(KeyCode::Null, KeyModifiers::NONE);
        assert!(translate(&table, &key).is_none());
    }
}
