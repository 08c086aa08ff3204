//! Key event listener.
//!
//! Physical key presses and releases arrive from one of two sources:
//!
//! - **evdev**: background threads read every keyboard under `/dev/input`
//!   and forward events over a channel. This sees keys system-wide, but
//!   needs read access to the device nodes (root or the `input` group).
//! - **terminal**: key events the terminal delivers to the TUI are fed in
//!   by the UI loop. Only keys typed into this terminal are seen.
//!
//! The UI drains [`KeyListener::poll`] once per frame.

mod devices;
pub mod terminal;

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use thiserror::Error;

use crate::keymap::ScanCodeTable;

/// Whether a key went down, auto-repeated, or came up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyEventKind {
    /// Key went down
    Press,
    /// Key held, auto-repeat
    Repeat,
    /// Key came up
    Release,
}

/// A physical key event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyEvent {
    /// Physical key code
    pub scan_code: u16,
    /// Canonical key name from the scan-code table
    pub name: String,
    /// Press, repeat or release
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Creates an event, naming the key from the table.
    pub fn new(table: &ScanCodeTable, scan_code: u16, kind: KeyEventKind) -> Self {
        Self {
            scan_code,
            name: table.name_for(scan_code),
            kind,
        }
    }
}

/// Requested key event source.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    /// evdev when devices can be opened, terminal otherwise
    #[default]
    Auto,
    /// System-wide input devices only
    Evdev,
    /// Keys typed into the terminal only
    Terminal,
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Evdev => "evdev",
            Self::Terminal => "terminal",
        };
        f.write_str(name)
    }
}

/// Source actually in use after start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSource {
    /// Reading `/dev/input` devices
    Evdev,
    /// Fed by the terminal event loop
    Terminal,
}

/// Failure to start system-wide key monitoring.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Device nodes exist but cannot be opened.
    #[error(
        "permission denied opening {denied} input device(s); \
         run with sudo or add your user to the 'input' group"
    )]
    PermissionDenied {
        /// Number of device nodes that refused access
        denied: usize,
    },
    /// No device reports keyboard keys.
    #[error("no keyboard input devices found under /dev/input")]
    NoDevices,
    /// Built without evdev support or not on Linux.
    #[error("system-wide key monitoring is not available on this platform or build")]
    Unsupported,
    /// Reading the device directory or spawning a reader failed.
    #[error("failed to start input reader: {0}")]
    Io(#[from] std::io::Error),
}

/// A keyboard device the evdev backend can read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// Device node path
    pub path: String,
    /// Name reported by the kernel
    pub name: String,
}

/// Lists readable keyboard devices without starting a listener.
pub fn probe_keyboards() -> Result<Vec<DeviceInfo>, ListenerError> {
    devices::probe()
}

/// Receives physical key events from the active source.
pub struct KeyListener {
    source: ActiveSource,
    table: Arc<ScanCodeTable>,
    receiver: Option<Receiver<KeyEvent>>,
    pending: VecDeque<KeyEvent>,
    stop: Arc<AtomicBool>,
    filter: Option<HashSet<u16>>,
    terminal_releases: bool,
    fallback_reason: Option<String>,
    device_count: usize,
}

impl KeyListener {
    /// Starts listening.
    ///
    /// `Auto` falls back to terminal input when evdev cannot start; the
    /// reason is kept in [`Self::fallback_reason`]. `Evdev` fails instead.
    pub fn start(source: InputSource, table: ScanCodeTable) -> Result<Self, ListenerError> {
        let table = Arc::new(table);
        let stop = Arc::new(AtomicBool::new(false));

        let mut listener = Self {
            source: ActiveSource::Terminal,
            table: Arc::clone(&table),
            receiver: None,
            pending: VecDeque::new(),
            stop: Arc::clone(&stop),
            filter: None,
            terminal_releases: false,
            fallback_reason: None,
            device_count: 0,
        };

        if source == InputSource::Terminal {
            tracing::info!("key listener using terminal input");
            return Ok(listener);
        }

        let (sender, receiver) = channel();
        match devices::spawn_readers(&sender, &table, &stop) {
            Ok(count) => {
                tracing::info!(devices = count, "key listener reading input devices");
                listener.source = ActiveSource::Evdev;
                listener.receiver = Some(receiver);
                listener.device_count = count;
                Ok(listener)
            }
            Err(err) if source == InputSource::Auto => {
                tracing::warn!("system-wide key monitoring unavailable: {err}");
                listener.fallback_reason = Some(err.to_string());
                Ok(listener)
            }
            Err(err) => Err(err),
        }
    }

    /// Creates a terminal-fed listener, for tests and headless use.
    pub fn terminal(table: ScanCodeTable) -> Self {
        Self {
            source: ActiveSource::Terminal,
            table: Arc::new(table),
            receiver: None,
            pending: VecDeque::new(),
            stop: Arc::new(AtomicBool::new(false)),
            filter: None,
            terminal_releases: false,
            fallback_reason: None,
            device_count: 0,
        }
    }

    /// Source in use.
    #[must_use]
    pub const fn source(&self) -> ActiveSource {
        self.source
    }

    /// Why `Auto` ended up on terminal input, if it did.
    #[must_use]
    pub fn fallback_reason(&self) -> Option<&str> {
        self.fallback_reason.as_deref()
    }

    /// Number of devices being read (evdev only).
    #[must_use]
    pub const fn device_count(&self) -> usize {
        self.device_count
    }

    /// Scan-code table used to name keys.
    #[must_use]
    pub fn table(&self) -> &ScanCodeTable {
        &self.table
    }

    /// Whether release events arrive, or must be synthesized by the caller.
    #[must_use]
    pub const fn reports_releases(&self) -> bool {
        match self.source {
            ActiveSource::Evdev => true,
            ActiveSource::Terminal => self.terminal_releases,
        }
    }

    /// Records whether the terminal reports key releases.
    pub fn set_terminal_releases(&mut self, enabled: bool) {
        self.terminal_releases = enabled;
    }

    /// Restricts [`Self::poll`] to the given key codes.
    pub fn monitor(&mut self, scan_codes: impl IntoIterator<Item = u16>) {
        self.filter = Some(scan_codes.into_iter().collect());
    }

    /// Lets every key code through again.
    pub fn monitor_all(&mut self) {
        self.filter = None;
    }

    /// Discards everything queued so far.
    pub fn flush(&mut self) {
        self.pending.clear();
        if let Some(receiver) = &self.receiver {
            while receiver.try_recv().is_ok() {}
        }
    }

    /// Feeds a terminal key event.
    ///
    /// Ignored when reading evdev devices, which already see the same key.
    /// Returns the translated event when it was queued.
    pub fn feed_terminal(&mut self, key: &crossterm::event::KeyEvent) -> Option<KeyEvent> {
        if self.source != ActiveSource::Terminal {
            return None;
        }
        let event = terminal::translate(&self.table, key)?;
        self.pending.push_back(event.clone());
        Some(event)
    }

    /// Drains every pending event that passes the monitor filter.
    pub fn poll(&mut self) -> Vec<KeyEvent> {
        let mut events: Vec<KeyEvent> = self.pending.drain(..).collect();

        if let Some(receiver) = &self.receiver {
            loop {
                match receiver.try_recv() {
                    Ok(event) => events.push(event),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        tracing::warn!("all input device readers stopped");
                        self.receiver = None;
                        self.fallback_reason = Some("input devices disconnected".to_string());
                        self.source = ActiveSource::Terminal;
                        break;
                    }
                }
            }
        }

        if let Some(filter) = &self.filter {
            events.retain(|event| filter.contains(&event.scan_code));
        }
        events
    }

    /// Stops the reader threads.
    ///
    /// Readers block on the device, so each exits after its next event.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        self.receiver = None;
        self.pending.clear();
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent as TermKey, KeyEventKind as TermKind, KeyModifiers};

    fn press(code: KeyCode) -> TermKey {
        TermKey::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> TermKey {
        TermKey::new_with_kind(code, KeyModifiers::NONE, TermKind::Release)
    }

    #[test]
    fn test_terminal_listener_queues_translated_events() {
        let mut listener = KeyListener::terminal(ScanCodeTable::load().unwrap());
        assert_eq!(listener.source(), ActiveSource::Terminal);
        assert!(!listener.reports_releases());

        let fed = listener.feed_terminal(&press(KeyCode::Char('a'))).unwrap();
        assert_eq!(fed.scan_code, 30);
        listener.feed_terminal(&release(KeyCode::Char('a')));

        let events = listener.poll();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, KeyEventKind::Press);
        assert_eq!(events[1].kind, KeyEventKind::Release);
        assert!(listener.poll().is_empty());
    }

    #[test]
    fn test_monitor_filter() {
        let mut listener = KeyListener::terminal(ScanCodeTable::load().unwrap());
        listener.monitor([57]);
        listener.feed_terminal(&press(KeyCode::Char('a')));
        listener.feed_terminal(&press(KeyCode::Char(' ')));

        let events = listener.poll();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "space");

        listener.monitor_all();
        listener.feed_terminal(&press(KeyCode::Char('a')));
        assert_eq!(listener.poll().len(), 1);
    }

    #[test]
    fn test_flush_and_stop() {
        let mut listener = KeyListener::terminal(ScanCodeTable::load().unwrap());
        listener.feed_terminal(&press(KeyCode::Enter));
        listener.flush();
        assert!(listener.poll().is_empty());

        listener.feed_terminal(&press(KeyCode::Enter));
        listener.stop();
        assert!(listener.poll().is_empty());
    }

    #[test]
    fn test_terminal_release_flag() {
        let mut listener = KeyListener::terminal(ScanCodeTable::load().unwrap());
        listener.set_terminal_releases(true);
        assert!(listener.reports_releases());
    }

    #[test]
    fn test_permission_error_mentions_remedy() {
        let message = ListenerError::PermissionDenied { denied: 3 }.to_string();
        assert!(message.contains("sudo"));
        assert!(message.contains("input"));
    }
}
