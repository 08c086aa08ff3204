//! evdev reader threads.

use std::sync::atomic::AtomicBool;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use super::{DeviceInfo, KeyEvent, ListenerError};
use crate::keymap::ScanCodeTable;

#[cfg(all(target_os = "linux", feature = "evdev"))]
mod imp {
    use super::{DeviceInfo, KeyEvent, ListenerError, ScanCodeTable};
    use crate::input::KeyEventKind;
    use ::evdev::{Device, EventType, KeyCode};
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc::Sender;
    use std::sync::Arc;
    use std::thread;

    const INPUT_DIR: &str = "/dev/input";

    /// Opens every `/dev/input/event*` node that looks like a keyboard.
    fn open_keyboards() -> Result<Vec<(PathBuf, Device)>, ListenerError> {
        let mut nodes: Vec<PathBuf> = std::fs::read_dir(INPUT_DIR)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("event"))
            })
            .collect();
        nodes.sort();

        let mut keyboards = Vec::new();
        let mut denied = 0;

        for path in nodes {
            match Device::open(&path) {
                Ok(device) => {
                    if is_keyboard(&device) {
                        keyboards.push((path, device));
                    }
                }
                Err(err) if err.kind() == ErrorKind::PermissionDenied => denied += 1,
                Err(err) => {
                    tracing::debug!(path = %path.display(), "skipping input device: {err}");
                }
            }
        }

        if keyboards.is_empty() {
            if denied > 0 {
                return Err(ListenerError::PermissionDenied { denied });
            }
            return Err(ListenerError::NoDevices);
        }

        Ok(keyboards)
    }

    fn is_keyboard(device: &Device) -> bool {
        device.supported_keys().is_some_and(|keys| {
            keys.contains(KeyCode::KEY_A)
                && keys.contains(KeyCode::KEY_Z)
                && keys.contains(KeyCode::KEY_SPACE)
        })
    }

    fn info(path: &Path, device: &Device) -> DeviceInfo {
        DeviceInfo {
            path: path.display().to_string(),
            name: device.name().unwrap_or("unknown device").to_string(),
        }
    }

    pub(super) fn probe() -> Result<Vec<DeviceInfo>, ListenerError> {
        Ok(open_keyboards()?
            .iter()
            .map(|(path, device)| info(path, device))
            .collect())
    }

    pub(super) fn spawn_readers(
        sender: &Sender<KeyEvent>,
        table: &Arc<ScanCodeTable>,
        stop: &Arc<AtomicBool>,
    ) -> Result<usize, ListenerError> {
        let keyboards = open_keyboards()?;
        let count = keyboards.len();

        for (index, (path, mut device)) in keyboards.into_iter().enumerate() {
            let sender = sender.clone();
            let table = Arc::clone(table);
            let stop = Arc::clone(stop);
            let device_info = info(&path, &device);
            tracing::debug!(path = %device_info.path, name = %device_info.name, "reading keyboard");

            thread::Builder::new()
                .name(format!("keyviz-input-{index}"))
                .spawn(move || loop {
                    if stop.load(Ordering::Relaxed) {
                        break;
                    }
                    let events = match device.fetch_events() {
                        Ok(events) => events,
                        Err(err) => {
                            tracing::warn!(path = %device_info.path, "input device read failed: {err}");
                            break;
                        }
                    };
                    for event in events {
                        if event.event_type() != EventType::KEY {
                            continue;
                        }
                        let kind = match event.value() {
                            0 => KeyEventKind::Release,
                            1 => KeyEventKind::Press,
                            2 => KeyEventKind::Repeat,
                            _ => continue,
                        };
                        if sender.send(KeyEvent::new(&table, event.code(), kind)).is_err() {
                            return;
                        }
                    }
                })?;
        }

        Ok(count)
    }
}

#[cfg(not(all(target_os = "linux", feature = "evdev")))]
mod imp {
    use super::{DeviceInfo, KeyEvent, ListenerError, ScanCodeTable};
    use std::sync::atomic::AtomicBool;
    use std::sync::mpsc::Sender;
    use std::sync::Arc;

    pub(super) fn probe() -> Result<Vec<DeviceInfo>, ListenerError> {
        Err(ListenerError::Unsupported)
    }

    pub(super) fn spawn_readers(
        _sender: &Sender<KeyEvent>,
        _table: &Arc<ScanCodeTable>,
        _stop: &Arc<AtomicBool>,
    ) -> Result<usize, ListenerError> {
        Err(ListenerError::Unsupported)
    }
}

/// Lists readable keyboards.
pub(super) fn probe() -> Result<Vec<DeviceInfo>, ListenerError> {
    imp::probe()
}

/// Starts one reader thread per keyboard; returns how many were started.
pub(super) fn spawn_readers(
    sender: &Sender<KeyEvent>,
    table: &Arc<ScanCodeTable>,
    stop: &Arc<AtomicBool>,
) -> Result<usize, ListenerError> {
    imp::spawn_readers(sender, table, stop)
}
