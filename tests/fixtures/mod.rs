//! Shared test fixtures for E2E CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use chrono::{TimeZone, Utc};
use keyviz::models::{KeyBinding, KeyDefinition, KeyRect, Layout, LayoutMetadata};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Letter keys used to fill test rows, with their scan codes.
const LETTERS: [(&str, u16); 10] = [
    ("q", 16),
    ("w", 17),
    ("e", 18),
    ("r", 19),
    ("t", 20),
    ("a", 30),
    ("s", 31),
    ("d", 32),
    ("f", 33),
    ("g", 34),
];

/// Path to the keyviz binary
pub fn keyviz_bin() -> &'static str {
    env!("CARGO_BIN_EXE_keyviz")
}

/// Creates a Command whose config directory is `config_dir`.
pub fn isolated_command(args: &[&str], config_dir: &Path) -> Command {
    let mut cmd = Command::new(keyviz_bin());
    cmd.env("KEYVIZ_CONFIG_DIR", config_dir);
    cmd.env_remove("KEYVIZ_LOG");
    cmd.args(args);
    cmd
}

/// Creates a basic layout of `count` bound letter keys in one row.
///
/// Metadata timestamps are fixed so output is deterministic.
pub fn test_layout_basic(count: usize) -> Layout {
    let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let modified = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();

    let mut layout = Layout {
        metadata: LayoutMetadata {
            name: "Test Layout".to_string(),
            description: "E2E test layout".to_string(),
            created,
            modified,
            ..LayoutMetadata::default()
        },
        keys: Vec::new(),
    };

    for (index, (name, code)) in LETTERS.iter().take(count).enumerate() {
        let x = i32::try_from(index).unwrap() * 50;
        let mut key =
            KeyDefinition::bound(&KeyBinding::new(*name, *code), KeyRect::new(x, 0, 40, 40));
        key.id = format!("key-{index}");
        key.label = name.to_uppercase();
        layout.keys.push(key);
    }
    layout
}

/// A layout with two keys bound to the same scan code.
pub fn test_layout_with_duplicate_binding() -> Layout {
    let mut layout = test_layout_basic(2);
    layout.keys[1].key_bind = layout.keys[0].key_bind.clone();
    layout.keys[1].scan_code = layout.keys[0].scan_code;
    layout
}

/// A valid layout that still produces warnings (one unbound key).
pub fn test_layout_with_unbound_key() -> Layout {
    let mut layout = test_layout_basic(2);
    let mut key = KeyDefinition::new("Blank", KeyRect::new(200, 0, 40, 40));
    key.id = "unbound".to_string();
    layout.keys.push(key);
    layout
}

/// Writes a layout to a JSON file as-is, invalid layouts included.
pub fn write_layout_file(layout: &Layout, path: &Path) {
    let json = serde_json::to_string_pretty(layout).expect("Failed to serialize layout");
    fs::write(path, json).expect("Failed to write layout");
}

/// Creates a temporary layout file.
///
/// Returns the file path and the temp dir, which must be kept alive.
pub fn create_temp_layout_file(layout: &Layout) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("test_layout.json");
    write_layout_file(layout, &path);
    (path, temp_dir)
}
