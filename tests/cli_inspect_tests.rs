//! End-to-end tests for `keyviz inspect` command.

use std::process::Command;

mod fixtures;
use fixtures::*;

#[test]
fn test_inspect_json_lists_keys() {
    let layout = test_layout_with_unbound_key();
    let (layout_path, _temp_dir) = create_temp_layout_file(&layout);

    let output = Command::new(keyviz_bin())
        .args(["inspect", "--layout", layout_path.to_str().unwrap(), "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["name"], "Test Layout");
    assert_eq!(result["key_count"], 3);
    assert_eq!(result["routed"], 2);
    assert_eq!(result["unbound"], 1);
    assert_eq!(result["extent"]["width"], 240);
    assert_eq!(result["extent"]["height"], 40);

    let keys = result["keys"].as_array().unwrap();
    assert_eq!(keys[0]["key_bind"], "q");
    assert_eq!(keys[0]["scan_code"], 16);
    assert!(keys[2]["scan_code"].is_null());
}

#[test]
fn test_inspect_table_output() {
    let layout = test_layout_basic(2);
    let (layout_path, _temp_dir) = create_temp_layout_file(&layout);

    let output = Command::new(keyviz_bin())
        .args(["inspect", "--layout", layout_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 keys, 2 routed, 0 unbound"));
    assert!(stdout.contains("LABEL"));
    assert!(stdout.contains("W"));
}

#[test]
fn test_inspect_rejects_duplicate_binding() {
    let layout = test_layout_with_duplicate_binding();
    let (layout_path, _temp_dir) = create_temp_layout_file(&layout);

    let output = Command::new(keyviz_bin())
        .args(["inspect", "--layout", layout_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("both bound"));
}

#[test]
fn test_inspect_missing_file() {
    let output = Command::new(keyviz_bin())
        .args(["inspect", "--layout", "/nonexistent/layout.json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}
