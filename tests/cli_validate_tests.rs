//! End-to-end tests for `keyviz validate` command.

use tempfile::TempDir;

mod fixtures;
use fixtures::*;

fn run_validate(layout_path: &std::path::Path, extra: &[&str]) -> std::process::Output {
    let config_dir = TempDir::new().unwrap();
    let mut args = vec!["validate", "--layout", layout_path.to_str().unwrap()];
    args.extend_from_slice(extra);
    isolated_command(&args, config_dir.path())
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_validate_valid_layout() {
    let layout = test_layout_basic(4);
    let (layout_path, _temp_dir) = create_temp_layout_file(&layout);

    let output = run_validate(&layout_path, &[]);

    assert_eq!(
        output.status.code(),
        Some(0),
        "Valid layout should exit with code 0. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Validation passed"));
    assert!(stdout.contains("Keys:   4"));
}

#[test]
fn test_validate_valid_layout_json() {
    let layout = test_layout_basic(3);
    let (layout_path, _temp_dir) = create_temp_layout_file(&layout);

    let output = run_validate(&layout_path, &["--json"]);
    assert_eq!(output.status.code(), Some(0));

    let result: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should parse JSON output");
    assert_eq!(result["valid"], true);
    assert_eq!(result["key_count"], 3);
    assert_eq!(result["routed_keys"], 3);
    assert_eq!(result["errors"].as_array().unwrap().len(), 0);
}

#[test]
fn test_validate_duplicate_binding_fails() {
    let layout = test_layout_with_duplicate_binding();
    let (layout_path, _temp_dir) = create_temp_layout_file(&layout);

    let output = run_validate(&layout_path, &["--json"]);
    assert_eq!(output.status.code(), Some(1), "Invalid layout should exit with code 1");

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["valid"], false);
    let errors = result["errors"].as_array().unwrap();
    assert!(errors
        .iter()
        .any(|e| e.as_str().unwrap().contains("already bound")));
}

#[test]
fn test_validate_warnings_pass_unless_strict() {
    let layout = test_layout_with_unbound_key();
    let (layout_path, _temp_dir) = create_temp_layout_file(&layout);

    let output = run_validate(&layout_path, &[]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("not bound to a key"));

    let output = run_validate(&layout_path, &["--strict"]);
    assert_eq!(output.status.code(), Some(1), "Strict mode should fail on warnings");
    assert!(String::from_utf8_lossy(&output.stderr).contains("strict"));
}

#[test]
fn test_validate_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.json");

    let output = run_validate(&missing, &[]);
    assert_eq!(output.status.code(), Some(2), "Missing file is an I/O error");
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}

#[test]
fn test_validate_unparsable_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let output = run_validate(&path, &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load layout"));
}

#[test]
fn test_validate_yaml_layout() {
    let layout = test_layout_basic(2);
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("board.yaml");
    keyviz::services::LayoutService::save(&layout, &path).unwrap();

    let output = run_validate(&path, &["--json"]);
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}
