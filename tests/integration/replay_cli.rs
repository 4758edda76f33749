//! End-to-end runs of the `change-cache` binary

use serde_json::{json, Value};
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn write_inputs(dir: &TempDir, ops: Value) -> (std::path::PathBuf, std::path::PathBuf) {
    let data = dir.path().join("data.json");
    let journal = dir.path().join("ops.json");
    fs::write(
        &data,
        json!({"player": {"hp": 100, "items": [1, 2, 3]}, "gold": 50}).to_string(),
    )
    .unwrap();
    fs::write(&journal, ops.to_string()).unwrap();
    (data, journal)
}

#[test]
fn test_replay_prints_packed_change_sets() {
    let temp_dir = TempDir::new().unwrap();
    let (data, journal) = write_inputs(
        &temp_dir,
        json!([
            {"op": "set", "path": "player.hp", "value": 90},
            {"op": "pack"},
            {"op": "remove", "path": "player"},
            {"op": "set", "path": "gold", "value": 60}
        ]),
    );

    let output = Command::new(env!("CARGO_BIN_EXE_change-cache"))
        .env("CHANGE_CACHE_LOG", "off")
        .arg("replay")
        .arg("--data")
        .arg(&data)
        .arg("--ops")
        .arg(&journal)
        .arg("--flush")
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "replay should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    let printed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        printed,
        json!([
            {"updated": {"player.hp": 90}},
            {"removed": {"player": true}, "updated": {"gold": 60}}
        ])
    );
}

#[test]
fn test_replay_rejects_malformed_journal() {
    let temp_dir = TempDir::new().unwrap();
    let (data, journal) = write_inputs(&temp_dir, json!([{"op": "explode"}]));

    let output = Command::new(env!("CARGO_BIN_EXE_change-cache"))
        .env("CHANGE_CACHE_LOG", "off")
        .arg("replay")
        .arg("--data")
        .arg(&data)
        .arg("--ops")
        .arg(&journal)
        .output()
        .unwrap();

    assert!(!output.status.success());
}

#[test]
fn test_config_default_prints_toml() {
    let output = Command::new(env!("CARGO_BIN_EXE_change-cache"))
        .env("CHANGE_CACHE_LOG", "off")
        .arg("config")
        .arg("default")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[cache]"));
    assert!(stdout.contains("clear_on_pack = true"));
}
