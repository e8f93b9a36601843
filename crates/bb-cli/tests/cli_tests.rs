//! CLI integration tests

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn bb() -> Command {
    cargo_bin_cmd!("bb")
}

/// The LED circuit fixture shared with bb-core's tests.
fn led_circuit() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("bb-core")
        .join("tests")
        .join("fixtures")
        .join("led_circuit.json")
}

#[test]
fn test_cli_help() {
    bb().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Breadboard"));
}

#[test]
fn test_cli_version() {
    bb().arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_argument_is_usage_error() {
    bb().arg("validate").assert().code(1);
    bb().arg("frobnicate").assert().code(1);
}

#[test]
fn test_new_then_validate() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.json");

    bb().args(["new", "-o"]).arg(&path).assert().success();
    assert!(path.exists());

    bb().arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("no issues found"));
}

#[test]
fn test_validate_fixture() {
    bb().arg("validate").arg(led_circuit()).assert().success();
}

#[test]
fn test_missing_file_is_input_error() {
    bb().arg("validate")
        .arg("does-not-exist.json")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn test_corrupted_file_is_input_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, r#"{"components": []}"#).unwrap();

    bb().arg("validate").arg(&path).assert().code(2);
}

#[test]
fn test_dangling_wire_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dangling.json");
    std::fs::write(
        &path,
        r#"{
            "components": [],
            "connections": [{"from": {"customPointId": 1}, "to": {"customPointId": 2}}],
            "customConnectionPoints": []
        }"#,
    )
    .unwrap();

    bb().arg("validate")
        .arg(&path)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("warning[dangling-wire]"));
}

#[test]
fn test_svg_to_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("board.svg");

    bb().arg("svg")
        .arg(led_circuit())
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("class=\"wire\"").count(), 4);
}

#[test]
fn test_payload() {
    let output = bb().arg("payload").arg(led_circuit()).output().unwrap();
    assert!(output.status.success());

    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["components"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["components"][0]["type"], "battery");
    assert_eq!(body["components"][0]["value"], 9.0);
    assert_eq!(body["connections"].as_array().map(Vec::len), Some(4));
}

#[test]
fn test_inspect_json() {
    let output = bb()
        .args(["inspect", "--json"])
        .arg(led_circuit())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["components"], 3);
    assert_eq!(report["byType"]["led"], 1);
    assert_eq!(report["drawableConnections"], 4);
    assert_eq!(report["customPoints"], 1);
    assert_eq!(report["nets"].as_array().map(Vec::len), Some(3));
}

#[test]
fn test_inspect_text() {
    bb().arg("inspect")
        .arg(led_circuit())
        .assert()
        .success()
        .stdout(predicate::str::contains("components: 3"))
        .stdout(predicate::str::contains("nets: 3"));
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("store");
    let out = dir.path().join("restored.json");

    bb().arg("save")
        .arg(led_circuit())
        .arg("--store")
        .arg(&store)
        .assert()
        .success();
    assert!(store.join("breadboardCircuit.json").exists());

    bb().args(["load", "--store"])
        .arg(&store)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    bb().arg("validate").arg(&out).assert().success();
}

#[test]
fn test_load_from_empty_store() {
    let dir = TempDir::new().unwrap();

    bb().args(["load", "--store"])
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no circuit saved"));
}
