//! CLI Integration Tests
//!
//! Tests the command-line interface end-to-end.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Get the binary to test.
fn blueprint() -> Command {
    Command::cargo_bin("blueprint").unwrap()
}

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    blueprint()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Guided business blueprint wizard"));
}

#[test]
fn test_version_flag() {
    blueprint()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ============================================================================
// Commands Catalog Tests
// ============================================================================

#[test]
fn test_commands_lists_catalog() {
    blueprint()
        .arg("commands")
        .assert()
        .success()
        .stdout(predicate::str::contains("Heading 1"))
        .stdout(predicate::str::contains("AI Generate"))
        .stdout(predicate::str::contains("Total: 13 commands"));
}

#[test]
fn test_commands_query_filters_in_order() {
    let output = blueprint().args(["commands", "--query", "head"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let h1 = stdout.find("Heading 1").unwrap();
    let h2 = stdout.find("Heading 2").unwrap();
    let h3 = stdout.find("Heading 3").unwrap();
    assert!(h1 < h2 && h2 < h3);
    assert!(stdout.contains("Total: 3 commands"));
    assert!(!stdout.contains("Quote"));
}

#[test]
fn test_commands_json_format() {
    let output = blueprint().args(["commands", "--format", "json", "--query", "swot"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let commands = json.as_array().unwrap();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0]["id"], "swot-template");
    assert_eq!(commands[0]["icon"], "chart");
}

#[test]
fn test_commands_no_match() {
    blueprint()
        .args(["commands", "--query", "zzzz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 0 commands"));
}

#[test]
fn test_commands_invalid_format() {
    blueprint().args(["commands", "--format", "yaml"]).assert().failure();
}

// ============================================================================
// Suggest Tests
// ============================================================================

#[test]
fn test_suggest_follow_up_offline() {
    let output = blueprint()
        .args([
            "suggest",
            "follow-up",
            "--customer-type",
            "external",
            "--problem",
            "Churn",
            "--location",
            "Canada",
            "--offline",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["title"], "Who are your customers?");
    assert_eq!(json["source"]["kind"], "fallback");
    assert_eq!(json["suggestions"].as_array().unwrap().len(), 4);
}

#[test]
fn test_suggest_differentiators_offline_internal() {
    let output = blueprint()
        .args([
            "suggest",
            "differentiators",
            "--customer-type",
            "internal",
            "--problem",
            "Manual payroll",
            "--offline",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["title"], "Core advantages");
}

#[test]
fn test_suggest_missing_problem_fails() {
    blueprint()
        .args(["suggest", "follow-up", "--customer-type", "external", "--location", "Canada"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--problem"));
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_shows_defaults() {
    let temp = assert_fs::TempDir::new().unwrap();

    blueprint()
        .arg("config")
        .current_dir(temp.path())
        .env("XDG_CONFIG_HOME", temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[editor]"))
        .stdout(predicate::str::contains("max_visible_commands = 10"));
}

#[test]
fn test_config_reads_local_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child(".blueprint.toml").write_str("[ui]\ntheme = \"nord\"\n").unwrap();

    blueprint()
        .arg("config")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("theme = \"nord\""));
}

#[test]
fn test_config_path() {
    let temp = assert_fs::TempDir::new().unwrap();

    blueprint()
        .args(["config", "--path"])
        .env("XDG_CONFIG_HOME", temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ============================================================================
// Completions Tests
// ============================================================================

#[test]
fn test_completions_bash() {
    blueprint()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("blueprint"));
}
