//! Integration tests for the provctl command surface.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Nothing listens on the discard port, so every request fails fast.
const DEAD_SERVER: &str = "http://127.0.0.1:9";

/// A command isolated from the user's config file and environment.
fn provctl(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("provctl"));
    cmd.env("NO_COLOR", "1")
        .env("PROVCTL_CONFIG", dir.path().join("config.yaml"))
        .env("PROVCTL_SERVER", DEAD_SERVER)
        .env_remove("RUST_LOG")
        .env_remove("PROVCTL_YES")
        .env_remove("CI");
    cmd
}

fn temp() -> TempDir {
    TempDir::new().expect("temp dir")
}

// --- Help and version ---

#[test]
fn test_cli_no_args_shows_help() {
    let dir = temp();
    provctl(&dir).assert().code(2).stderr(predicate::str::contains(
        "Provision named compute instances",
    ));
}

#[test]
fn test_cli_help_lists_commands() {
    let dir = temp();
    provctl(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("clear-cache"));
}

#[test]
fn test_version_command_shows_version() {
    let dir = temp();
    provctl(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!(
            "provctl ",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let dir = temp();
    let output = provctl(&dir)
        .args(["version", "--json"])
        .output()
        .expect("runs");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(v["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_create_requires_prefix_argument() {
    let dir = temp();
    provctl(&dir)
        .arg("create")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<PREFIX>"));
}

// --- Workflow failure paths ---

#[test]
fn test_create_blank_prefix_fails_without_network() {
    let dir = temp();
    provctl(&dir)
        .args(["create", "   "])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("please enter a prefix"));
}

#[test]
fn test_create_unreachable_server_reports_validation_failure() {
    let dir = temp();
    provctl(&dir)
        .args(["create", "web1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not validate prefix"));
}

#[test]
fn test_create_json_reports_rejected_outcome() {
    let dir = temp();
    let output = provctl(&dir)
        .args(["--json", "create", "web1"])
        .output()
        .expect("runs");
    assert_eq!(output.status.code(), Some(1));
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(v["outcome"], "rejected");
    assert_eq!(v["banner"]["kind"], "failure");
}

#[test]
fn test_validate_unreachable_server_is_invalid() {
    let dir = temp();
    let output = provctl(&dir)
        .args(["--json", "validate", "web1"])
        .output()
        .expect("runs");
    assert_eq!(output.status.code(), Some(1));
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(v["valid"], false);
    assert_eq!(v["code"], "unavailable");
}

#[test]
fn test_watch_blank_job_id_is_an_error() {
    let dir = temp();
    provctl(&dir)
        .args(["watch", " "])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("please enter a job id"));
}

#[test]
fn test_watch_unreachable_server_fails() {
    let dir = temp();
    provctl(&dir)
        .args(["watch", "j1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not check the status of job j1"));
}

#[test]
fn test_status_unreachable_server_json_error() {
    let dir = temp();
    let output = provctl(&dir)
        .args(["--json", "status", "j1"])
        .output()
        .expect("runs");
    assert_eq!(output.status.code(), Some(1));
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(v["error"], true);
    assert!(
        v["message"]
            .as_str()
            .expect("message")
            .contains("could not check the status of job j1")
    );
}

#[test]
fn test_list_unreachable_server_fails() {
    let dir = temp();
    provctl(&dir)
        .arg("list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not load the instance list"));
}

#[test]
fn test_ping_unreachable_server_reports_error() {
    let dir = temp();
    let output = provctl(&dir)
        .args(["--json", "ping", "web1"])
        .output()
        .expect("runs");
    assert_eq!(output.status.code(), Some(1));
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(v["hostname"], "web1.instances.local");
    assert_eq!(v["liveness"], "error");
}

#[test]
fn test_clear_cache_with_yes_reports_failure() {
    let dir = temp();
    provctl(&dir)
        .args(["--yes", "clear-cache"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not reach the server"));
}

#[test]
fn test_invalid_server_override_is_rejected() {
    let dir = temp();
    provctl(&dir)
        .args(["--server", "ftp://nope", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("server.url"));
}

// --- Colour environment ---

#[test]
fn test_no_color_env_accepts_any_non_empty_value() {
    let dir = temp();
    for value in ["1", "yes", "true", "0", "false", ""] {
        provctl(&dir)
            .env("NO_COLOR", value)
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::contains("provctl "));
    }
}
