//! Integration tests for the `mealgate` CLI binary.
//!
//! These validate argument parsing, help output, offline commands, and
//! error handling -- all without a live registration backend.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `mealgate` binary with env isolation.
///
/// Points HOME/XDG at a temp dir so tests never touch the user's real
/// config or stored token, and clears all `MEALGATE_*` env vars.
fn mealgate_cmd(home: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("mealgate");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("MEALGATE_ENDPOINT")
        .env_remove("MEALGATE_TOKEN")
        .env_remove("MEALGATE_OUTPUT")
        .env_remove("MEALGATE_INSECURE")
        .env_remove("MEALGATE_TIMEOUT");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = mealgate_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    mealgate_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("meal")
            .and(predicate::str::contains("check"))
            .and(predicate::str::contains("history"))
            .and(predicate::str::contains("slot")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    mealgate_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mealgate"));
}

// ── Offline commands ────────────────────────────────────────────────

#[test]
fn test_slot_works_without_endpoint_or_token() {
    let home = tempfile::tempdir().unwrap();
    let output = mealgate_cmd(home.path()).arg("slot").output().unwrap();
    assert!(output.status.success(), "slot should not need a backend");
    let text = combined_output(&output);
    assert!(
        text.contains("Active slot:") || text.contains("No meals available"),
        "unexpected slot output:\n{text}"
    );
}

#[test]
fn test_slot_plain_output_is_one_token() {
    let home = tempfile::tempdir().unwrap();
    let output = mealgate_cmd(home.path())
        .args(["slot", "--output", "plain"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim().split_whitespace().count(), 1);
}

#[test]
fn test_config_path_and_init() {
    let home = tempfile::tempdir().unwrap();

    mealgate_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));

    mealgate_cmd(home.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote starter config"));

    // second init without --force refuses
    let output = mealgate_cmd(home.path())
        .args(["config", "init"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--force"));

    mealgate_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[windows.dinner]").or(predicate::str::contains("dinner")));
}

#[test]
fn test_login_without_token_prints_portal() {
    let home = tempfile::tempdir().unwrap();
    mealgate_cmd(home.path())
        .arg("login")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sign in at"));
}

// ── Auth gating ─────────────────────────────────────────────────────

#[test]
fn test_check_without_token_is_auth_error() {
    let home = tempfile::tempdir().unwrap();
    let output = mealgate_cmd(home.path())
        .args(["--endpoint", "https://api.invalid", "check", "some-attendee"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3), "expected auth exit code");
    assert!(combined_output(&output).contains("Sign in"));
}

#[test]
fn test_check_without_endpoint_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    let output = mealgate_cmd(home.path())
        .args(["check", "some-attendee"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "expected usage exit code");
    assert!(combined_output(&output).contains("endpoint"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    mealgate_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    let output = mealgate_cmd(home.path()).arg("foobar").output().unwrap();
    assert!(!output.status.success());
}
