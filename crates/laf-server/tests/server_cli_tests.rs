//! Integration tests for the laf-server binary
//!
//! Each test runs the binary with a cleared environment inside its own
//! temporary directory so no stray `.env` or `LAF_*` variable leaks in.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn laf_server(cwd: &Path, vars: &[(&str, String)], args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_laf-server"))
        .env_clear()
        .env("LAF_LOG_PROFILE", "test")
        .envs(vars.iter().map(|(k, v)| (*k, v.as_str())))
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("failed to run laf-server")
}

fn on_disk_vars(data_dir: &Path) -> Vec<(&'static str, String)> {
    let uri = data_dir.to_string_lossy().into_owned();
    vec![
        ("LAF_SYS_DB__URI", uri.clone()),
        ("LAF_SYS_DB__POOL_SIZE", "2".to_string()),
        ("LAF_APP_DB__URI", uri),
        ("LAF_APP_DB__POOL_SIZE", "3".to_string()),
    ]
}

#[test]
fn test_check_reports_both_stores() {
    let dir = TempDir::new().unwrap();

    let output = laf_server(dir.path(), &on_disk_vars(dir.path()), &["check"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sys store 'sys' reachable (2 connections)"));
    assert!(stdout.contains("app store 'app' reachable (3 connections)"));
    assert!(dir.path().join("sys.db").exists());
    assert!(dir.path().join("app.db").exists());
}

#[test]
fn test_check_with_in_memory_defaults() {
    let dir = TempDir::new().unwrap();

    let output = laf_server(dir.path(), &[], &["check"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("(10 connections)"));
}

#[test]
fn test_check_fails_when_store_unreachable() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing").to_string_lossy().into_owned();

    let output = laf_server(
        dir.path(),
        &[("LAF_APP_DB__URI", missing)],
        &["check"],
    );
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: [ERR_CONNECTION]"), "stderr: {}", stderr);
    assert!(stderr.contains("(entity_id: app)"));
    assert!(String::from_utf8_lossy(&output.stdout).is_empty());
}

#[test]
fn test_check_rejects_zero_pool_size() {
    let dir = TempDir::new().unwrap();

    let output = laf_server(
        dir.path(),
        &[("LAF_SYS_DB__POOL_SIZE", "0".to_string())],
        &["check"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("[ERR_INVALID_CONFIG]"));
}

#[test]
fn test_check_reads_env_file() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();

    let env_file = dir.path().join("laf.env");
    std::fs::write(
        &env_file,
        format!(
            "LAF_SYS_DB__DATABASE=platform\nLAF_SYS_DB__URI={}\nLAF_SYS_DB__POOL_SIZE=1\n",
            data_dir.display()
        ),
    )
    .unwrap();

    let output = laf_server(
        dir.path(),
        &[],
        &["check", "--env-file", env_file.to_str().unwrap()],
    );
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("sys store 'platform' reachable (1 connections)"));
    assert!(data_dir.join("platform.db").exists());
}

#[test]
fn test_missing_env_file_is_an_error() {
    let dir = TempDir::new().unwrap();

    let output = laf_server(dir.path(), &[], &["settings", "--env-file", "nope.env"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error:"));
}

#[test]
fn test_settings_redacts_connection_uri() {
    let dir = TempDir::new().unwrap();

    let output = laf_server(
        dir.path(),
        &[("LAF_APP_DB__URI", "file:/srv/app.db?key=hunter2".to_string())],
        &["settings"],
    );
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("***REDACTED***"));
    assert!(!stdout.contains("hunter2"));
    assert!(stdout.contains("database: \"app\""));
}

#[test]
fn test_unknown_log_profile_rejected_by_cli() {
    let dir = TempDir::new().unwrap();

    let output = laf_server(dir.path(), &[], &["check", "--log-profile", "verbose"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown log profile: verbose"));
}
