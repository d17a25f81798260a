//! Integration tests for the settle binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_config(temp: &TempDir, connectivity_url: &str) -> PathBuf {
    let path = temp.path().join("config.yml");
    let config = format!(
        "log_dir: {}\nconnectivity:\n  url: {}\n  timeout_secs: 2\n",
        temp.path().join("logs").display(),
        connectivity_url
    );
    fs::write(&path, config).unwrap();
    path
}

fn log_files(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.extension().is_some_and(|ext| ext == "log"))
                .collect()
        })
        .unwrap_or_default()
}

fn settle() -> Command {
    let mut cmd = Command::new(cargo_bin("settle"));
    cmd.env_remove("SETTLE_CONFIG").env("NO_COLOR", "1");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    settle()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("post-install provisioning"))
        .stdout(predicate::str::contains("--dry-run"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    settle()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_rejects_unknown_arguments() -> Result<(), Box<dyn std::error::Error>> {
    settle().arg("--frobnicate").assert().failure();
    Ok(())
}

#[test]
fn missing_config_exits_with_two() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    settle()
        .arg("--config")
        .arg(temp.path().join("missing.yml"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration not found"));
    Ok(())
}

#[test]
fn invalid_config_exits_with_two() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let path = temp.path().join("config.yml");
    fs::write(&path, "hostname: \"not a hostname\"\n")?;

    settle()
        .arg("--config")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("hostname"));
    Ok(())
}

#[test]
fn config_path_can_come_from_environment() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    settle()
        .env("SETTLE_CONFIG", temp.path().join("missing.yml"))
        .assert()
        .code(2);
    Ok(())
}

#[test]
fn unreachable_network_aborts_and_keeps_the_log() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    // nothing listens on the discard port
    let config = write_config(&temp, "http://127.0.0.1:9/");

    settle()
        .arg("--config")
        .arg(&config)
        .write_stdin("y\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Session aborted"));

    let logs = log_files(&temp.path().join("logs"));
    assert_eq!(logs.len(), 1);
    let log = fs::read_to_string(&logs[0])?;
    assert!(log.contains("ERROR: Session aborted: No network connectivity"));
    Ok(())
}

#[test]
fn declining_prerequisites_exits_cleanly() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let probe = server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200).body("ok");
    });

    let temp = TempDir::new()?;
    let config = write_config(&temp, &server.url("/"));

    settle()
        .arg("--config")
        .arg(&config)
        .write_stdin("maybe\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Continue with provisioning? [y/n]"))
        .stdout(predicate::str::contains("Provisioning cancelled"));

    probe.assert();
    let logs = log_files(&temp.path().join("logs"));
    assert_eq!(logs.len(), 1);
    let log = fs::read_to_string(&logs[0])?;
    assert!(log.contains("WARNING: Invalid input 'maybe': please answer y or n"));
    assert!(log.contains("PROMPT: Continue with provisioning? -> no"));
    Ok(())
}

#[test]
fn closed_stdin_aborts() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(204);
    });

    let temp = TempDir::new()?;
    let config = write_config(&temp, &server.url("/"));

    settle()
        .arg("--config")
        .arg(&config)
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Input closed"));
    Ok(())
}

#[test]
fn server_error_counts_as_unreachable() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(503);
    });

    let temp = TempDir::new()?;
    let config = write_config(&temp, &server.url("/"));

    settle()
        .arg("--config")
        .arg(&config)
        .write_stdin("y\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("HTTP 503"));
    Ok(())
}
