//! Integration tests for the `forge-state` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Command with an empty config so the user's files are never read.
fn forge_state(config_dir: &TempDir) -> Command {
    let config = config_dir.path().join("config.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }
    let mut cmd = Command::cargo_bin("forge-state").unwrap();
    cmd.arg("--config").arg(config).env_remove("RUST_LOG");
    cmd
}

#[test]
fn unsupported_remote_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    forge_state(&dir)
        .args(["--url", "https://bitbucket.org/acme/widget.git"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No forge integration"));
}

#[test]
fn missing_token_fails() {
    let dir = TempDir::new().unwrap();
    forge_state(&dir)
        .args(["--url", "git@gitlab.com:acme/widget.git"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("authentication required"));
}

#[test]
fn invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.toml"), "[query]\ncommits = 0\n").unwrap();
    forge_state(&dir)
        .args(["--url", "git@gitlab.com:acme/widget.git"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("query.commits"));
}

#[test]
fn reads_remote_from_repository() {
    let dir = TempDir::new().unwrap();
    let repo_dir = TempDir::new().unwrap();
    let repo = git2::Repository::init(repo_dir.path()).unwrap();
    repo.remote("origin", "https://bitbucket.org/acme/widget.git")
        .unwrap();

    forge_state(&dir)
        .arg("--cwd")
        .arg(repo_dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("bitbucket.org/acme/widget.git"));
}

#[test]
fn unknown_remote_name_fails() {
    let dir = TempDir::new().unwrap();
    let repo_dir = TempDir::new().unwrap();
    git2::Repository::init(repo_dir.path()).unwrap();

    forge_state(&dir)
        .arg("--cwd")
        .arg(repo_dir.path())
        .args(["--remote", "upstream"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no remote named 'upstream'"));
}

#[test]
fn url_and_remote_conflict() {
    let dir = TempDir::new().unwrap();
    forge_state(&dir)
        .args(["--url", "git@gitlab.com:a/b.git", "--remote", "origin"])
        .assert()
        .failure();
}
