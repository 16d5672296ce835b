//! Argument handling and exit codes of the clubhouse binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn clubhouse() -> Command {
    let mut cmd = Command::cargo_bin("clubhouse").unwrap();
    cmd.env_remove("CLUBHOUSE_CONFIG")
        .env_remove("CLUBHOUSE_CMS_URL")
        .env_remove("CLUBHOUSE_TOURNAMENT_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_help_lists_commands() {
    clubhouse()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("news-one"))
        .stdout(predicate::str::contains("standings"))
        .stdout(predicate::str::contains("--locale"));
}

#[test]
fn test_version() {
    clubhouse()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_invalid_month_rejected() {
    clubhouse()
        .args(["events", "--month", "2024-13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected YYYY-MM"));
}

#[test]
fn test_unknown_format_rejected() {
    clubhouse()
        .args(["news", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("yaml"));
}

#[test]
fn test_missing_config_file() {
    clubhouse()
        .args(["--config", "/definitely/not/here/clubhouse.toml", "news"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_upcoming_needs_a_season() {
    let config = config_file("[tournament]\nurl = \"http://127.0.0.1:9\"\n");

    clubhouse()
        .arg("--config")
        .arg(config.path())
        .arg("upcoming")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("tournament.season_id"));
}

#[test]
fn test_unreachable_backend() {
    let config = config_file("[general]\ntimeout_secs = 2\n\n[cms]\nurl = \"http://127.0.0.1:9\"\n");

    clubhouse()
        .arg("--config")
        .arg(config.path())
        .args(["news", "--format", "json"])
        .assert()
        .code(4)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error:"));
}
