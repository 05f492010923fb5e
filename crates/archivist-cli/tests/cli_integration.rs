//! End-to-end tests for the `archivist` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn write_aged(dir: &Path, name: &str, age: Duration) {
    let path = dir.join(name);
    fs::write(&path, name).unwrap();
    let file = File::options().write(true).open(&path).unwrap();
    file.set_modified(SystemTime::now() - age).unwrap();
}

/// Binary pointed at a private config file
fn archivist(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("archivist").unwrap();
    cmd.env("ARCHIVIST_CONFIG", config_dir.path().join("config.toml"))
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn test_run_archives_old_files() {
    let config = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_aged(root.path(), "old.txt", Duration::from_secs(40 * 86_400));
    write_aged(root.path(), "new.txt", Duration::ZERO);

    archivist(&config)
        .arg("run")
        .arg(root.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 files archived"));

    assert!(root.path().join("Archive/old.txt").exists());
    assert!(root.path().join("new.txt").exists());
}

#[test]
fn test_run_with_custom_threshold_json() {
    let config = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_aged(root.path(), "hour-old.txt", Duration::from_secs(2 * 3600));

    let output = archivist(&config)
        .args(["run", "--older-than-minutes", "60", "--format", "json"])
        .arg(root.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["moved"][0]["source"], "hour-old.txt");
    assert_eq!(value["dry_run"], false);
}

#[test]
fn test_dry_run_moves_nothing() {
    let config = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_aged(root.path(), "old.txt", Duration::from_secs(40 * 86_400));

    archivist(&config)
        .args(["run", "--dry-run", "--format", "quiet"])
        .arg(root.path())
        .assert()
        .success()
        .stdout("old.txt\n");

    assert!(root.path().join("old.txt").exists());
    assert!(!root.path().join("Archive").exists());
}

#[test]
fn test_run_without_root_fails() {
    let config = TempDir::new().unwrap();

    archivist(&config)
        .arg("run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: Invalid input"));
}

#[test]
fn test_run_missing_folder_fails() {
    let config = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();

    archivist(&config)
        .arg("run")
        .arg(root.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Root directory unavailable"));
}

#[test]
fn test_set_root_is_remembered() {
    let config = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    write_aged(root.path(), "old.txt", Duration::from_secs(40 * 86_400));

    archivist(&config)
        .args(["config", "set-root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Root set to"));

    archivist(&config).arg("run").assert().success();
    assert!(root.path().join("Archive/old.txt").exists());
}

#[test]
fn test_config_init_and_show() {
    let config = TempDir::new().unwrap();

    archivist(&config).args(["config", "init"]).assert().success();
    assert!(config.path().join("config.toml").exists());

    archivist(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    archivist(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("age_threshold_minutes = 43200"));
}

#[test]
fn test_config_path() {
    let config = TempDir::new().unwrap();
    let expected = config.path().join("config.toml");

    archivist(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(format!("{}\n", expected.display()));
}

#[test]
fn test_init_force_repairs_broken_config() {
    let config = TempDir::new().unwrap();
    let path = config.path().join("config.toml");
    fs::write(&path, "[archive\nbroken").unwrap();

    archivist(&config)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TOML parsing error"));

    archivist(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(format!("{}\n", path.display()));

    archivist(&config)
        .args(["config", "init", "--force"])
        .assert()
        .success();

    archivist(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("archive_dir_name = \"Archive\""));
}
