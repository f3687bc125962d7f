//! Integration tests for the updater helper's completion signal.
//!
//! These drive the real binary the way the staged helper is launched
//! during a self-update: `packup finish-self-update --target <path>`.

use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

fn packup_bytes() -> Vec<u8> {
    fs::read(assert_cmd::cargo::cargo_bin("packup")).expect("packup binary must exist")
}

#[test]
fn completion_signal_overwrites_the_target() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("packup-installed");
    fs::write(&target, b"stale installer").unwrap();

    Command::cargo_bin("packup")
        .unwrap()
        .arg("finish-self-update")
        .arg("--target")
        .arg(&target)
        .assert()
        .success();

    assert_eq!(fs::read(&target).unwrap(), packup_bytes());
}

#[test]
fn completion_signal_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("packup-installed");

    for _ in 0..2 {
        Command::cargo_bin("packup")
            .unwrap()
            .arg("finish-self-update")
            .arg("--target")
            .arg(&target)
            .assert()
            .success();
    }

    assert_eq!(fs::read(&target).unwrap(), packup_bytes());
}

#[test]
fn completion_signal_creates_a_missing_target() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("fresh-install");

    Command::cargo_bin("packup")
        .unwrap()
        .arg("finish-self-update")
        .arg("--target")
        .arg(&target)
        .assert()
        .success();

    assert!(target.exists());
}

#[test]
fn completion_signal_requires_a_target() {
    Command::cargo_bin("packup")
        .unwrap()
        .arg("finish-self-update")
        .assert()
        .failure();
}
