//! Integration tests for the CLI surface.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_public_commands() {
    Command::cargo_bin("packup")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("self-update"))
        .stdout(predicate::str::contains("--force"));
}

#[test]
fn helper_signal_is_hidden_from_help() {
    Command::cargo_bin("packup")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("finish-self-update").not());
}

#[test]
fn version_flag_reports_the_crate_version() {
    Command::cargo_bin("packup")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_subcommands_are_rejected() {
    Command::cargo_bin("packup")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn conflicting_verbosity_flags_are_rejected() {
    Command::cargo_bin("packup")
        .unwrap()
        .args(["--verbose", "--quiet", "install"])
        .assert()
        .failure();
}
