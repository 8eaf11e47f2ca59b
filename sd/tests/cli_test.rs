//! CLI smoke tests for the sd binary

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("sd")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("project"))
        .stdout(predicate::str::contains("doc"))
        .stdout(predicate::str::contains("write"))
        .stdout(predicate::str::contains("backup"));
}

#[test]
fn test_write_help_shows_generation_modes() {
    Command::cargo_bin("sd")
        .unwrap()
        .args(["write", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("continue"))
        .stdout(predicate::str::contains("improve"))
        .stdout(predicate::str::contains("brainstorm"));
}

#[test]
fn test_unknown_command_fails() {
    Command::cargo_bin("sd")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .failure();
}
