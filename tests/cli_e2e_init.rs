//! End-to-end tests for the `init` command.
//!
//! These tests invoke the actual CLI binary and validate the behavior of
//! the `init` subcommand from a user's perspective.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

#[test]
fn test_init_creates_starter_config() {
    let temp = assert_fs::TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("repobot");
    cmd.current_dir(temp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"))
        .stdout(predicate::str::contains("repobot sync"));

    let config_file = temp.child("repobot.yaml");
    config_file.assert(predicate::path::exists());
    config_file.assert(predicate::str::contains("packages:"));
    config_file.assert(predicate::str::contains("top: []"));
    config_file.assert(predicate::str::contains("default: [main, master]"));
}

#[test]
fn test_init_with_explicit_path_creates_directory() {
    let temp = assert_fs::TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("repobot");
    cmd.current_dir(temp.path())
        .arg("init")
        .arg("stack")
        .assert()
        .success();

    temp.child("stack/repobot.yaml")
        .assert(predicate::path::exists());
}

#[test]
fn test_init_refuses_to_overwrite_without_force() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config_file = temp.child("repobot.yaml");
    config_file.write_str("existing content").unwrap();

    // Without --force the existing file must be left untouched
    let mut cmd = cargo_bin_cmd!("repobot");
    cmd.current_dir(temp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "already exists. Use --force to overwrite",
        ));
    config_file.assert("existing content");

    // With --force it is replaced
    let mut cmd = cargo_bin_cmd!("repobot");
    cmd.current_dir(temp.path())
        .arg("init")
        .arg("--force")
        .assert()
        .success();
    config_file.assert(predicate::str::contains("packages:"));
}
