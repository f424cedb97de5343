//! End-to-end tests for the `sync` command against real local git
//! repositories.
//!
//! Each test builds throwaway source repositories on disk, points the URL
//! template at them, and runs the actual binary, so clone, checkout, and
//! artifact writing are all exercised for real.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::path::Path;
use std::process::Command;

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args([
            "-c",
            "user.name=repobot-test",
            "-c",
            "user.email=repobot-test@example.org",
        ])
        .args(args)
        .status()
        .expect("git not runnable");
    assert!(status.success(), "git {:?} failed in {:?}", args, dir);
}

/// Create a source repository whose dependency table declares `deps`.
fn source_repo(sources: &Path, name: &str, deps: &[&str]) {
    let repo = sources.join(name);
    std::fs::create_dir_all(repo.join("ups")).unwrap();
    let mut table = String::from("# dependency table\n");
    for dep in deps {
        table.push_str(&format!("setupRequired({})\n", dep));
    }
    std::fs::write(repo.join("ups").join(format!("{}.table", name)), table).unwrap();
    git(&repo, &["init", "--quiet"]);
    git(&repo, &["add", "."]);
    git(&repo, &["commit", "--quiet", "-m", "initial"]);
}

/// A repo-set root whose URL template points at `sources`.
fn repo_set_root(sources: &Path, top: &str) -> assert_fs::TempDir {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("repobot.yaml")
        .write_str(&format!(
            "packages:\n  top: [{}]\nvcs:\n  git:\n    url: \"{}/{{pkg}}\"\nregistry:\n  command: \"true\"\n",
            top,
            sources.display()
        ))
        .unwrap();
    temp
}

#[test]
fn test_sync_clones_and_orders_the_closure() {
    let sources = assert_fs::TempDir::new().unwrap();
    source_repo(sources.path(), "utils", &[]);
    source_repo(sources.path(), "afw", &["utils"]);
    let temp = repo_set_root(sources.path(), "afw");

    let mut cmd = cargo_bin_cmd!("repobot");
    cmd.arg("sync")
        .arg("--path")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolved 2 packages"));

    // Both checkouts materialized, dependency first in the artifact
    temp.child("utils/ups/utils.table")
        .assert(predicate::path::exists());
    temp.child("afw/ups/afw.table")
        .assert(predicate::path::exists());
    let list = std::fs::read_to_string(temp.path().join("packages")).unwrap();
    let names: Vec<&str> = list
        .lines()
        .map(|l| l.split_whitespace().next().unwrap())
        .collect();
    assert_eq!(names, vec!["utils", "afw"]);

    // The metapackage table pins every managed package
    temp.child("ups/stack.table")
        .assert(predicate::str::contains("setupRequired(utils -j"))
        .assert(predicate::str::contains("setupRequired(afw -j"));
}

#[test]
fn test_sync_classifies_missing_source_as_external() {
    let sources = assert_fs::TempDir::new().unwrap();
    // afw depends on boost, which has no source repository
    source_repo(sources.path(), "afw", &["boost"]);
    let temp = repo_set_root(sources.path(), "afw");

    let mut cmd = cargo_bin_cmd!("repobot");
    cmd.arg("sync")
        .arg("--path")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 external"));

    temp.child("ups/stack.table")
        .assert(predicate::str::contains("setupRequired(boost)"));
    let list = std::fs::read_to_string(temp.path().join("packages")).unwrap();
    assert!(!list.contains("boost"));
}

#[test]
fn test_sync_twice_converges() {
    let sources = assert_fs::TempDir::new().unwrap();
    source_repo(sources.path(), "utils", &[]);
    let temp = repo_set_root(sources.path(), "utils");

    let mut cmd = cargo_bin_cmd!("repobot");
    cmd.arg("sync").arg("--path").arg(temp.path()).assert().success();
    let first = std::fs::read_to_string(temp.path().join("packages")).unwrap();

    let mut cmd = cargo_bin_cmd!("repobot");
    cmd.arg("sync").arg("--path").arg(temp.path()).assert().success();
    let second = std::fs::read_to_string(temp.path().join("packages")).unwrap();

    assert_eq!(first, second);
}
