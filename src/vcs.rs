//! # VCS Adapter
//!
//! A uniform, blocking interface to the version-control operations the
//! resolver needs: clone, fetch, checkout, and running an arbitrary command
//! in a checkout. Two backends exist - `GitVcs` (primary) and `HgVcs`
//! (legacy) - both shelling out to the system command, which automatically
//! handles SSH keys, credential helpers, and anything else configured in the
//! user's environment.
//!
//! Every operation either fully completes or is reported as a single
//! `Error::VcsCommand` carrying the command line, the directory, and the
//! captured stderr; there are no partial-success semantics. Callers treat a
//! failed checkout as retryable-by-fallback and a failed clone as "source
//! unavailable" - the adapter itself makes no such distinction.
//!
//! The `Vcs` trait allows the backends to be swapped for mocks in tests,
//! the same way the registry and build-tool collaborators are mocked.

use std::path::Path;
use std::process::Command;

use log::info;

use crate::error::{Error, Result};

/// Which backend manages a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VcsKind {
    /// Primary backend.
    Git,
    /// Legacy backend.
    Hg,
}

/// Trait for version-control operations - allows mocking in tests.
pub trait Vcs: Send + Sync {
    /// Clone a repository into `target_dir` (which must not exist yet).
    fn clone_repo(&self, url: &str, target_dir: &Path) -> Result<()>;

    /// Fetch new refs into an existing checkout without merging.
    fn fetch(&self, repo_dir: &Path) -> Result<()>;

    /// Check out a named ref in an existing checkout.
    fn checkout(&self, repo_dir: &Path, ref_name: &str) -> Result<()>;

    /// Run an arbitrary backend command in an existing checkout.
    fn run(&self, repo_dir: &Path, args: &[&str]) -> Result<()>;
}

/// Run a VCS subprocess in `dir`, mapping any failure to `Error::VcsCommand`.
pub(crate) fn run_command(program: &str, dir: &Path, args: &[&str]) -> Result<()> {
    let command = format!("{} {}", program, args.join(" "));
    info!("In {}, running '{}'.", dir.display(), command);
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|err| Error::VcsCommand {
            command: command.clone(),
            path: dir.display().to_string(),
            stderr: err.to_string(),
        })?;
    if !output.status.success() {
        return Err(Error::VcsCommand {
            command,
            path: dir.display().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

/// Clone into an explicit target by running the backend in its parent.
fn clone_into(program: &str, url: &str, target_dir: &Path) -> Result<()> {
    let parent = target_dir.parent().unwrap_or_else(|| Path::new("."));
    let name = target_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string());
    run_command(program, parent, &["clone", url, &name])
}

/// Satisfy a package directory with a filesystem link to an existing
/// checkout instead of cloning. Counts as a successful clone outcome.
pub fn link(source_dir: &Path, target_dir: &Path) -> Result<()> {
    info!(
        "Linking {} -> {}.",
        target_dir.display(),
        source_dir.display()
    );
    #[cfg(unix)]
    std::os::unix::fs::symlink(source_dir, target_dir)?;
    #[cfg(windows)]
    std::os::windows::fs::symlink_dir(source_dir, target_dir)?;
    Ok(())
}

/// The primary backend, wrapping the system `git` command.
pub struct GitVcs;

impl Vcs for GitVcs {
    fn clone_repo(&self, url: &str, target_dir: &Path) -> Result<()> {
        clone_into("git", url, target_dir)
    }

    fn fetch(&self, repo_dir: &Path) -> Result<()> {
        run_command("git", repo_dir, &["fetch"])
    }

    fn checkout(&self, repo_dir: &Path, ref_name: &str) -> Result<()> {
        run_command("git", repo_dir, &["checkout", ref_name])
    }

    fn run(&self, repo_dir: &Path, args: &[&str]) -> Result<()> {
        run_command("git", repo_dir, args)
    }
}

/// The legacy backend, wrapping the system `hg` command.
pub struct HgVcs;

impl Vcs for HgVcs {
    fn clone_repo(&self, url: &str, target_dir: &Path) -> Result<()> {
        clone_into("hg", url, target_dir)
    }

    fn fetch(&self, repo_dir: &Path) -> Result<()> {
        run_command("hg", repo_dir, &["pull"])
    }

    fn checkout(&self, repo_dir: &Path, ref_name: &str) -> Result<()> {
        run_command("hg", repo_dir, &["update", ref_name])
    }

    fn run(&self, repo_dir: &Path, args: &[&str]) -> Result<()> {
        run_command("hg", repo_dir, args)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_command_success() {
        let temp = TempDir::new().unwrap();
        run_command("true", temp.path(), &[]).unwrap();
    }

    #[test]
    fn test_run_command_nonzero_exit() {
        let temp = TempDir::new().unwrap();
        let err = run_command("false", temp.path(), &[]).unwrap_err();
        match err {
            Error::VcsCommand { command, path, .. } => {
                assert!(command.starts_with("false"));
                assert!(path.contains(temp.path().to_str().unwrap()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_run_command_missing_program() {
        let temp = TempDir::new().unwrap();
        let err = run_command("repobot-no-such-program", temp.path(), &[]).unwrap_err();
        assert!(matches!(err, Error::VcsCommand { .. }));
    }

    #[test]
    fn test_link_creates_symlink() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("base").join("afw");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::write(source.join("marker"), "x").unwrap();
        let target = temp.path().join("afw");

        link(&source, &target).unwrap();

        assert!(target.symlink_metadata().unwrap().file_type().is_symlink());
        assert!(target.join("marker").exists());
    }

    #[test]
    fn test_link_into_existing_target_fails() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("base");
        std::fs::create_dir_all(&source).unwrap();
        let target = temp.path().join("afw");
        std::fs::create_dir_all(&target).unwrap();

        assert!(link(&source, &target).is_err());
    }
}
