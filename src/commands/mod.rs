//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `repobot` command-line tool. Each subcommand is defined in its own file
//! to keep the logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and
//!   options, derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic.
//!
//! The `execute` function is the main entry point for the command and is
//! responsible for orchestrating the necessary operations, calling into the
//! `repobot` library to perform the core logic.

pub mod build;
pub mod declare;
pub mod init;
pub mod list;
pub mod pull;
pub mod run;
pub mod sync;
pub mod undeclare;

use std::path::Path;

use anyhow::Result;

use repobot::config::Config;
use repobot::repo_set::RepoSet;

/// Load the repo set rooted at `path`, or discover the root by walking up
/// from the working directory when no path is given.
pub(crate) fn load_repo_set(path: Option<&Path>) -> Result<RepoSet> {
    let config = Config::load(path)?;
    Ok(RepoSet::new(config))
}

/// Load the repo set and read its packages artifact back, for commands
/// that operate on an existing resolution.
pub(crate) fn load_resolved_repo_set(path: Option<&Path>) -> Result<RepoSet> {
    let mut set = load_repo_set(path)?;
    set.read_list()?;
    Ok(set)
}
