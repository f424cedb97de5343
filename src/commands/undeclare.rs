//! # Undeclare Command Implementation
//!
//! Removes every resolved, non-inherited package from the registry.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the undeclare command
#[derive(Args, Debug)]
pub struct UndeclareArgs {
    /// Path to the repo-set root (discovered from the working directory
    /// if omitted)
    #[arg(short, long, value_name = "PATH", env = "REPOBOT_PATH")]
    pub path: Option<PathBuf>,
}

/// Execute the `undeclare` command.
pub fn execute(args: UndeclareArgs) -> Result<()> {
    let set = super::load_resolved_repo_set(args.path.as_deref())?;
    set.undeclare()?;
    Ok(())
}
