//! # Pull Command Implementation
//!
//! Pulls the latest changes into every managed checkout. Untracked working
//! copies and inherited links are left alone.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the pull command
#[derive(Args, Debug)]
pub struct PullArgs {
    /// Path to the repo-set root (discovered from the working directory
    /// if omitted)
    #[arg(short, long, value_name = "PATH", env = "REPOBOT_PATH")]
    pub path: Option<PathBuf>,
}

/// Execute the `pull` command.
pub fn execute(args: PullArgs) -> Result<()> {
    let set = super::load_resolved_repo_set(args.path.as_deref())?;
    set.pull()?;
    Ok(())
}
