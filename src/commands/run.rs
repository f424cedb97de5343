//! # Run Command Implementation
//!
//! Runs the same VCS command in every managed checkout, substituting
//! `{pkg}` in the arguments with the package name. Useful for bulk
//! operations like adding remotes or checking status.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the repo-set root (discovered from the working directory
    /// if omitted)
    #[arg(short, long, value_name = "PATH", env = "REPOBOT_PATH")]
    pub path: Option<PathBuf>,

    /// Keep processing remaining packages after a failure
    #[arg(long)]
    pub ignore_failed: bool,

    /// VCS command arguments; `{pkg}` expands to the package name
    #[arg(
        value_name = "ARG",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

/// Execute the `run` command.
pub fn execute(args: RunArgs) -> Result<()> {
    let set = super::load_resolved_repo_set(args.path.as_deref())?;
    set.run_each(&args.args, args.ignore_failed)?;
    Ok(())
}
