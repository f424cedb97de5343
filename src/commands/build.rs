//! # Build Command Implementation
//!
//! Runs the configured build command in each resolved package directory,
//! in dependency order. The packages must already be synced and set up.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the repo-set root (discovered from the working directory
    /// if omitted)
    #[arg(short, long, value_name = "PATH", env = "REPOBOT_PATH")]
    pub path: Option<PathBuf>,

    /// Skip packages inherited from the base set
    #[arg(long)]
    pub skip_inherited: bool,

    /// Keep building remaining packages after a failure
    #[arg(long)]
    pub ignore_failed: bool,

    /// Extra arguments passed through to the build command
    #[arg(value_name = "ARG", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Execute the `build` command.
pub fn execute(args: BuildArgs) -> Result<()> {
    let set = super::load_resolved_repo_set(args.path.as_deref())?;
    set.build(&args.args, args.skip_inherited, args.ignore_failed)?;
    Ok(())
}
