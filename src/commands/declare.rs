//! # Declare Command Implementation
//!
//! Declares every resolved package to the registry in dependency order and
//! assigns the configured tags. Inherited packages were declared by the
//! base set and only get tags.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the declare command
#[derive(Args, Debug)]
pub struct DeclareArgs {
    /// Path to the repo-set root (discovered from the working directory
    /// if omitted)
    #[arg(short, long, value_name = "PATH", env = "REPOBOT_PATH")]
    pub path: Option<PathBuf>,
}

/// Execute the `declare` command.
pub fn execute(args: DeclareArgs) -> Result<()> {
    let set = super::load_resolved_repo_set(args.path.as_deref())?;
    set.declare()?;
    Ok(())
}
