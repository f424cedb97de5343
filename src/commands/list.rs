//! # List Command Implementation
//!
//! Prints the resolved package list from the packages artifact, one
//! `<name> <ref>` line per package in dependency order, with inherited
//! packages marked by brackets around the ref.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Path to the repo-set root (discovered from the working directory
    /// if omitted)
    #[arg(short, long, value_name = "PATH", env = "REPOBOT_PATH")]
    pub path: Option<PathBuf>,

    /// Print package names only
    #[arg(short, long)]
    pub names: bool,
}

/// Execute the `list` command.
pub fn execute(args: ListArgs) -> Result<()> {
    let set = super::load_resolved_repo_set(args.path.as_deref())?;
    for pkg in set.packages() {
        if args.names {
            println!("{}", pkg);
            continue;
        }
        let r#ref = &set.refs()[pkg];
        if set.inherited().contains(pkg) {
            println!("{} [{}]", pkg, r#ref);
        } else {
            println!("{} {}", pkg, r#ref);
        }
    }
    Ok(())
}
