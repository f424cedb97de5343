//! # Sync Command Implementation
//!
//! The sync command runs the full resolution pipeline:
//! 1. Discovery of the transitive dependency closure from the top packages
//! 2. Source acquisition (clone, inheritance link, or existing checkout)
//! 3. Ref resolution and checkout
//! 4. Inheritance confirmation against the base set
//! 5. Topological ordering
//! 6. Declaration and artifact writing

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use repobot::repo_set::SyncOptions;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Path to the repo-set root (discovered from the working directory
    /// if omitted)
    #[arg(short, long, value_name = "PATH", env = "REPOBOT_PATH")]
    pub path: Option<PathBuf>,

    /// Fetch new refs into already-present checkouts before checking out
    #[arg(long)]
    pub fetch: bool,

    /// Skip declaring packages to the registry
    #[arg(long)]
    pub no_declare: bool,

    /// Skip writing the metapackage dependency table
    #[arg(long)]
    pub no_table: bool,

    /// Skip writing the packages list
    #[arg(long)]
    pub no_list: bool,

    /// Pull the latest changes into every checkout after resolution
    #[arg(long)]
    pub pull: bool,
}

/// Execute the `sync` command.
pub fn execute(args: SyncArgs) -> Result<()> {
    let mut set = super::load_repo_set(args.path.as_deref())?;
    let options = SyncOptions {
        fetch: args.fetch,
        declare: !args.no_declare,
        write_table: !args.no_table,
        write_list: !args.no_list,
        pull: args.pull,
    };
    set.sync(&options)?;

    println!(
        "Resolved {} packages ({} inherited, {} external).",
        set.packages().len(),
        set.inherited().len(),
        set.external().len()
    );
    Ok(())
}
