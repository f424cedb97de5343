//! # Init Command Implementation
//!
//! This module implements the `init` subcommand, which creates a new
//! `repobot.yaml` configuration file with commented example settings.

use anyhow::Result;
use clap::Args;
use std::fs;
use std::path::PathBuf;

use repobot::config::CONFIG_FILE;

/// Initialize a new repobot.yaml configuration file
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the current directory)
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing configuration file
    #[arg(short, long)]
    pub force: bool,
}

/// Execute the `init` command.
pub fn execute(args: InitArgs) -> Result<()> {
    let config_path = args.path.join(CONFIG_FILE);
    if config_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "'{}' already exists. Use --force to overwrite.",
            config_path.display()
        ));
    }

    fs::create_dir_all(&args.path)?;
    fs::write(&config_path, starter_config())?;

    println!("Created {}", config_path.display());
    println!("Edit packages.top, then run `repobot sync`.");
    Ok(())
}

/// Generate a starter configuration with examples and comments.
fn starter_config() -> String {
    r#"# repobot configuration
# This file marks the root of a repo set and defines which packages to
# resolve, where their sources live, and how they are declared and built.

packages:
  # Top-level packages; their transitive dependencies are discovered
  # automatically from the dependency tables in each checkout.
  top: []

  refs:
    # Per-package ref overrides. A string pins the package to that ref
    # with no fallback; an explicit null marks a manually managed
    # working copy that repobot never touches.
    overrides: {}
    # Ordered fallback list tried for packages without an override.
    default: [main, master]

  # Dependency names dropped before traversal.
  ignore: []

  # Packages assumed already satisfied by the environment.
  external: []

# Borrow already-resolved packages from a base repo set:
# inherit:
#   base: ../base-stack
#   refs: [main]

vcs:
  git:
    # URL template; {pkg} is replaced by the package name.
    url: ""
    url_overrides: {}

# registry:
#   command: eups
#   meta: stack
#   tags: [current]
#   version: "{ref}"

# build:
#   command: scons
"#
    .to_string()
}
