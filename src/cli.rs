//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Repobot - resolve, order, and manage a set of version-controlled packages
#[derive(Parser, Debug)]
#[command(name = "repobot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "info",
        env = "REPOBOT_LOG"
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new repobot.yaml configuration
    Init(commands::init::InitArgs),
    /// Clone, checkout, and order the configured packages
    Sync(commands::sync::SyncArgs),
    /// Print the resolved package list
    List(commands::list::ListArgs),
    /// Build every resolved package in dependency order
    Build(commands::build::BuildArgs),
    /// Pull the latest changes into every managed checkout
    Pull(commands::pull::PullArgs),
    /// Declare the resolved packages to the registry
    Declare(commands::declare::DeclareArgs),
    /// Undeclare the resolved packages from the registry
    Undeclare(commands::undeclare::UndeclareArgs),
    /// Run a VCS command in every managed checkout
    Run(commands::run::RunArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .format_timestamp(None)
            .init();

        match self.command {
            Commands::Init(args) => commands::init::execute(args),
            Commands::Sync(args) => commands::sync::execute(args),
            Commands::List(args) => commands::list::execute(args),
            Commands::Build(args) => commands::build::execute(args),
            Commands::Pull(args) => commands::pull::execute(args),
            Commands::Declare(args) => commands::declare::execute(args),
            Commands::Undeclare(args) => commands::undeclare::execute(args),
            Commands::Run(args) => commands::run::execute(args),
        }
    }
}
