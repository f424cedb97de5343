//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `repobot` application. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes,
//! providing clear and descriptive error messages.
//!
//! The variants fall into a small taxonomy:
//!
//! - **Configuration errors** (fatal, no retry): a malformed or missing
//!   config file, an explicit ref override that fails to check out, an
//!   inheritance base that has not itself been resolved, or an unreadable
//!   dependency table for a package that is locally present.
//! - **Per-command failures**: a VCS, build-tool, or registry subprocess
//!   exiting non-zero. During discovery a failed clone is recovered locally
//!   by reclassifying the package as external; everywhere else these are
//!   fatal unless an explicit ignore-failures mode is requested.
//! - **Circular dependency**: fatal, reported with the full set of packages
//!   that could not be ordered.
//!
//! The `Result` type alias is used to return `Result<T, Error>` from
//! functions, making it easy to handle errors and propagate them up the
//! call stack.

use thiserror::Error;

/// Main error type for repobot operations
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration file could not be found, parsed, or was internally
    /// inconsistent.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A version-control subprocess exited non-zero or could not be spawned.
    #[error("{command} failed in '{path}': {stderr}")]
    VcsCommand {
        command: String,
        path: String,
        stderr: String,
    },

    /// An explicit ref override failed to check out.
    ///
    /// This is a configuration error, not a transient condition: the
    /// defaults list is never consulted for a package with an override.
    #[error("Explicit ref '{r#ref}' for package '{package}' could not be checked out: {message}")]
    OverrideCheckout {
        package: String,
        r#ref: String,
        message: String,
    },

    /// Every entry of the default ref fallback list failed to check out.
    #[error("Could not checkout any of ({attempted}) for package '{package}'")]
    RefFallbackExhausted { package: String, attempted: String },

    /// The managed dependency graph contains a cycle and cannot be ordered.
    #[error("Circular dependency detected among: {remaining}")]
    CircularDependency { remaining: String },

    /// The dependency table of a locally present package could not be read.
    #[error("Could not read dependency table for package '{package}': {message}")]
    DependencyTable { package: String, message: String },

    /// Inheritance was configured but the base repo set has no packages
    /// artifact, i.e. it has not been resolved yet.
    #[error("Inheritance base at '{path}' is not resolved: {message}")]
    BaseNotResolved { path: String, message: String },

    /// A post-sync operation was requested but no packages artifact exists.
    #[error("packages file not found in '{path}' - repo set is not synced or path not given")]
    NotSynced { path: String },

    /// A line of the packages artifact did not match `<name> <ref>` or
    /// `<name> [<ref>]`.
    #[error("Malformed packages file line: '{line}'")]
    ListParse { line: String },

    /// A package-registry subprocess failed.
    #[error("Registry command failed: {command} - {stderr}")]
    RegistryCommand { command: String, stderr: String },

    /// A build-tool subprocess failed.
    #[error("Build command failed in '{path}': {command} - {stderr}")]
    BuildCommand {
        command: String,
        path: String,
        stderr: String,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
