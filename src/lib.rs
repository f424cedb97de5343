//! # Repobot Library
//!
//! This library provides the core functionality for resolving and managing
//! a *repo set*: a collection of version-controlled software packages that
//! is cloned, checked out, ordered, and registered as one coherent stack.
//! It is designed to be used by the `repobot` command-line tool but can
//! also be embedded in other applications that need dependency-closure
//! resolution over many repositories.
//!
//! ## Quick Example
//!
//! ```
//! use repobot::config::Config;
//! use repobot::topo::sorted_packages;
//! use std::collections::{BTreeMap, BTreeSet};
//!
//! // Parse a repo-set configuration
//! let yaml = r#"
//! packages:
//!   top: [afw]
//! vcs:
//!   git:
//!     url: "git@example.org:lsst/{pkg}.git"
//! "#;
//! let config: Config = serde_yaml::from_str(yaml).unwrap();
//! assert_eq!(
//!     config.url_for("afw").unwrap(),
//!     "git@example.org:lsst/afw.git"
//! );
//!
//! // Order a dependency graph
//! let mut graph: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
//! graph.insert("afw".into(), ["utils".to_string()].into());
//! graph.insert("utils".into(), BTreeSet::new());
//! assert_eq!(sorted_packages(&graph).unwrap(), vec!["utils", "afw"]);
//! ```
//!
//! ## Core Concepts
//!
//! The library is built around a few key concepts:
//!
//! - **Configuration (`config`)**: Defines the schema for `repobot.yaml`
//!   files - top-level packages, ref overrides and fallbacks, inheritance,
//!   VCS backends, and collaborator commands.
//! - **Ref Resolution (`refs`)**: Decides which version-control reference
//!   each package is checked out at, via a strict priority chain of
//!   pinned overrides, untracked markers, and ordered default fallbacks.
//! - **Dependency Metadata (`deps`)**: Reads the immediate dependencies a
//!   checked-out package declares in its committed table file.
//! - **Ordering (`topo`)**: Deterministic topological sort of the managed
//!   dependency graph, with fatal cycle detection.
//! - **Inheritance (`inherit`)**: Borrows already-resolved packages from a
//!   base repo set through filesystem links, with a two-phase
//!   provisional/confirmation protocol.
//! - **Resolution (`repo_set`)**: The orchestrator that ties discovery,
//!   acquisition, ref resolution, inheritance, and ordering together, and
//!   carries the batch operations that walk the resolved order.
//! - **Collaborators (`vcs`, `registry`, `builder`)**: Thin trait-based
//!   adapters over the external `git`/`hg`, registry, and build commands.
//! - **Artifacts (`manifest`)**: The on-disk `packages` list and the
//!   metapackage dependency table that persist a resolution between runs.

pub mod builder;
pub mod config;
pub mod deps;
pub mod error;
pub mod inherit;
pub mod manifest;
pub mod refs;
pub mod registry;
pub mod repo_set;
pub mod topo;
pub mod vcs;

#[cfg(test)]
mod topo_proptest;
