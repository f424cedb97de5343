//! # Dependency Reader
//!
//! Reads the immediate dependencies a checked-out package declares. The
//! edge set is a property of (package, checked-out ref): the metadata lives
//! inside the checkout, so the same package name can declare different
//! dependencies on different refs.
//!
//! The concrete reader parses the dependency table committed at
//! `<package_dir>/ups/<package>.table`. Lines of the form
//! `setupRequired(<name> ...)` and `setupOptional(<name> ...)` declare
//! required and optional dependencies; anything else in the table
//! (environment setup directives, comments) is ignored. Reading never
//! mutates the checkout.
//!
//! A missing or unreadable table for a package that is locally present is a
//! configuration error. Packages whose directory is absent never reach the
//! reader - the resolver classifies those as external first.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// One immediate dependency edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Name of the package depended on.
    pub name: String,
    /// Optional dependencies still participate in traversal and ordering,
    /// but do not force the required flag on an external package.
    pub optional: bool,
}

/// Trait for dependency metadata access - allows mocking in tests.
pub trait DependencyReader: Send + Sync {
    /// Return the immediate dependencies declared by the checkout at
    /// `package_dir`.
    fn read(&self, package_dir: &Path, package: &str) -> Result<Vec<Dependency>>;
}

/// Reads `ups/<package>.table` dependency tables.
pub struct TableReader;

impl DependencyReader for TableReader {
    fn read(&self, package_dir: &Path, package: &str) -> Result<Vec<Dependency>> {
        let table = package_dir.join("ups").join(format!("{}.table", package));
        let text = fs::read_to_string(&table).map_err(|err| Error::DependencyTable {
            package: package.to_string(),
            message: format!("{}: {}", table.display(), err),
        })?;
        Ok(parse_table(&text))
    }
}

/// Parse the dependency declarations out of a table file body.
pub fn parse_table(text: &str) -> Vec<Dependency> {
    let mut dependencies = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        let (rest, optional) = if let Some(rest) = line.strip_prefix("setupRequired(") {
            (rest, false)
        } else if let Some(rest) = line.strip_prefix("setupOptional(") {
            (rest, true)
        } else {
            continue;
        };
        // The argument list may carry version qualifiers after the name.
        let name = rest
            .trim_end_matches(')')
            .split_whitespace()
            .next()
            .unwrap_or("");
        if !name.is_empty() {
            dependencies.push(Dependency {
                name: name.to_string(),
                optional,
            });
        }
    }
    dependencies
}
