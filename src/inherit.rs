//! # Inheritance Reconciler
//!
//! A repo set may borrow already-resolved packages from a separately
//! resolved base set instead of cloning them again. Whether a package is
//! inheritable depends on the inheritability of its dependencies, which
//! are only fully known once the whole graph has been discovered, so the
//! decision is made in two explicit phases:
//!
//! 1. **Provisional** (during discovery): a package with no local checkout
//!    is provisionally inherited when the base set resolved it to a ref
//!    that is in the inheritable-refs configuration and that the current
//!    configuration would accept for the package. The package directory is
//!    satisfied by a symlink into the base set, so its dependency table can
//!    be read without a clone and without ever mutating the base checkout.
//!
//! 2. **Confirmation** (after discovery): `confirm` iteratively removes
//!    from the inherited set every package with an immediate managed
//!    dependency outside the set, until a fixed point is reached. The
//!    resolver then replaces each disqualified package's link with a fresh
//!    clone. External dependencies never disqualify - they are satisfied
//!    by the environment identically for the base and the current set.
//!
//! The base set is read-only input throughout: it is loaded from its own
//! packages artifact and never written to.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::{Config, RefOverride};
use crate::error::{Error, Result};
use crate::manifest;
use crate::refs::RefValue;

/// A fully resolved base repo set, as recorded by its packages artifact.
#[derive(Debug)]
pub struct BaseSet {
    path: PathBuf,
    refs: BTreeMap<String, RefValue>,
}

impl BaseSet {
    /// Load a base set from its packages artifact.
    ///
    /// A base without the artifact has not been resolved, which is a
    /// configuration error of the current set.
    pub fn load(path: &Path) -> Result<BaseSet> {
        let entries = manifest::read_list(path).map_err(|err| Error::BaseNotResolved {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Ok(BaseSet {
            path: path.to_path_buf(),
            refs: entries
                .into_iter()
                .map(|entry| (entry.name, entry.r#ref))
                .collect(),
        })
    }

    /// The base set's root directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The checkout directory of a base package.
    pub fn package_dir(&self, package: &str) -> PathBuf {
        self.path.join(package)
    }

    /// The base set's resolved ref for a package, if it manages one.
    pub fn ref_for(&self, package: &str) -> Option<&RefValue> {
        self.refs.get(package)
    }
}

/// Decide whether a package with no local checkout may provisionally be
/// inherited, returning the ref it would be pinned to.
///
/// All three gates must hold: the base resolved the package to a named
/// ref, that ref is configured as inheritable, and the current
/// configuration would itself select it (it equals the package's pinned
/// override, or the package has no override and the ref appears in the
/// defaults list). Untracked-override packages are never inherited.
pub fn inheritable_ref(base: &BaseSet, config: &Config, package: &str) -> Option<String> {
    let inherit = config.inherit.as_ref()?;
    let base_ref = base.ref_for(package)?.name()?;
    if !inherit.refs.iter().any(|r| r == base_ref) {
        return None;
    }
    let acceptable = match config.packages.refs.override_for(package) {
        RefOverride::Untracked => false,
        RefOverride::Pinned(pinned) => pinned == base_ref,
        RefOverride::Absent => config.packages.refs.default.iter().any(|r| r == base_ref),
    };
    if acceptable {
        Some(base_ref.to_string())
    } else {
        None
    }
}

/// Confirmation phase: prune the provisional inherited set to its fixed
/// point and return the disqualified packages in removal order.
///
/// `dependencies` is the managed dependency graph; names appearing in a
/// dependency set are always keys, so membership in `inherited` is the
/// only test needed.
pub fn confirm(
    inherited: &mut BTreeSet<String>,
    dependencies: &BTreeMap<String, BTreeSet<String>>,
) -> Vec<String> {
    let mut disqualified = Vec::new();
    loop {
        let doomed: Vec<String> = inherited
            .iter()
            .filter(|pkg| {
                dependencies
                    .get(*pkg)
                    .map(|deps| deps.iter().any(|dep| !inherited.contains(dep)))
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        if doomed.is_empty() {
            return disqualified;
        }
        for pkg in doomed {
            debug!("Package '{}' loses inherited status.", pkg);
            inherited.remove(&pkg);
            disqualified.push(pkg);
        }
    }
}
