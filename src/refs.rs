//! # Ref Values and the Ref Resolver
//!
//! `RefValue` is the resolved version-control reference of a package:
//! either a named branch/tag/commit-ish or `Untracked` for manually managed
//! working copies. `Untracked` renders as the literal `None` in the
//! packages artifact.
//!
//! `resolve_ref` decides which reference to check out for one package.
//! It is a straight priority chain, not a merge or scoring function:
//!
//! 1. A concrete override is checked out exactly once; any failure is a
//!    fatal configuration error - an override that fails is a typo or a
//!    deleted branch, not a transient condition worth falling back from.
//! 2. An explicit null override means the package is untracked and no VCS
//!    operation runs at all.
//! 3. Without an override, each entry of the ordered defaults list is tried
//!    in turn; the first checkout that succeeds wins and later candidates
//!    are never consulted. If every candidate fails, resolution fails with
//!    the enumerated attempt list.
//!
//! For legacy-VCS packages the candidate name is translated through the
//! configured replacement table before the checkout call; the untranslated
//! name is what gets recorded, so artifacts stay spelled consistently
//! across backends.

use std::fmt;
use std::path::Path;

use log::{debug, info};

use crate::config::{Config, RefOverride};
use crate::error::{Error, Result};
use crate::vcs::Vcs;

/// Rendering of an untracked ref in the packages artifact.
const UNTRACKED_LITERAL: &str = "None";

/// The resolved reference of a package.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum RefValue {
    /// A branch, tag, or commit-ish name.
    Named(String),
    /// No tracked reference; the working copy is managed by hand.
    Untracked,
}

impl RefValue {
    /// The ref name, or `None` for untracked packages.
    pub fn name(&self) -> Option<&str> {
        match self {
            RefValue::Named(name) => Some(name),
            RefValue::Untracked => None,
        }
    }

    /// Inverse of `Display`: the literal `None` parses as `Untracked`.
    pub fn parse(text: &str) -> RefValue {
        if text == UNTRACKED_LITERAL {
            RefValue::Untracked
        } else {
            RefValue::Named(text.to_string())
        }
    }
}

impl fmt::Display for RefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefValue::Named(name) => f.write_str(name),
            RefValue::Untracked => f.write_str(UNTRACKED_LITERAL),
        }
    }
}

/// Resolve and check out the reference for one package.
///
/// `package_dir` must hold an existing checkout; the caller has already
/// cloned or located it.
pub fn resolve_ref(
    vcs: &dyn Vcs,
    config: &Config,
    package: &str,
    package_dir: &Path,
) -> Result<RefValue> {
    match config.packages.refs.override_for(package) {
        RefOverride::Untracked => Ok(RefValue::Untracked),
        RefOverride::Pinned(ref_name) => {
            debug!(
                "Trying to checkout ref '{}' for '{}'.",
                ref_name, package
            );
            vcs.checkout(package_dir, config.translate_ref(package, ref_name))
                .map_err(|err| Error::OverrideCheckout {
                    package: package.to_string(),
                    r#ref: ref_name.to_string(),
                    message: err.to_string(),
                })?;
            info!("Using ref '{}' for '{}'.", ref_name, package);
            Ok(RefValue::Named(ref_name.to_string()))
        }
        RefOverride::Absent => {
            for ref_name in &config.packages.refs.default {
                debug!(
                    "Trying to checkout ref '{}' for '{}'.",
                    ref_name, package
                );
                if vcs
                    .checkout(package_dir, config.translate_ref(package, ref_name))
                    .is_ok()
                {
                    info!("Using ref '{}' for '{}'.", ref_name, package);
                    return Ok(RefValue::Named(ref_name.clone()));
                }
            }
            Err(Error::RefFallbackExhausted {
                package: package.to_string(),
                attempted: config.packages.refs.default.join(", "),
            })
        }
    }
}
