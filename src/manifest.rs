//! # Resolved-Stack Artifacts
//!
//! Two text artifacts describe a resolved repo set:
//!
//! - The **packages list** at `<root>/packages`: one line per managed
//!   package in topological order, `<name> <ref>` for locally cloned
//!   packages and `<name> [<ref>]` for inherited ones, with the literal
//!   `None` as the ref of an untracked package. This file is the only
//!   state persisted between runs; `build`, `list`, `declare`, and friends
//!   read it back instead of repeating discovery.
//!
//! - The **metapackage dependency table** at `<root>/ups/<meta>.table`:
//!   a `setupRequired`/`setupOptional` line per external package and a
//!   pinned `setupRequired(<pkg> -j <version>)` line per managed package,
//!   letting the package registry enforce the same dependency closure at
//!   setup time.
//!
//! Writing happens only after a resolution fully succeeded; reading the
//! list back reproduces package order, ref values, and inherited-set
//! membership exactly.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::refs::RefValue;

/// Name of the packages-list artifact inside the repo-set root.
pub const LIST_FILE: &str = "packages";

/// One line of the packages list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub r#ref: RefValue,
    pub inherited: bool,
}

/// Write the packages list for a resolved repo set.
pub fn write_list(root: &Path, entries: &[ListEntry]) -> Result<()> {
    let mut out = String::new();
    for entry in entries {
        if entry.inherited {
            writeln!(out, "{} [{}]", entry.name, entry.r#ref).expect("write to String");
        } else {
            writeln!(out, "{} {}", entry.name, entry.r#ref).expect("write to String");
        }
    }
    fs::write(root.join(LIST_FILE), out)?;
    Ok(())
}

/// Read the packages list back.
///
/// A missing file means the repo set has never been synced, which is a
/// distinct error from a malformed line.
pub fn read_list(root: &Path) -> Result<Vec<ListEntry>> {
    let file = root.join(LIST_FILE);
    let text = match fs::read_to_string(&file) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::NotSynced {
                path: root.display().to_string(),
            })
        }
        Err(err) => return Err(err.into()),
    };
    let mut entries = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let (name, raw_ref) = match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(raw_ref), None) => (name, raw_ref),
            _ => {
                return Err(Error::ListParse {
                    line: line.to_string(),
                })
            }
        };
        let (raw_ref, inherited) = match raw_ref.strip_prefix('[') {
            Some(inner) => match inner.strip_suffix(']') {
                Some(inner) => (inner, true),
                None => {
                    return Err(Error::ListParse {
                        line: line.to_string(),
                    })
                }
            },
            None => (raw_ref, false),
        };
        entries.push(ListEntry {
            name: name.to_string(),
            r#ref: RefValue::parse(raw_ref),
            inherited,
        });
    }
    Ok(entries)
}

/// Write the metapackage dependency table.
///
/// `managed` carries (package, registry version) pairs in topological
/// order; `external` maps external package names to their required flag.
pub fn write_table(
    root: &Path,
    meta_name: &str,
    external: &BTreeMap<String, bool>,
    managed: &[(String, String)],
) -> Result<()> {
    let ups = root.join("ups");
    fs::create_dir_all(&ups)?;
    let mut out = String::new();
    for (pkg, required) in external {
        if *required {
            writeln!(out, "setupRequired({})", pkg).expect("write to String");
        } else {
            writeln!(out, "setupOptional({})", pkg).expect("write to String");
        }
    }
    for (pkg, version) in managed {
        writeln!(out, "setupRequired({} -j {})", pkg, version).expect("write to String");
    }
    fs::write(ups.join(format!("{}.table", meta_name)), out)?;
    Ok(())
}
