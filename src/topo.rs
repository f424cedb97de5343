//! # Topological Sort
//!
//! Orders the managed packages so that every dependency precedes its
//! dependents. Input is the managed dependency graph built during
//! discovery: a map from package name to its set of immediate managed
//! dependencies (external and ignored names have already been filtered
//! out, so every name appearing in a dependency set is also a key).
//!
//! The algorithm repeatedly scans the remaining set for any package whose
//! dependencies are all finished and appends it to the output. Package
//! graphs are tens to low hundreds of nodes, so the quadratic scan is
//! fine and keeps the code obvious. Ordered containers make the tie-break
//! among simultaneously ready packages deterministic (name order), but
//! that is presentation only - the contract is just "dependencies precede
//! dependents".
//!
//! A scan that finds nothing removable while packages remain means the
//! graph has a cycle; that is fatal and reported with the full remaining
//! set, never silently broken by an arbitrary tie-break.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::error::{Error, Result};

/// Produce a dependency-sorted list of the managed package names.
pub fn sorted_packages(dependencies: &BTreeMap<String, BTreeSet<String>>) -> Result<Vec<String>> {
    let mut result = Vec::with_capacity(dependencies.len());
    let mut todo: BTreeSet<&str> = dependencies.keys().map(String::as_str).collect();
    let mut finished: BTreeSet<&str> = BTreeSet::new();
    while !todo.is_empty() {
        let ready = todo
            .iter()
            .find(|name| {
                dependencies[**name]
                    .iter()
                    .all(|dep| finished.contains(dep.as_str()) || !todo.contains(dep.as_str()))
            })
            .copied();
        match ready {
            Some(name) => {
                debug!("Finished all dependencies for '{}'", name);
                todo.remove(name);
                finished.insert(name);
                result.push(name.to_string());
            }
            None => {
                let remaining: Vec<&str> = todo.iter().copied().collect();
                return Err(Error::CircularDependency {
                    remaining: remaining.join(", "),
                });
            }
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &[&str])]) -> BTreeMap<String, BTreeSet<String>> {
        edges
            .iter()
            .map(|(pkg, deps)| {
                (
                    pkg.to_string(),
                    deps.iter().map(|d| d.to_string()).collect(),
                )
            })
            .collect()
    }

    fn index_of(order: &[String], name: &str) -> usize {
        order.iter().position(|p| p == name).unwrap()
    }

    #[test]
    fn test_chain_is_sorted_leaf_first() {
        let order = sorted_packages(&graph(&[("a", &["b"]), ("b", &["c"]), ("c", &[])])).unwrap();
        assert_eq!(order, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_diamond_dependencies_are_tolerated() {
        let order = sorted_packages(&graph(&[
            ("top", &["left", "right"]),
            ("left", &["base"]),
            ("right", &["base"]),
            ("base", &[]),
        ]))
        .unwrap();
        assert_eq!(order.len(), 4);
        assert!(index_of(&order, "base") < index_of(&order, "left"));
        assert!(index_of(&order, "base") < index_of(&order, "right"));
        assert!(index_of(&order, "left") < index_of(&order, "top"));
        assert!(index_of(&order, "right") < index_of(&order, "top"));
    }

    #[test]
    fn test_independent_packages_come_out_in_name_order() {
        let order = sorted_packages(&graph(&[("c", &[]), ("a", &[]), ("b", &[])])).unwrap();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cycle_is_fatal_and_names_members() {
        let err = sorted_packages(&graph(&[
            ("pkga", &["pkgb"]),
            ("pkgb", &["pkga"]),
            ("pkgc", &[]),
        ]))
        .unwrap_err();
        let display = err.to_string();
        assert!(display.contains("Circular dependency"));
        assert!(display.contains("pkga"));
        assert!(display.contains("pkgb"));
        // pkgc was orderable and must not be blamed
        assert!(!display.contains("pkgc"));
    }

    #[test]
    fn test_self_cycle_is_fatal() {
        let err = sorted_packages(&graph(&[("a", &["a"])])).unwrap_err();
        assert!(matches!(err, Error::CircularDependency { .. }));
    }

    #[test]
    fn test_empty_graph() {
        assert!(sorted_packages(&BTreeMap::new()).unwrap().is_empty());
    }
}
