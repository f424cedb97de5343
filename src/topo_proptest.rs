//! Property-based tests for the topological sort.
//!
//! These tests use proptest to generate random dependency graphs and verify
//! that the ordering invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::topo::sorted_packages;
    use proptest::prelude::*;
    use std::collections::{BTreeMap, BTreeSet};

    /// A random DAG over up to nine packages. Edges only point from higher
    /// to lower indices, so acyclicity holds by construction.
    fn arb_dag() -> impl Strategy<Value = BTreeMap<String, BTreeSet<String>>> {
        (1usize..9).prop_flat_map(|n| {
            proptest::collection::vec(proptest::collection::vec(any::<bool>(), n), n).prop_map(
                move |matrix| {
                    let name = |i: usize| format!("pkg{:02}", i);
                    let mut graph = BTreeMap::new();
                    for i in 0..n {
                        let deps: BTreeSet<String> =
                            (0..i).filter(|j| matrix[i][*j]).map(name).collect();
                        graph.insert(name(i), deps);
                    }
                    graph
                },
            )
        })
    }

    proptest! {
        /// Property: the output is a permutation of the input keys
        #[test]
        fn sort_is_a_permutation(graph in arb_dag()) {
            let order = sorted_packages(&graph).unwrap();
            prop_assert_eq!(order.len(), graph.len());
            let unique: BTreeSet<&String> = order.iter().collect();
            prop_assert_eq!(unique.len(), graph.len());
            for pkg in graph.keys() {
                prop_assert!(order.contains(pkg), "missing package '{}'", pkg);
            }
        }

        /// Property: every dependency precedes its dependents
        #[test]
        fn dependencies_precede_dependents(graph in arb_dag()) {
            let order = sorted_packages(&graph).unwrap();
            let pos = |name: &String| order.iter().position(|p| p == name).unwrap();
            for (pkg, deps) in &graph {
                for dep in deps {
                    prop_assert!(
                        pos(dep) < pos(pkg),
                        "'{}' must come before its dependent '{}'",
                        dep,
                        pkg
                    );
                }
            }
        }

        /// Property: sorting is deterministic (same graph = same order)
        #[test]
        fn sort_is_deterministic(graph in arb_dag()) {
            let first = sorted_packages(&graph).unwrap();
            let second = sorted_packages(&graph).unwrap();
            prop_assert_eq!(first, second);
        }

        /// Property: injecting a two-package cycle always fails the sort
        #[test]
        fn injected_cycle_is_detected(mut graph in arb_dag()) {
            graph.insert("zcyca".to_string(), ["zcycb".to_string()].into());
            graph.insert("zcycb".to_string(), ["zcyca".to_string()].into());
            prop_assert!(sorted_packages(&graph).is_err());
        }
    }
}
