//! Property-based tests for the could-be matcher
//!
//! Random graphs of named and anonymous nodes joined by base-type edges
//! (cycles included) are checked against a plain reachability search, and the
//! composition rules are checked against their members.

use crate::*;
use proptest::prelude::*;
use std::collections::HashSet;

const NAMES: [&str; 4] = ["Observable", "Subject", "Error", "Subscription"];

/// Fewer cases locally, the full default in CI
fn proptest_config() -> ProptestConfig {
    if std::env::var("CI").is_ok() {
        ProptestConfig::default()
    } else {
        ProptestConfig {
            cases: 64,
            max_shrink_iters: 100,
            ..ProptestConfig::default()
        }
    }
}

/// Node names (index into `NAMES`, or anonymous) plus base-type edges
fn arbitrary_graph() -> impl Strategy<Value = (Vec<Option<usize>>, Vec<(usize, usize)>)> {
    (1usize..8).prop_flat_map(|size| {
        (
            prop::collection::vec(prop::option::of(0..NAMES.len()), size),
            prop::collection::vec((0..size, 0..size), 0..size * 2),
        )
    })
}

fn build(names: &[Option<usize>], edges: &[(usize, usize)]) -> (TypeGraph, Vec<TypeHandle>) {
    let mut graph = TypeGraph::new();
    let handles: Vec<TypeHandle> = names
        .iter()
        .map(|name| match name {
            Some(index) => graph.add_node(TypeNode::object(Symbol::global(NAMES[*index]))),
            None => graph.add_node(TypeNode::anonymous(TypeClass::Object)),
        })
        .collect();
    for (from, to) in edges {
        graph.add_base_type(handles[*from], handles[*to]);
    }
    (graph, handles)
}

/// Is a node named `target` reachable from `start` through base types?
fn reachable(graph: &TypeGraph, start: TypeHandle, target: &str) -> bool {
    let mut seen = HashSet::new();
    let mut stack = vec![start];
    while let Some(handle) = stack.pop() {
        if !seen.insert(handle) {
            continue;
        }
        let node = graph.node(handle).unwrap();
        if node.name() == Some(target) {
            return true;
        }
        stack.extend(node.base_types.iter().copied());
    }
    false
}

// Property: on plain graphs, could-be is reachability of a matching symbol
proptest! {
    #![proptest_config(proptest_config())]
    #[test]
    fn test_matches_base_type_reachability((names, edges) in arbitrary_graph()) {
        let (graph, handles) = build(&names, &edges);
        let matcher = StructuralMatcher::new(&graph);

        for handle in &handles {
            for name in NAMES {
                prop_assert_eq!(
                    matcher.could_be_type(*handle, &name.into()),
                    reachable(&graph, *handle, name),
                    "{} from {}", name, handle
                );
            }
        }
    }
}

// Property: a union or intersection could be T exactly when some member could
proptest! {
    #![proptest_config(proptest_config())]
    #[test]
    fn test_composites_are_monotone(
        (names, edges) in arbitrary_graph(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..4),
        intersect in any::<bool>(),
    ) {
        let (mut graph, handles) = build(&names, &edges);
        let members: Vec<TypeHandle> = picks.iter().map(|pick| *pick.get(&handles)).collect();
        let composite = if intersect {
            graph.add_node(TypeNode::intersection(members.clone()))
        } else {
            graph.add_node(TypeNode::union(members.clone()))
        };
        let matcher = StructuralMatcher::new(&graph);

        for name in NAMES {
            let target: TargetDescriptor = name.into();
            let any_member = members
                .iter()
                .any(|member| matcher.could_be_type(*member, &target));
            prop_assert_eq!(matcher.could_be_type(composite, &target), any_member);
        }
    }
}

// Property: under a tight depth bound, member order does not change the answer
proptest! {
    #![proptest_config(proptest_config())]
    #[test]
    fn test_depth_bound_is_order_independent(
        (names, edges) in arbitrary_graph(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 2..5),
        max_depth in 1usize..4,
    ) {
        let (mut graph, handles) = build(&names, &edges);
        let members: Vec<TypeHandle> = picks.iter().map(|pick| *pick.get(&handles)).collect();
        let reversed: Vec<TypeHandle> = members.iter().rev().copied().collect();
        let forward = graph.add_node(TypeNode::union(members));
        let backward = graph.add_node(TypeNode::union(reversed));
        let matcher = StructuralMatcher::with_max_depth(&graph, max_depth);

        for name in NAMES {
            let target: TargetDescriptor = name.into();
            prop_assert_eq!(
                matcher.could_be_type(forward, &target),
                matcher.could_be_type(backward, &target)
            );
        }
    }
}

// Property: a generic instantiation answers exactly like its origin
proptest! {
    #![proptest_config(proptest_config())]
    #[test]
    fn test_references_are_transparent(
        (names, edges) in arbitrary_graph(),
        origin in any::<prop::sample::Index>(),
        argument in any::<prop::sample::Index>(),
    ) {
        let (mut graph, handles) = build(&names, &edges);
        let origin = *origin.get(&handles);
        let instance = graph.add_node(TypeNode::reference(origin, vec![*argument.get(&handles)]));
        let matcher = StructuralMatcher::new(&graph);

        for name in NAMES {
            let target: TargetDescriptor = name.into();
            prop_assert_eq!(
                matcher.could_be_type(instance, &target),
                matcher.could_be_type(origin, &target)
            );
        }
    }
}

// Property: memoized and direct façades agree, query after query
proptest! {
    #![proptest_config(proptest_config())]
    #[test]
    fn test_memo_agrees_with_direct((names, edges) in arbitrary_graph()) {
        let (mut graph, handles) = build(&names, &edges);
        for (i, handle) in handles.iter().enumerate() {
            graph.bind(format!("n{i}"), *handle);
        }
        let memoized = TypeServices::new(&graph);
        let direct = TypeServices::with_config(&graph, OracleConfig::new().with_memoize(false));

        for round in 0..2 {
            for i in 0..handles.len() {
                let location = format!("n{i}");
                for name in NAMES {
                    prop_assert_eq!(
                        memoized.could_be_type(location.as_str(), name),
                        direct.could_be_type(location.as_str(), name),
                        "round {}", round
                    );
                }
            }
        }
    }
}
