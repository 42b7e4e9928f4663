use std::collections::{BTreeSet, VecDeque};

use common::canonical::canonicalize;
use fraud_ring_core::{
    BruteForceFinder, CycleFinder, CycleResult, SearchLimits, SuccessorIndex, TarjanFinder,
    TransactionGraph, group_subnetworks, strongly_connected_components,
};
use proptest::prelude::*;
use proptest::strategy::Strategy;

fn graph_strategy() -> impl Strategy<Value = TransactionGraph> {
    (3usize..9).prop_flat_map(|num_nodes| {
        let edge = (0usize..num_nodes, 0usize..num_nodes);
        prop::collection::vec(edge, 0..30).prop_map(move |edges| {
            let mut graph = TransactionGraph::new(num_nodes, edges.len());
            for (from, to) in edges {
                graph.add_transaction(from, to, 1.0, 0);
            }
            graph
        })
    })
}

/// A cycle of distinct ids, plus a rotation offset and a direction flag.
fn cycle_strategy() -> impl Strategy<Value = (Vec<usize>, usize, bool)> {
    prop::collection::hash_set(0usize..50, 3..8).prop_flat_map(|ids| {
        let cycle: Vec<usize> = ids.into_iter().collect();
        let len = cycle.len();
        (Just(cycle), 0..len, any::<bool>())
    })
}

fn reachable_from(index: &SuccessorIndex, start: usize) -> Vec<bool> {
    let mut seen = vec![false; index.num_nodes];
    let mut queue = VecDeque::from([start]);
    seen[start] = true;

    while let Some(u) = queue.pop_front() {
        for &v in index.successors(u) {
            if !seen[v] {
                seen[v] = true;
                queue.push_back(v);
            }
        }
    }
    seen
}

/// Reference enumeration: every simple cycle of `3..=max_depth` accounts,
/// found by plain recursion over the adjacency matrix. Each cycle is walked
/// once from its smallest member and keyed by its canonical form.
fn enumerate_cycles(graph: &TransactionGraph, max_depth: usize) -> BTreeSet<Vec<usize>> {
    fn extend(
        graph: &TransactionGraph,
        max_depth: usize,
        path: &mut Vec<usize>,
        found: &mut BTreeSet<Vec<usize>>,
    ) {
        let start = path[0];
        let last = path[path.len() - 1];
        for next in 0..graph.num_accounts() {
            if !graph.has_edge(last, next) {
                continue;
            }
            if next == start && path.len() >= 3 {
                found.insert(canonicalize(path));
            } else if next > start && !path.contains(&next) && path.len() < max_depth {
                path.push(next);
                extend(graph, max_depth, path, found);
                path.pop();
            }
        }
    }

    let mut found = BTreeSet::new();
    for start in 0..graph.num_accounts() {
        extend(graph, max_depth, &mut vec![start], &mut found);
    }
    found
}

fn default_depth(graph: &TransactionGraph) -> usize {
    let index = graph.successor_index();
    SearchLimits::default().depth_for(index.num_nodes, index.average_out_degree())
}

proptest! {
    /// Property: every rotation or reversal of a cycle has the same canonical form.
    #[test]
    fn canonical_form_ignores_rotation_and_direction((cycle, shift, reverse) in cycle_strategy()) {
        let mut variant = cycle.clone();
        variant.rotate_left(shift);
        if reverse {
            variant.reverse();
        }

        prop_assert_eq!(canonicalize(&variant), canonicalize(&cycle));
    }

    /// Property: no two stored cycles share a canonical form.
    #[test]
    fn result_store_never_holds_duplicates(
        cycles in prop::collection::vec(cycle_strategy(), 0..20)
    ) {
        let mut result = CycleResult::new();
        for (cycle, shift, reverse) in &cycles {
            let mut variant = cycle.clone();
            variant.rotate_left(*shift);
            if *reverse {
                variant.reverse();
            }
            result.add(cycle, 3.0).unwrap();
            prop_assert_eq!(result.add(&variant, 3.0), Ok(false));
        }

        let keys: Vec<&[usize]> = result.iter().map(|c| c.canonical()).collect();
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                prop_assert_ne!(a, b);
            }
        }
    }

    /// Property: members of one component reach each other; members of
    /// different components are not mutually reachable.
    #[test]
    fn scc_members_are_mutually_reachable(graph in graph_strategy()) {
        let index = graph.successor_index();
        let components = strongly_connected_components(&index);

        let mut component_of = vec![usize::MAX; index.num_nodes];
        for (c, members) in components.iter().enumerate() {
            for &m in members {
                prop_assert_eq!(component_of[m], usize::MAX, "account in two components");
                component_of[m] = c;
            }
        }

        let reach: Vec<Vec<bool>> = (0..index.num_nodes)
            .map(|u| reachable_from(&index, u))
            .collect();

        for u in 0..index.num_nodes {
            for v in 0..index.num_nodes {
                let mutual = reach[u][v] && reach[v][u];
                prop_assert_eq!(mutual, component_of[u] == component_of[v]);
            }
        }
    }

    /// Property: a starved budget never corrupts the result, it only shrinks it.
    #[test]
    fn budget_abort_degrades_never_corrupts(graph in graph_strategy(), budget in 0usize..20) {
        let full = BruteForceFinder::default().find_cycles(&graph);
        let limits = SearchLimits { exploration_budget: budget, ..SearchLimits::default() };
        let partial = BruteForceFinder::new(limits).find_cycles(&graph);

        prop_assert!(partial.stats.cycles_found <= full.stats.cycles_found);
        prop_assert!(partial.stats.nodes_visited <= budget);
        for cycle in &partial.cycles {
            prop_assert!(full.cycles.contains(cycle.nodes()));
        }
    }

    /// Property: every Tarjan ring is a real walk and also found by brute force.
    #[test]
    fn tarjan_rings_are_valid_cycles(graph in graph_strategy()) {
        let rings = TarjanFinder::default().find_cycles(&graph);
        let all = BruteForceFinder::default().find_cycles(&graph);

        for cycle in &rings.cycles {
            let nodes = cycle.nodes();
            for i in 0..nodes.len() {
                prop_assert!(graph.has_edge(nodes[i], nodes[(i + 1) % nodes.len()]));
            }
            prop_assert!(all.cycles.contains(nodes));
        }
    }

    /// Property: grouping places every cycle in exactly one subnetwork.
    #[test]
    fn grouping_covers_every_cycle_once(graph in graph_strategy()) {
        let detection = BruteForceFinder::default().find_cycles(&graph);
        let groups = group_subnetworks(&detection.cycles);

        let grouped: usize = groups.iter().map(|g| g.cycles.len()).sum();
        prop_assert_eq!(grouped, detection.cycles.len());

        for cycle in &detection.cycles {
            let holders = groups
                .iter()
                .filter(|g| g.cycles.iter().any(|c| std::ptr::eq(*c, cycle)))
                .count();
            prop_assert_eq!(holders, 1);
        }
        for group in &groups {
            prop_assert!(group.cycles.iter().all(|c| c.root() == group.root));
        }
    }

    /// Property: brute force reports exactly the cycles a plain recursive
    /// enumeration finds within the same depth.
    #[test]
    fn bruteforce_finds_every_bounded_cycle(graph in graph_strategy()) {
        let detection = BruteForceFinder::default().find_cycles(&graph);
        prop_assert!(!detection.stats.budget_exhausted);

        let reported: BTreeSet<Vec<usize>> =
            detection.cycles.iter().map(|c| c.canonical().to_vec()).collect();
        prop_assert_eq!(reported.len(), detection.cycles.len());
        prop_assert_eq!(reported, enumerate_cycles(&graph, default_depth(&graph)));
    }

    /// Property: each non-trivial component yields exactly one ring when it
    /// holds a cycle of `3..=depth` accounts, and none otherwise.
    #[test]
    fn tarjan_reports_one_ring_per_cyclic_component(graph in graph_strategy()) {
        let detection = TarjanFinder::default().find_cycles(&graph);
        prop_assert!(!detection.stats.budget_exhausted);

        let index = graph.successor_index();
        let all = enumerate_cycles(&graph, default_depth(&graph));
        let mut accounted = 0;

        for members in strongly_connected_components(&index) {
            if members.len() < 2 {
                continue;
            }
            let inside = |nodes: &[usize]| nodes.iter().all(|n| members.binary_search(n).is_ok());

            let expected = usize::from(all.iter().any(|cycle| inside(cycle.as_slice())));
            let rings = detection.cycles.iter().filter(|c| inside(c.nodes())).count();
            prop_assert_eq!(rings, expected, "component {:?}", members);
            accounted += rings;
        }

        prop_assert_eq!(accounted, detection.cycles.len());
    }
}
