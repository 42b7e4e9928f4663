use std::time::Instant;

use tracing::{debug, info, warn};

use super::csr::SuccessorIndex;
use super::cycle_result::CycleResult;
use super::graph::TransactionGraph;
use super::limits::SearchLimits;
use super::traits::{CycleFinder, Detection};
use common::types::AlgoStats;

/// Cycle finder built on Tarjan's strongly connected components.
///
/// Runs in two phases:
/// 1. Decompose the graph into SCCs with the low-link DFS.
/// 2. Inside every component of two or more accounts, run a bounded DFS over
///    intra-component edges and record the first closing walk of length ≥ 3.
///
/// Exactly one representative ring is reported per qualifying component.
/// A component can hold exponentially many simple cycles, so full
/// enumeration is left to [`BruteForceFinder`](crate::bruteforce::BruteForceFinder).
pub struct TarjanFinder {
    limits: SearchLimits,
}

struct Frame {
    node: usize,
    cursor: usize,
}

/// Per-run state of the low-link decomposition.
struct TarjanState {
    next_index: usize,
    indices: Vec<Option<usize>>,
    low_links: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    components: Vec<Vec<usize>>,
}

impl TarjanState {
    fn new(num_nodes: usize) -> Self {
        Self {
            next_index: 0,
            indices: vec![None; num_nodes],
            low_links: vec![0; num_nodes],
            on_stack: vec![false; num_nodes],
            stack: Vec::new(),
            components: Vec::new(),
        }
    }

    fn discover(&mut self, node: usize) {
        self.indices[node] = Some(self.next_index);
        self.low_links[node] = self.next_index;
        self.next_index += 1;
        self.stack.push(node);
        self.on_stack[node] = true;
    }

    /// Iterative form of Tarjan's `strongconnect`; an explicit frame stack
    /// replaces recursion so that long chains cannot overflow the call stack.
    fn strong_connect(&mut self, index: &SuccessorIndex, root: usize) {
        let mut call_stack = vec![Frame {
            node: root,
            cursor: 0,
        }];
        self.discover(root);

        while let Some(frame) = call_stack.last_mut() {
            let node = frame.node;
            let successors = index.successors(node);

            if frame.cursor < successors.len() {
                let next = successors[frame.cursor];
                frame.cursor += 1;

                match self.indices[next] {
                    None => {
                        self.discover(next);
                        call_stack.push(Frame {
                            node: next,
                            cursor: 0,
                        });
                    }
                    Some(next_index) if self.on_stack[next] => {
                        self.low_links[node] = self.low_links[node].min(next_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            call_stack.pop();

            if self.indices[node] == Some(self.low_links[node]) {
                self.pop_component(node);
            }

            if let Some(parent) = call_stack.last() {
                let parent = parent.node;
                self.low_links[parent] = self.low_links[parent].min(self.low_links[node]);
            }
        }
    }

    /// Pops the stack down to and including `root`; the popped accounts form
    /// one component, stored in ascending id order.
    fn pop_component(&mut self, root: usize) {
        let mut component = Vec::new();
        while let Some(member) = self.stack.pop() {
            self.on_stack[member] = false;
            component.push(member);
            if member == root {
                break;
            }
        }
        component.sort_unstable();
        self.components.push(component);
    }
}

/// Decomposes the graph into strongly connected components.
///
/// Every account belongs to exactly one component. Components are returned
/// in the order Tarjan's algorithm completes them (reverse topological
/// order of the condensation); members are sorted by id.
pub fn strongly_connected_components(index: &SuccessorIndex) -> Vec<Vec<usize>> {
    let mut state = TarjanState::new(index.num_nodes);

    for root in 0..index.num_nodes {
        if state.indices[root].is_none() {
            state.strong_connect(index, root);
        }
    }

    state.components
}

enum Extraction {
    Found(Vec<usize>),
    NotFound,
    BudgetExhausted,
}

impl TarjanFinder {
    pub fn new(limits: SearchLimits) -> Self {
        TarjanFinder { limits }
    }

    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    /// Searches `component` for a simple cycle of `3..=max_depth` accounts.
    ///
    /// Start accounts are tried in ascending order. A search from `start`
    /// only moves to members with a larger id: any ring through a smaller
    /// member was already ruled out by that member's own search.
    fn extract_cycle(
        index: &SuccessorIndex,
        component: &[usize],
        in_component: &[bool],
        max_depth: usize,
        budget: usize,
        visits: &mut usize,
    ) -> Extraction {
        let mut spent = 0usize;
        let mut on_path = vec![false; index.num_nodes];

        for &start in component {
            let mut path = vec![start];
            let mut stack = vec![Frame {
                node: start,
                cursor: 0,
            }];
            on_path[start] = true;

            while let Some(frame) = stack.last_mut() {
                let successors = index.successors(frame.node);

                if frame.cursor >= successors.len() {
                    stack.pop();
                    if let Some(node) = path.pop() {
                        on_path[node] = false;
                    }
                    continue;
                }

                let next = successors[frame.cursor];
                frame.cursor += 1;

                if !in_component[next] {
                    continue;
                }

                if next == start {
                    if path.len() >= 3 {
                        return Extraction::Found(path);
                    }
                    continue;
                }

                if next < start || on_path[next] || path.len() >= max_depth {
                    continue;
                }

                if spent >= budget {
                    return Extraction::BudgetExhausted;
                }
                spent += 1;
                *visits += 1;

                on_path[next] = true;
                path.push(next);
                stack.push(Frame {
                    node: next,
                    cursor: 0,
                });
            }
        }

        Extraction::NotFound
    }
}

impl Default for TarjanFinder {
    fn default() -> Self {
        Self::new(SearchLimits::default())
    }
}

impl CycleFinder for TarjanFinder {
    fn name(&self) -> &'static str {
        "Tarjan SCC"
    }

    fn find_cycles(&self, graph: &TransactionGraph) -> Detection {
        let timer = Instant::now();

        let index = graph.successor_index();
        let components = strongly_connected_components(&index);
        let max_depth = self
            .limits
            .depth_for(index.num_nodes, index.average_out_degree());

        let mut cycles = CycleResult::new();
        let mut in_component = vec![false; index.num_nodes];
        let mut visits = index.num_nodes;
        let mut budget_exhausted = false;

        for component in components.iter().filter(|c| c.len() > 1) {
            for &member in component {
                in_component[member] = true;
            }

            let extraction = Self::extract_cycle(
                &index,
                component,
                &in_component,
                max_depth,
                self.limits.component_budget,
                &mut visits,
            );

            match extraction {
                Extraction::Found(path) => {
                    let amount = graph.cycle_weight(&path);
                    debug!(size = component.len(), cycle = ?path, "component ring found");
                    if let Err(e) = cycles.add(&path, amount) {
                        warn!(error = %e, "discarded malformed cycle");
                    }
                }
                Extraction::NotFound => {
                    debug!(size = component.len(), "component has no ring within depth");
                }
                Extraction::BudgetExhausted => {
                    warn!(
                        size = component.len(),
                        budget = self.limits.component_budget,
                        "component search budget exhausted"
                    );
                    budget_exhausted = true;
                }
            }

            for &member in component {
                in_component[member] = false;
            }
        }

        let stats = AlgoStats {
            execution_time: timer.elapsed(),
            cycles_found: cycles.len(),
            nodes_visited: visits,
            budget_exhausted,
        };

        info!(
            finder = self.name(),
            components = components.len(),
            cycles = stats.cycles_found,
            visits = stats.nodes_visited,
            elapsed_ms = stats.execution_time.as_secs_f64() * 1_000.0,
            "cycle search finished"
        );

        Detection { cycles, stats }
    }
}

#[cfg(test)]
mod tarjan_tests {
    use super::*;

    fn build_graph(num_nodes: usize, edges: &[(usize, usize)]) -> TransactionGraph {
        let mut graph = TransactionGraph::new(num_nodes, edges.len());
        for (ts, &(from, to)) in edges.iter().enumerate() {
            graph.add_transaction(from, to, 100.0, ts as i64);
        }
        graph
    }

    fn components_of(graph: &TransactionGraph) -> Vec<Vec<usize>> {
        let mut components = strongly_connected_components(&graph.successor_index());
        components.sort();
        components
    }

    #[test]
    fn chain_has_only_singleton_components() {
        let graph = build_graph(3, &[(0, 1), (1, 2)]);

        assert_eq!(components_of(&graph), vec![vec![0], vec![1], vec![2]]);
        assert!(TarjanFinder::default().find_cycles(&graph).cycles.is_empty());
    }

    #[test]
    fn separates_cycle_from_downstream_component() {
        let graph = build_graph(5, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 3)]);

        assert_eq!(components_of(&graph), vec![vec![0, 1, 2], vec![3, 4]]);
    }

    #[test]
    fn sink_components_complete_first() {
        let graph = build_graph(5, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 3)]);
        let components = strongly_connected_components(&graph.successor_index());

        assert_eq!(components.first(), Some(&vec![3, 4]));
        assert_eq!(components.last(), Some(&vec![0, 1, 2]));
    }

    #[test]
    fn one_ring_per_component() {
        // 0 -> 1 -> 2 -> 3 -> 0 and 1 -> 2 -> 4 -> 1 share one component.
        let graph = build_graph(5, &[(0, 1), (1, 2), (2, 3), (3, 0), (2, 4), (4, 1)]);
        let detection = TarjanFinder::default().find_cycles(&graph);

        assert_eq!(detection.stats.cycles_found, 1);
        assert_eq!(detection.cycles.cycles()[0].nodes(), &[0, 1, 2, 3]);
        assert_eq!(detection.cycles.cycles()[0].total_amount(), 4.0);
    }

    #[test]
    fn disjoint_rings_are_reported_separately() {
        let graph = build_graph(6, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]);
        let detection = TarjanFinder::default().find_cycles(&graph);

        assert_eq!(detection.cycles.len(), 2);
        assert!(detection.cycles.contains(&[0, 1, 2]));
        assert!(detection.cycles.contains(&[3, 4, 5]));
    }

    #[test]
    fn two_account_component_has_no_ring() {
        let graph = build_graph(2, &[(0, 1), (1, 0)]);
        let detection = TarjanFinder::default().find_cycles(&graph);

        assert_eq!(components_of(&graph), vec![vec![0, 1]]);
        assert!(detection.cycles.is_empty());
    }

    #[test]
    fn component_of_round_trips_only_has_no_ring() {
        // Star of bidirectional pairs around account 0.
        let graph = build_graph(4, &[(0, 1), (1, 0), (0, 2), (2, 0), (0, 3), (3, 0)]);
        let detection = TarjanFinder::default().find_cycles(&graph);

        assert_eq!(components_of(&graph), vec![vec![0, 1, 2, 3]]);
        assert!(detection.cycles.is_empty());
    }

    #[test]
    fn ring_not_through_smallest_member_is_found() {
        // 0 <-> 1 joins the component, the ring is 1 -> 2 -> 3 -> 1.
        let graph = build_graph(4, &[(0, 1), (1, 0), (1, 2), (2, 3), (3, 1)]);
        let detection = TarjanFinder::default().find_cycles(&graph);

        assert_eq!(detection.cycles.len(), 1);
        assert_eq!(detection.cycles.cycles()[0].nodes(), &[1, 2, 3]);
    }

    #[test]
    fn long_ring_is_one_component_without_short_cycle() {
        let n = 2_000;
        let edges: Vec<(usize, usize)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
        let graph = build_graph(n, &edges);

        let components = strongly_connected_components(&graph.successor_index());
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].len(), n);

        let detection = TarjanFinder::default().find_cycles(&graph);
        assert!(detection.cycles.is_empty());
        assert!(!detection.stats.budget_exhausted);
    }

    #[test]
    fn tiny_component_budget_degrades_gracefully() {
        let edges: Vec<(usize, usize)> = (0..6)
            .flat_map(|u| (0..6).map(move |v| (u, v)))
            .filter(|(u, v)| u != v)
            .collect();
        let graph = build_graph(6, &edges);
        let limits = SearchLimits {
            component_budget: 1,
            ..SearchLimits::default()
        };
        let detection = TarjanFinder::new(limits).find_cycles(&graph);

        assert!(detection.cycles.is_empty());
        assert!(detection.stats.budget_exhausted);
    }
}
