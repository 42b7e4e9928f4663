use std::time::Instant;

use tracing::{info, warn};

use super::csr::SuccessorIndex;
use super::cycle_result::CycleResult;
use super::graph::TransactionGraph;
use super::limits::SearchLimits;
use super::traits::{CycleFinder, Detection};
use common::types::AlgoStats;

/// Exhaustive cycle finder: a bounded depth-first search from every account.
///
/// Every simple cycle with `3..=depth` accounts is found from each of its
/// members, so each ring is discovered several times over; the result store
/// collapses these to one entry. The search stops for good once the
/// exploration budget is spent.
pub struct BruteForceFinder {
    limits: SearchLimits,
}

/// Node-visit counter shared by all start accounts of one run.
struct ExplorationBudget {
    remaining: usize,
    visited: usize,
}

impl ExplorationBudget {
    fn new(limit: usize) -> Self {
        Self {
            remaining: limit,
            visited: 0,
        }
    }

    /// Spends one visit; false once the budget is gone.
    fn try_visit(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.visited += 1;
        true
    }
}

/// One level of the explicit DFS stack: an account and the position of the
/// next successor to try.
struct Frame {
    node: usize,
    cursor: usize,
}

enum SearchStatus {
    Completed,
    BudgetExhausted,
}

impl BruteForceFinder {
    pub fn new(limits: SearchLimits) -> Self {
        BruteForceFinder { limits }
    }

    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    /// Enumerates every simple cycle through `start` of at most `max_depth`
    /// accounts, recording each closing walk in `cycles`.
    ///
    /// The path, the on-path flags and the frame stack are all local to this
    /// call; backtracking pops a frame and clears its flag.
    fn search_from(
        graph: &TransactionGraph,
        index: &SuccessorIndex,
        start: usize,
        max_depth: usize,
        budget: &mut ExplorationBudget,
        cycles: &mut CycleResult,
    ) -> SearchStatus {
        if !budget.try_visit() {
            return SearchStatus::BudgetExhausted;
        }

        let mut on_path = vec![false; index.num_nodes];
        let mut path = Vec::with_capacity(max_depth);
        let mut stack = Vec::with_capacity(max_depth);

        on_path[start] = true;
        path.push(start);
        stack.push(Frame {
            node: start,
            cursor: 0,
        });

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

            if next == start {
                if path.len() >= 3 {
                    let amount = graph.cycle_weight(&path);
                    if let Err(e) = cycles.add(&path, amount) {
                        warn!(error = %e, "discarded malformed cycle");
                    }
                }
                continue;
            }

            if on_path[next] || path.len() >= max_depth {
                continue;
            }

            if !budget.try_visit() {
                return SearchStatus::BudgetExhausted;
            }

            on_path[next] = true;
            path.push(next);
            stack.push(Frame {
                node: next,
                cursor: 0,
            });
        }

        SearchStatus::Completed
    }
}

impl Default for BruteForceFinder {
    fn default() -> Self {
        Self::new(SearchLimits::default())
    }
}

impl CycleFinder for BruteForceFinder {
    fn name(&self) -> &'static str {
        "brute-force DFS"
    }

    fn find_cycles(&self, graph: &TransactionGraph) -> Detection {
        let timer = Instant::now();

        let index = graph.successor_index();
        let num_nodes = index.num_nodes;
        let max_depth = self
            .limits
            .depth_for(num_nodes, index.average_out_degree());

        let mut cycles = CycleResult::new();
        let mut budget = ExplorationBudget::new(self.limits.exploration_budget);
        let mut budget_exhausted = false;

        for start in 0..num_nodes {
            let status =
                Self::search_from(graph, &index, start, max_depth, &mut budget, &mut cycles);

            if let SearchStatus::BudgetExhausted = status {
                warn!(
                    start,
                    num_nodes,
                    budget = self.limits.exploration_budget,
                    cycles = cycles.len(),
                    "exploration budget exhausted; cycle count is a lower bound"
                );
                budget_exhausted = true;
                break;
            }
        }

        let stats = AlgoStats {
            execution_time: timer.elapsed(),
            cycles_found: cycles.len(),
            nodes_visited: budget.visited,
            budget_exhausted,
        };

        info!(
            finder = self.name(),
            max_depth,
            cycles = stats.cycles_found,
            visits = stats.nodes_visited,
            elapsed_ms = stats.execution_time.as_secs_f64() * 1_000.0,
            "cycle search finished"
        );

        Detection { cycles, stats }
    }
}
