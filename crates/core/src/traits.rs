use super::cycle_result::CycleResult;
use super::graph::TransactionGraph;
use common::types::AlgoStats;

/// Output of a single finder run: the cycles plus run metrics.
#[derive(Debug, Clone)]
pub struct Detection {
    pub cycles: CycleResult,
    pub stats: AlgoStats,
}

/// Trait for algorithms that search a transaction graph for fraud rings.
///
/// Implementations only read the graph, so several finders may run against
/// the same graph concurrently, each producing its own [`Detection`].
pub trait CycleFinder: Send + Sync {
    /// Short human-readable name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Searches `graph` for cycles of length ≥ 3.
    ///
    /// Never fails: a search cut short by its limits returns the cycles found
    /// so far with `stats.budget_exhausted` set.
    fn find_cycles(&self, graph: &TransactionGraph) -> Detection;
}
