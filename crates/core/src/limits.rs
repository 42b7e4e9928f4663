/// Bounds that keep cycle search tractable on large or dense graphs.
///
/// Depths are counted in accounts on the path, so `max_depth` is also the
/// longest cycle a finder reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchLimits {
    /// Longest cycle searched on sparse graphs.
    pub max_depth: usize,
    /// Longest cycle searched once the graph counts as dense.
    pub dense_max_depth: usize,
    /// Average out-degree above which the graph counts as dense.
    pub dense_degree_threshold: f64,
    /// Node visits allowed across a whole brute-force run.
    pub exploration_budget: usize,
    /// Node visits allowed per component in the Tarjan cycle extraction.
    pub component_budget: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_depth: 6,
            dense_max_depth: 4,
            dense_degree_threshold: 20.0,
            exploration_budget: 500_000,
            component_budget: 50_000,
        }
    }
}

impl SearchLimits {
    /// Effective maximum path length for a graph of `num_nodes` accounts.
    pub fn depth_for(&self, num_nodes: usize, average_out_degree: f64) -> usize {
        let cap = if average_out_degree > self.dense_degree_threshold {
            self.dense_max_depth
        } else {
            self.max_depth
        };
        num_nodes.min(cap)
    }
}
