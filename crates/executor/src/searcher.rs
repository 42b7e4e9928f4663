use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

use fraud_ring_core::{CycleFinder, Detection, TransactionGraph};

/// Result of one finder run, tagged with the finder's name.
#[derive(Debug)]
pub struct FinderReport {
    pub name: &'static str,
    pub detection: Detection,
}

/// Runs a cycle finder against a frozen graph on the blocking thread pool.
pub struct CycleSearcher<F> {
    finder: F,
}

impl<F> CycleSearcher<F>
where
    F: CycleFinder + 'static,
{
    pub fn new(finder: F) -> Self {
        CycleSearcher { finder }
    }

    /// Starts the search. Finders are CPU-bound and never yield, so they run
    /// on `spawn_blocking`; each owns its own result store, and the graph is
    /// shared read-only.
    pub fn spawn(self, graph: Arc<TransactionGraph>) -> JoinHandle<FinderReport> {
        tokio::task::spawn_blocking(move || {
            let name = self.finder.name();
            debug!(finder = name, "Searcher: starting cycle search");

            let detection = self.finder.find_cycles(&graph);
            FinderReport { name, detection }
        })
    }
}
