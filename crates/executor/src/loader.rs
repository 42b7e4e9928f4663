use tokio::sync::mpsc::Receiver;
use tracing::{debug, info};

use super::error::Error;
use common::types::Transaction;
use fraud_ring_core::TransactionGraph;

/// Async consumer that seeds a graph from transaction batches.
///
/// Seeding is the only phase in which the graph is mutated; once the
/// channel closes, the loader hands the finished graph back and it is only
/// read from then on.
pub struct GraphLoader {
    graph: TransactionGraph,
    receiver: Receiver<Vec<Transaction>>,
}

impl GraphLoader {
    pub fn new(graph: TransactionGraph, receiver: Receiver<Vec<Transaction>>) -> Self {
        Self { graph, receiver }
    }

    /// Applies batches until every sender is dropped, then returns the graph.
    ///
    /// Transactions the graph rejects (unknown accounts, self-payments) are
    /// counted and logged, not treated as errors.
    pub async fn load(mut self) -> Result<TransactionGraph, Error> {
        debug!("Loader ready.");

        let mut received = 0usize;

        while let Some(batch) = self.receiver.recv().await {
            let before = self.graph.transactions().len();
            for tx in &batch {
                self.graph
                    .add_transaction(tx.from, tx.to, tx.amount, tx.timestamp);
            }
            let accepted = self.graph.transactions().len() - before;
            received += batch.len();

            if accepted < batch.len() {
                debug!(
                    rejected = batch.len() - accepted,
                    batch = batch.len(),
                    "invalid transactions dropped"
                );
            }
        }

        let stats = self.graph.stats();
        info!(
            received,
            accepted = stats.num_transactions,
            accounts = stats.num_accounts,
            edges = stats.num_edges,
            "Receiver closed, graph seeded."
        );

        Ok(self.graph)
    }
}
