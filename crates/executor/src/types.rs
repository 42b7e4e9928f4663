use tokio::sync::mpsc::Sender;

use super::error::Error;
use common::types::{Account, Transaction};

/// A trait defining the contract for any source that feeds transactions
/// into the ingestion pipeline.
///
/// It decouples the Producer task from the concrete origin of the data
/// (synthetic generator, CSV file, JSON dataset).
///
/// The trait bounds (`Send`, `Sync`, `'static`) let the implementation run
/// on the multi-threaded Tokio runtime.
#[async_trait::async_trait]
pub trait TransactionSource: Send + Sync + 'static {
    /// The accounts the graph must be created with, in id order.
    fn accounts(&self) -> Vec<Account>;

    /// Number of transactions the source expects to emit; used to size the log.
    fn expected_transactions(&self) -> usize;

    /// Streams all transactions in batches, then returns, closing the channel.
    async fn run_stream(self, sender: Sender<Vec<Transaction>>) -> Result<(), Error>;
}

/// Where the transactions of a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Sim,
    Csv(String),
    Json(String),
}

/// Top-level command selected on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Detect(DataSource),
    Generate(String),
}
