use tokio::sync::mpsc::Sender;
use tracing::debug;

use super::{error::Error, types::TransactionSource};
use common::types::Transaction;

pub struct Producer<S: TransactionSource> {
    source: S,
}

impl<S> Producer<S>
where
    S: TransactionSource,
{
    pub fn new(source: S) -> Self {
        Producer { source }
    }

    /// Spawns the source onto the runtime. The channel closes when the
    /// source finishes and drops its sender.
    pub fn run(
        self,
        sender: Sender<Vec<Transaction>>,
    ) -> tokio::task::JoinHandle<Result<(), Error>> {
        debug!("Producer ready.");
        tokio::spawn(async move { self.source.run_stream(sender).await })
    }
}
