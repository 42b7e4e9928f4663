use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::File;
use tokio::sync::mpsc::Sender;
use tracing::{error, info, warn};

use super::error::Error;
use super::types::TransactionSource;
use common::types::{Account, Transaction};

// Helper struct for CSV parsing
#[derive(Debug, Deserialize, Default)]
pub struct CsvRecord {
    #[serde(rename = "from")]
    pub from_account: usize,

    #[serde(rename = "to")]
    pub to_account: usize,

    pub amount: f64,

    #[serde(default)]
    pub timestamp: i64,
}

/// Reads transactions from a headered CSV file (`from,to,amount,timestamp`).
///
/// The file carries no account table, so the graph is sized to fit the
/// largest id seen, or `min_accounts`, whichever is larger, but never beyond
/// `max_accounts`. Rows naming an account past that bound are streamed as-is
/// and dropped by the graph store.
pub struct CsvSource {
    path: String,
    batch_size: usize,
    transactions: Vec<Transaction>,
    num_accounts: usize,
}

impl CsvSource {
    /// Opens and parses the file eagerly so that the account count is known
    /// before the graph is created.
    pub fn open(
        path: String,
        batch_size: usize,
        min_accounts: usize,
        max_accounts: usize,
    ) -> Result<Self, Error> {
        let transactions = Self::parse_csv_to_transactions(&path)?;
        let max_accounts = max_accounts.max(1);
        let wanted = transactions
            .iter()
            .flat_map(|t| [t.from, t.to])
            .max()
            .map_or(0, |max_id| max_id.saturating_add(1))
            .max(min_accounts);
        let num_accounts = wanted.min(max_accounts).max(1);

        if wanted > max_accounts {
            let out_of_range = transactions
                .iter()
                .filter(|t| t.from >= num_accounts || t.to >= num_accounts)
                .count();
            warn!(
                path = %path,
                max_accounts,
                out_of_range,
                "CSV names accounts beyond the configured bound; those rows will be dropped"
            );
        }

        Ok(CsvSource {
            path,
            batch_size: batch_size.max(1),
            transactions,
            num_accounts,
        })
    }

    fn parse_csv_to_transactions(path: &str) -> Result<Vec<Transaction>, Error> {
        let file = File::open(path).map_err(|e| {
            error!(path, error = %e, "failed to read CSV file");
            Error::IoError(e)
        })?;

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut transactions = Vec::new();

        for result in rdr.deserialize() {
            let record: CsvRecord = result?;
            transactions.push(Transaction::new(
                record.from_account,
                record.to_account,
                record.amount,
                record.timestamp,
            ));
        }
        Ok(transactions)
    }
}

#[async_trait::async_trait]
impl TransactionSource for CsvSource {
    fn accounts(&self) -> Vec<Account> {
        (0..self.num_accounts).map(Account::synthetic).collect()
    }

    fn expected_transactions(&self) -> usize {
        self.transactions.len()
    }

    async fn run_stream(self, sender: Sender<Vec<Transaction>>) -> Result<(), Error> {
        let total = self.transactions.len();
        let mut sent = 0;

        info!(path = %self.path, total, "CsvSource: starting transfer");

        for chunk in self.transactions.chunks(self.batch_size) {
            if let Err(e) = sender.send(chunk.to_vec()).await {
                error!(error = %e, "CsvSource shutting down: loader receiver dropped during send");
                return Err(Error::ChannelSendFailed);
            }

            sent += chunk.len();
        }

        info!(sent, "CsvSource: transfer complete");
        Ok(())
    }
}
