use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tokio::sync::mpsc::Sender;
use tracing::{error, info};

use super::error::Error;
use super::types::TransactionSource;
use common::types::{Account, Transaction};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetMetadata {
    pub num_users: usize,
    pub num_transactions: usize,
    pub fraud_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    pub user_id: usize,
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    pub from_user: usize,
    pub to_user: usize,
    pub amount: f64,
    pub timestamp: i64,
}

/// On-disk banking dataset: account balances plus the transaction list.
///
/// Transactions name accounts by `user_id`. Graph ids are list positions,
/// so `user_id`s need not be contiguous or ordered. Transactions naming an
/// unknown `user_id` map to an out-of-range id and are dropped by the graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    #[serde(default)]
    pub metadata: Option<DatasetMetadata>,
    pub users: Vec<UserRecord>,
    pub transactions: Vec<TransactionRecord>,
}

impl Dataset {
    pub fn new(accounts: &[Account], transactions: &[Transaction], fraud_rate: f64) -> Self {
        Dataset {
            metadata: Some(DatasetMetadata {
                num_users: accounts.len(),
                num_transactions: transactions.len(),
                fraud_rate,
            }),
            users: accounts
                .iter()
                .map(|a| UserRecord {
                    user_id: a.id(),
                    balance: a.balance(),
                })
                .collect(),
            transactions: transactions
                .iter()
                .map(|t| TransactionRecord {
                    from_user: t.from,
                    to_user: t.to,
                    amount: t.amount,
                    timestamp: t.timestamp,
                })
                .collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "failed to open dataset");
            Error::IoError(e)
        })?;
        let dataset = serde_json::from_reader(BufReader::new(file))?;
        Ok(dataset)
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Accounts in user order. Account numbers are derived from each
    /// record's `user_id`; graph ids are assigned by position.
    pub fn accounts(&self) -> Vec<Account> {
        self.users
            .iter()
            .enumerate()
            .map(|(idx, u)| {
                Account::new(
                    idx,
                    format!("user_{:04}", u.user_id),
                    format!("ACC_{:06}", u.user_id),
                    u.balance,
                )
            })
            .collect()
    }

    /// Transactions with `user_id`s translated to graph ids. When a
    /// `user_id` repeats, its first position wins.
    pub fn transactions(&self) -> Vec<Transaction> {
        let mut position: HashMap<usize, usize> = HashMap::with_capacity(self.users.len());
        for (idx, user) in self.users.iter().enumerate() {
            position.entry(user.user_id).or_insert(idx);
        }
        let unknown = self.users.len();
        let graph_id = |user_id: usize| position.get(&user_id).copied().unwrap_or(unknown);

        self.transactions
            .iter()
            .map(|t| {
                Transaction::new(
                    graph_id(t.from_user),
                    graph_id(t.to_user),
                    t.amount,
                    t.timestamp,
                )
            })
            .collect()
    }
}

/// Streams the transactions of a JSON [`Dataset`].
pub struct JsonSource {
    dataset: Dataset,
    batch_size: usize,
}

impl JsonSource {
    pub fn open(path: &Path, batch_size: usize) -> Result<Self, Error> {
        let dataset = Dataset::load(path)?;
        info!(
            path = %path.display(),
            users = dataset.users.len(),
            transactions = dataset.transactions.len(),
            "dataset loaded"
        );
        Ok(JsonSource {
            dataset,
            batch_size: batch_size.max(1),
        })
    }
}

#[async_trait::async_trait]
impl TransactionSource for JsonSource {
    fn accounts(&self) -> Vec<Account> {
        self.dataset.accounts()
    }

    fn expected_transactions(&self) -> usize {
        self.dataset.transactions.len()
    }

    async fn run_stream(self, sender: Sender<Vec<Transaction>>) -> Result<(), Error> {
        let all_txs = self.dataset.transactions();

        for chunk in all_txs.chunks(self.batch_size) {
            if sender.send(chunk.to_vec()).await.is_err() {
                error!("JsonSource shutting down: loader receiver dropped during send");
                return Err(Error::ChannelSendFailed);
            }
        }

        Ok(())
    }
}
