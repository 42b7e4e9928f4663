use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc::Sender;
use tracing::{debug, info};

use super::config::GeneratorConfig;
use super::error::Error;
use super::types::TransactionSource;
use common::types::{Account, Transaction};

/// Produces a synthetic banking dataset with injected fraud rings.
///
/// The transaction budget is split in two: first, rings over distinct
/// random accounts are injected until `ring_ratio` of the budget is used,
/// then the rest is filled with random payments between distinct accounts.
/// A fixed `seed` makes the dataset reproducible.
pub struct SyntheticSource {
    config: GeneratorConfig,
    batch_size: usize,
    rng: SmallRng,
    base_timestamp: i64,
}

impl SyntheticSource {
    pub fn new(config: GeneratorConfig, batch_size: usize) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let base_timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs() as i64);

        SyntheticSource {
            config,
            batch_size: batch_size.max(1),
            rng,
            base_timestamp,
        }
    }

    fn num_users(&self) -> usize {
        self.config.num_users.max(1)
    }

    /// Generates the full transaction list.
    pub fn generate_transactions(&mut self) -> Vec<Transaction> {
        let num_users = self.num_users();
        let total = self.config.num_transactions;
        let ring_budget = (total as f64 * self.config.ring_ratio) as usize;

        let mut txs: Vec<Transaction> = Vec::with_capacity(total);
        let mut rings = 0usize;

        // Rings need three distinct accounts.
        while num_users >= 3 && txs.len() < ring_budget.min(total) {
            let len = self
                .rng
                .random_range(self.config.min_ring_len..=self.config.max_ring_len)
                .min(num_users);
            let members = sample(&mut self.rng, num_users, len).into_vec();

            for i in 0..len {
                if txs.len() >= total {
                    break;
                }
                let amount = self.rng.random_range(100.0..5_100.0);
                let ts = self.base_timestamp + txs.len() as i64;
                txs.push(Transaction::new(members[i], members[(i + 1) % len], amount, ts));
            }
            rings += 1;
        }

        // Filler payments need two distinct accounts.
        while num_users >= 2 && txs.len() < total {
            let from = self.rng.random_range(0..num_users);
            let to = self.rng.random_range(0..num_users);
            if from == to {
                continue;
            }
            let amount = self.rng.random_range(10.0..3_010.0);
            let ts = self.base_timestamp + txs.len() as i64;
            txs.push(Transaction::new(from, to, amount, ts));
        }

        debug!(rings, transactions = txs.len(), "synthetic dataset generated");
        txs
    }
}

#[async_trait]
impl TransactionSource for SyntheticSource {
    fn accounts(&self) -> Vec<Account> {
        (0..self.num_users()).map(Account::synthetic).collect()
    }

    fn expected_transactions(&self) -> usize {
        self.config.num_transactions
    }

    /// Generates the dataset and sends it in batches of `batch_size`.
    /// Exits with an error if the receiver is dropped mid-stream.
    async fn run_stream(mut self, sender: Sender<Vec<Transaction>>) -> Result<(), Error> {
        let all_txs = self.generate_transactions();
        let mut sent = 0;

        for chunk in all_txs.chunks(self.batch_size) {
            if sender.send(chunk.to_vec()).await.is_err() {
                debug!("Generator shutting down: loader receiver dropped.");
                return Err(Error::ChannelSendFailed);
            }
            sent += chunk.len();
        }

        info!(transactions = sent, "synthetic source finished");
        Ok(())
    }
}
