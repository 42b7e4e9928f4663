use common::error::Error;
use common::types::{Account, Transaction};
use tracing::debug;

use crate::csr::SuccessorIndex;

/// Read-only summary of a graph's size and connectivity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphStats {
    pub num_accounts: usize,
    pub num_transactions: usize,
    pub num_edges: usize,
    /// `num_edges / N²`.
    pub edge_density: f64,
}

/// Directed transaction graph over a fixed set of accounts.
///
/// Owns three things:
/// - `accounts`: one record per node, indexed by id in `[0, N)`.
/// - `transactions`: append-only, order-preserving log of accepted payments.
/// - `adjacency`: row-major `N×N` count matrix where `adjacency[i * N + j]`
///   is the number of accepted transactions `i -> j`.
///
/// The matrix is the presence/weight oracle for both cycle finders and is
/// never decremented.
#[derive(Debug, Clone)]
pub struct TransactionGraph {
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    adjacency: Vec<u32>,
}

impl TransactionGraph {
    /// Creates a graph of `num_accounts` synthetic accounts with room for
    /// `tx_capacity_hint` transactions. Both values are clamped to at least 1.
    pub fn new(num_accounts: usize, tx_capacity_hint: usize) -> Self {
        let accounts = (0..num_accounts.max(1)).map(Account::synthetic).collect();
        Self::from_accounts(accounts, tx_capacity_hint)
    }

    /// Creates a graph over externally supplied accounts.
    ///
    /// Account ids are reassigned by position so that the id-is-index rule
    /// holds. An empty list is replaced by a single synthetic account.
    pub fn from_accounts(accounts: Vec<Account>, tx_capacity_hint: usize) -> Self {
        let mut accounts: Vec<Account> = accounts
            .into_iter()
            .enumerate()
            .map(|(idx, acc)| {
                if acc.id() == idx {
                    acc
                } else {
                    Account::new(
                        idx,
                        acc.label().to_string(),
                        acc.account_number().to_string(),
                        acc.balance(),
                    )
                }
            })
            .collect();

        if accounts.is_empty() {
            accounts.push(Account::synthetic(0));
        }

        let n = accounts.len();
        Self {
            accounts,
            transactions: Vec::with_capacity(tx_capacity_hint.max(1)),
            adjacency: vec![0; n * n],
        }
    }

    /// Records a transaction, returning why it was rejected if it was.
    ///
    /// The log grows by doubling its capacity when full.
    ///
    /// # Errors
    /// - `Error::NodeIndexOutOfBounds` if either endpoint is not in `[0, N)`.
    /// - `Error::SelfTransaction` if `from == to`.
    pub fn try_add_transaction(
        &mut self,
        from: usize,
        to: usize,
        amount: f64,
        timestamp: i64,
    ) -> Result<(), Error> {
        let n = self.num_accounts();
        if from >= n {
            return Err(Error::NodeIndexOutOfBounds(from));
        }
        if to >= n {
            return Err(Error::NodeIndexOutOfBounds(to));
        }
        if from == to {
            return Err(Error::SelfTransaction(from));
        }

        if self.transactions.len() == self.transactions.capacity() {
            let additional = self.transactions.capacity().max(1);
            self.transactions.reserve_exact(additional);
        }

        self.transactions
            .push(Transaction::new(from, to, amount, timestamp));
        self.adjacency[from * n + to] += 1;

        Ok(())
    }

    /// Records a transaction; invalid input is dropped without signalling.
    ///
    /// Callers that need to know whether it was accepted can compare
    /// `stats().num_transactions` before and after, or use
    /// [`try_add_transaction`](Self::try_add_transaction).
    pub fn add_transaction(&mut self, from: usize, to: usize, amount: f64, timestamp: i64) {
        if let Err(e) = self.try_add_transaction(from, to, amount, timestamp) {
            debug!(from, to, error = %e, "transaction dropped");
        }
    }

    pub fn stats(&self) -> GraphStats {
        let n = self.num_accounts();
        let num_edges = self.num_edges();

        GraphStats {
            num_accounts: n,
            num_transactions: self.transactions.len(),
            num_edges,
            edge_density: num_edges as f64 / (n * n) as f64,
        }
    }

    pub fn num_accounts(&self) -> usize {
        self.accounts.len()
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn account(&self, id: usize) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Number of recorded transactions `from -> to`; zero for out-of-range ids.
    pub fn edge_weight(&self, from: usize, to: usize) -> u32 {
        let n = self.num_accounts();
        if from >= n || to >= n {
            return 0;
        }
        self.adjacency[from * n + to]
    }

    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.edge_weight(from, to) > 0
    }

    /// Row `from` of the adjacency matrix.
    pub fn row(&self, from: usize) -> &[u32] {
        let n = self.num_accounts();
        &self.adjacency[from * n..(from + 1) * n]
    }

    pub fn num_edges(&self) -> usize {
        self.adjacency.iter().filter(|&&count| count > 0).count()
    }

    /// Distinct successors per account, averaged over all accounts.
    pub fn average_out_degree(&self) -> f64 {
        self.num_edges() as f64 / self.num_accounts() as f64
    }

    /// Sum of edge multiplicities around the closed walk `cycle`.
    pub fn cycle_weight(&self, cycle: &[usize]) -> f64 {
        let k = cycle.len();
        (0..k)
            .map(|i| self.edge_weight(cycle[i], cycle[(i + 1) % k]) as f64)
            .sum()
    }

    /// Builds a compact successor index for traversal.
    pub fn successor_index(&self) -> SuccessorIndex {
        SuccessorIndex::from_graph(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_sizes() {
        let graph = TransactionGraph::new(0, 0);

        assert_eq!(graph.num_accounts(), 1);
        assert!(graph.transactions().is_empty());
        assert!(graph.transactions.capacity() >= 1);
    }

    #[test]
    fn accounts_are_indexed_by_id() {
        let graph = TransactionGraph::new(5, 10);

        for (idx, account) in graph.accounts().iter().enumerate() {
            assert_eq!(account.id(), idx);
        }
        assert_eq!(graph.account(3).map(Account::account_number), Some("ACC_000003"));
        assert!(graph.account(5).is_none());
    }

    #[test]
    fn from_accounts_reassigns_ids_by_position() {
        let accounts = vec![
            Account::new(10, "a".into(), "ACC_A".into(), 1.0),
            Account::new(20, "b".into(), "ACC_B".into(), 2.0),
        ];
        let graph = TransactionGraph::from_accounts(accounts, 4);

        assert_eq!(graph.account(1).map(Account::id), Some(1));
        assert_eq!(graph.account(1).map(Account::label), Some("b"));
        assert_eq!(graph.account(1).map(Account::balance), Some(2.0));
    }

    #[test]
    fn add_transaction_updates_log_and_matrix() {
        let mut graph = TransactionGraph::new(3, 2);
        graph.add_transaction(0, 1, 50.0, 1);
        graph.add_transaction(0, 1, 25.0, 2);
        graph.add_transaction(1, 2, 10.0, 3);

        assert_eq!(graph.transactions().len(), 3);
        assert_eq!(graph.edge_weight(0, 1), 2);
        assert_eq!(graph.edge_weight(1, 2), 1);
        assert_eq!(graph.edge_weight(1, 0), 0);
        assert_eq!(graph.transactions()[1], Transaction::new(0, 1, 25.0, 2));
    }

    #[test]
    fn transaction_log_doubles_when_full() {
        let mut graph = TransactionGraph::new(2, 1);
        graph.add_transaction(0, 1, 1.0, 0);
        let before = graph.transactions.capacity();

        graph.add_transaction(1, 0, 1.0, 1);

        assert!(graph.transactions.capacity() >= 2 * before);
        assert_eq!(graph.transactions().len(), 2);
    }

    #[test]
    fn self_transaction_is_rejected() {
        let mut graph = TransactionGraph::new(3, 4);

        assert_eq!(
            graph.try_add_transaction(1, 1, 5.0, 0),
            Err(Error::SelfTransaction(1))
        );
        graph.add_transaction(2, 2, 5.0, 0);

        assert_eq!(graph.edge_weight(1, 1), 0);
        assert_eq!(graph.edge_weight(2, 2), 0);
        assert!(graph.transactions().is_empty());
    }

    #[test]
    fn out_of_range_transaction_is_rejected() {
        let mut graph = TransactionGraph::new(3, 4);

        assert_eq!(
            graph.try_add_transaction(0, 3, 5.0, 0),
            Err(Error::NodeIndexOutOfBounds(3))
        );
        assert_eq!(
            graph.try_add_transaction(7, 0, 5.0, 0),
            Err(Error::NodeIndexOutOfBounds(7))
        );
        graph.add_transaction(9, 9, 5.0, 0);

        assert_eq!(graph.stats().num_transactions, 0);
    }

    #[test]
    fn stats_counts_distinct_edges() {
        let mut graph = TransactionGraph::new(4, 8);
        graph.add_transaction(0, 1, 1.0, 0);
        graph.add_transaction(0, 1, 1.0, 1);
        graph.add_transaction(1, 2, 1.0, 2);
        graph.add_transaction(2, 0, 1.0, 3);

        let stats = graph.stats();
        assert_eq!(stats.num_accounts, 4);
        assert_eq!(stats.num_transactions, 4);
        assert_eq!(stats.num_edges, 3);
        assert!((stats.edge_density - 3.0 / 16.0).abs() < f64::EPSILON);
        assert!((graph.average_out_degree() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn cycle_weight_sums_multiplicities() {
        let mut graph = TransactionGraph::new(3, 8);
        graph.add_transaction(0, 1, 1.0, 0);
        graph.add_transaction(0, 1, 1.0, 0);
        graph.add_transaction(1, 2, 1.0, 0);
        graph.add_transaction(2, 0, 1.0, 0);
        graph.add_transaction(2, 0, 1.0, 0);
        graph.add_transaction(2, 0, 1.0, 0);

        assert_eq!(graph.cycle_weight(&[0, 1, 2]), 6.0);
        assert_eq!(graph.cycle_weight(&[1, 2, 0]), 6.0);
    }
}
