use std::fmt;
use std::time::Duration;

use crate::canonical::{canonicalize, rotate_to_min};
use crate::error::Error;

/// An account holder in the transaction graph.
///
/// The id doubles as the account's index in every per-node table, so accounts
/// are created once, in id order, and never removed. All fields are fixed at
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: usize,
    label: String,
    account_number: String,
    balance: f64,
}

impl Account {
    pub fn new(id: usize, label: String, account_number: String, balance: f64) -> Self {
        Self {
            id,
            label,
            account_number,
            balance,
        }
    }

    /// Builds an account with a generated label, account number and balance.
    ///
    /// The balance is derived from the id so that two graphs of the same size
    /// always carry the same accounts.
    pub fn synthetic(id: usize) -> Self {
        let balance = 10_000.0 + (id.wrapping_mul(7_919) % 90_000) as f64;
        Self::new(
            id,
            format!("user_{:04}", id),
            format!("ACC_{:06}", id),
            balance,
        )
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }
}

/// A single recorded payment `from -> to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transaction {
    pub from: usize,
    pub to: usize,
    pub amount: f64,
    pub timestamp: i64,
}

impl Transaction {
    pub fn new(from: usize, to: usize, amount: f64, timestamp: i64) -> Self {
        Self {
            from,
            to,
            amount,
            timestamp,
        }
    }
}

/// A closed walk of distinct accounts, `c[0] -> c[1] -> ... -> c[k-1] -> c[0]`.
///
/// Fields:
/// - `nodes`: the walk, rotated so the smallest id comes first. Traversal
///   direction is kept, so consecutive ids are always real edges.
/// - `total_amount`: structural weight of the ring, the sum of edge
///   multiplicities (transaction counts) along the walk. It is not a sum of
///   transaction amounts.
/// - `canonical`: the rotation/reflection representative used for equality.
#[derive(Debug, Clone, PartialEq)]
pub struct FraudCycle {
    nodes: Vec<usize>,
    total_amount: f64,
    canonical: Vec<usize>,
}

impl FraudCycle {
    /// Validates and normalizes a cycle.
    ///
    /// # Errors
    /// Returns `Error::CycleTooShort` for fewer than three accounts and
    /// `Error::RepeatedNode` if an account appears twice.
    pub fn new(path: &[usize], total_amount: f64) -> Result<Self, Error> {
        if path.len() < 3 {
            return Err(Error::CycleTooShort(path.len()));
        }

        for (i, id) in path.iter().enumerate() {
            if path[i + 1..].contains(id) {
                return Err(Error::RepeatedNode(*id));
            }
        }

        Ok(Self {
            nodes: rotate_to_min(path),
            total_amount,
            canonical: canonicalize(path),
        })
    }

    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a valid cycle holds at least three accounts.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }

    pub fn canonical(&self) -> &[usize] {
        &self.canonical
    }

    /// The minimum account id on the cycle, used to group cycles into subnetworks.
    pub fn root(&self) -> usize {
        self.canonical[0]
    }
}

impl fmt::Display for FraudCycle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for id in &self.nodes {
            write!(f, "{} -> ", id)?;
        }
        write!(f, "{}", self.nodes[0])
    }
}

/// Run metrics reported by a cycle finder alongside its results.
///
/// `budget_exhausted` marks a degraded run: the search stopped early, so
/// `cycles_found` is a lower bound rather than the full count.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AlgoStats {
    pub execution_time: Duration,
    pub cycles_found: usize,
    pub nodes_visited: usize,
    pub budget_exhausted: bool,
}
