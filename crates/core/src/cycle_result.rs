use std::collections::HashSet;

use common::error::Error;
use common::types::FraudCycle;

/// Initial number of cycle slots reserved by [`CycleResult::new`].
pub const DEFAULT_CAPACITY: usize = 512;

/// Insertion-ordered, duplicate-free collection of discovered cycles.
///
/// Two cycles are duplicates when their canonical forms match, i.e. they
/// differ only by rotation or direction. The canonical keys of stored cycles
/// are indexed so that a duplicate check does not rescan the whole store.
#[derive(Debug, Clone, Default)]
pub struct CycleResult {
    cycles: Vec<FraudCycle>,
    seen: HashSet<Vec<usize>>,
}

impl CycleResult {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cycles: Vec::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
        }
    }

    /// Canonicalizes `path` and appends it unless an equal cycle is stored.
    ///
    /// Returns `Ok(true)` if the cycle was appended and `Ok(false)` if it was
    /// a duplicate. The backing storage may reallocate; hold indices, not
    /// references, across calls.
    ///
    /// # Errors
    /// Propagates `FraudCycle::new` validation errors for malformed paths.
    pub fn add(&mut self, path: &[usize], total_amount: f64) -> Result<bool, Error> {
        let cycle = FraudCycle::new(path, total_amount)?;
        Ok(self.insert(cycle))
    }

    /// Appends an already validated cycle unless an equal one is stored.
    pub fn insert(&mut self, cycle: FraudCycle) -> bool {
        if self.seen.contains(cycle.canonical()) {
            return false;
        }

        if self.cycles.len() == self.cycles.capacity() {
            let additional = self.cycles.capacity().max(1);
            self.cycles.reserve_exact(additional);
        }

        self.seen.insert(cycle.canonical().to_vec());
        self.cycles.push(cycle);
        true
    }

    pub fn contains(&self, path: &[usize]) -> bool {
        self.seen.contains(&common::canonical::canonicalize(path))
    }

    pub fn cycles(&self) -> &[FraudCycle] {
        &self.cycles
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FraudCycle> {
        self.cycles.iter()
    }

    /// Consumes the store, yielding the cycles in insertion order.
    pub fn into_cycles(self) -> Vec<FraudCycle> {
        self.cycles
    }
}

impl<'a> IntoIterator for &'a CycleResult {
    type Item = &'a FraudCycle;
    type IntoIter = std::slice::Iter<'a, FraudCycle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
