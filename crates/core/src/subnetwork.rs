use std::collections::HashMap;

use super::cycle_result::CycleResult;
use common::types::FraudCycle;

/// Cycles sharing the same root (minimum account id), borrowed from a
/// [`CycleResult`].
#[derive(Debug, Clone)]
pub struct Subnetwork<'a> {
    pub root: usize,
    pub cycles: Vec<&'a FraudCycle>,
}

/// Groups the cycles of `result` by root account.
///
/// Groups appear in the order their root is first seen; within a group,
/// cycles keep their order in `result`. Every cycle lands in exactly one
/// group.
pub fn group_subnetworks(result: &CycleResult) -> Vec<Subnetwork<'_>> {
    let mut groups: Vec<Subnetwork<'_>> = Vec::new();
    let mut slot_by_root: HashMap<usize, usize> = HashMap::new();

    for cycle in result {
        let root = cycle.root();
        let slot = *slot_by_root.entry(root).or_insert_with(|| {
            groups.push(Subnetwork {
                root,
                cycles: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].cycles.push(cycle);
    }

    groups
}
