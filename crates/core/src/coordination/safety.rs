// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Banker's Algorithm safety check
//!
//! Pure functions over a copy of the manager's records. A state is safe when
//! every live process can, in some order, obtain its full remaining need from
//! `work` and then return everything it holds.

use super::process::ProcessRecord;
use crate::vector::ResourceVector;

/// Result of a safety simulation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafetyReport {
    pub safe: bool,
    /// Table indices of live processes in the order they ran to completion
    pub sequence: Vec<usize>,
}

/// Check whether the current state is safe
pub fn check(available: &ResourceVector, records: &[ProcessRecord]) -> SafetyReport {
    let allocation: Vec<_> = records.iter().map(|r| r.allocation.clone()).collect();
    let need: Vec<_> = records.iter().map(|r| r.need.clone()).collect();
    simulate(available.clone(), records, &allocation, &need)
}

/// Check whether granting `request` to the process at `idx` leaves the state safe
///
/// Reports unsafe if `available` cannot cover the request or the request
/// exceeds the process's need, since such a grant could never happen.
pub fn check_grant(
    available: &ResourceVector,
    records: &[ProcessRecord],
    idx: usize,
    request: &ResourceVector,
) -> SafetyReport {
    let unsafe_report = SafetyReport {
        safe: false,
        sequence: Vec::new(),
    };

    let Some(work) = available.checked_sub(request) else {
        return unsafe_report;
    };

    let mut allocation: Vec<_> = records.iter().map(|r| r.allocation.clone()).collect();
    let mut need: Vec<_> = records.iter().map(|r| r.need.clone()).collect();

    let (Some(alloc_slot), Some(need_slot)) = (allocation.get_mut(idx), need.get_mut(idx)) else {
        return unsafe_report;
    };
    let Some(reduced) = need_slot.checked_sub(request) else {
        return unsafe_report;
    };
    *alloc_slot = alloc_slot.add(request);
    *need_slot = reduced;

    simulate(work, records, &allocation, &need)
}

/// Fixed-point pass: repeatedly finish any live process whose need fits in
/// `work`, returning its allocation, until a pass makes no progress.
fn simulate(
    mut work: ResourceVector,
    records: &[ProcessRecord],
    allocation: &[ResourceVector],
    need: &[ResourceVector],
) -> SafetyReport {
    let mut finish: Vec<bool> = records.iter().map(|r| !r.alive).collect();
    let mut sequence = Vec::new();

    let mut changed = true;
    while changed {
        changed = false;
        for p in 0..records.len() {
            if finish[p] || !work.covers(&need[p]) {
                continue;
            }
            work = work.add(&allocation[p]);
            finish[p] = true;
            sequence.push(p);
            changed = true;
        }
    }

    SafetyReport {
        safe: finish.iter().all(|&f| f),
        sequence,
    }
}

#[cfg(test)]
#[path = "safety_tests.rs"]
mod tests;
