// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-process bookkeeping
//!
//! Records live in a dense table indexed by registration order, with a side
//! map from external id to index. Iteration order is registration order.

use crate::vector::ResourceVector;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::{Index, IndexMut};

/// External identifier of a requesting process
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub String);

impl ProcessId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProcessId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Bookkeeping for one registered process
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub id: ProcessId,
    /// Declared maximum claim, fixed at registration
    pub max: ResourceVector,
    /// Current grant
    pub allocation: ResourceVector,
    /// `max - allocation`
    pub need: ResourceVector,
    /// Set exactly while the process is blocked inside `request`
    pub waiting: Option<ResourceVector>,
    pub alive: bool,
}

impl ProcessRecord {
    pub fn new(id: ProcessId, max: ResourceVector) -> Self {
        Self {
            id,
            allocation: ResourceVector::zeros(max.len()),
            need: max.clone(),
            max,
            waiting: None,
            alive: true,
        }
    }

    /// Total units currently held across all resource types
    pub fn held(&self) -> u64 {
        self.allocation.total()
    }
}

/// Dense table of process records
#[derive(Clone, Debug, Default)]
pub struct ProcessTable {
    records: Vec<ProcessRecord>,
    index: HashMap<ProcessId, usize>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, returning its index; `None` if the id is taken
    pub fn insert(&mut self, record: ProcessRecord) -> Option<usize> {
        if self.index.contains_key(&record.id) {
            return None;
        }
        let idx = self.records.len();
        self.index.insert(record.id.clone(), idx);
        self.records.push(record);
        Some(idx)
    }

    pub fn index_of(&self, id: &ProcessId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn get(&self, idx: usize) -> Option<&ProcessRecord> {
        self.records.get(idx)
    }

    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ids of processes still alive, in registration order
    pub fn live_ids(&self) -> Vec<ProcessId> {
        self.records
            .iter()
            .filter(|r| r.alive)
            .map(|r| r.id.clone())
            .collect()
    }
}

impl Index<usize> for ProcessTable {
    type Output = ProcessRecord;

    fn index(&self, idx: usize) -> &ProcessRecord {
        &self.records[idx]
    }
}

impl IndexMut<usize> for ProcessTable {
    fn index_mut(&mut self, idx: usize) -> &mut ProcessRecord {
        &mut self.records[idx]
    }
}

/// Check the conservation and need identities over a set of records
///
/// Returns a description of the first breach found.
pub fn verify_records(
    total: &ResourceVector,
    available: &ResourceVector,
    records: &[ProcessRecord],
) -> Result<(), String> {
    let mut accounted = available.clone();
    for record in records {
        if !record.alive && !record.allocation.is_zero() {
            return Err(format!(
                "{} is not alive but still holds {}",
                record.id, record.allocation
            ));
        }
        if !record.max.covers(&record.allocation) {
            return Err(format!(
                "{} holds {} beyond its maximum {}",
                record.id, record.allocation, record.max
            ));
        }
        if record.alive && record.max.checked_sub(&record.allocation).as_ref() != Some(&record.need)
        {
            return Err(format!(
                "{} need {} != max {} - allocation {}",
                record.id, record.need, record.max, record.allocation
            ));
        }
        accounted = accounted.add(&record.allocation);
    }
    if &accounted != total {
        return Err(format!(
            "available {} plus allocations gives {}, expected total {}",
            available, accounted, total
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
