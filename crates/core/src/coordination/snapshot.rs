// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Consistent copies of manager state

use super::graph::WaitForGraph;
use super::mode::Mode;
use super::process::{verify_records, ProcessId, ProcessRecord};
use super::safety::{self, SafetyReport};
use crate::vector::ResourceVector;
use serde::Serialize;

/// Manager state captured under its lock
#[derive(Clone, Debug, Serialize)]
pub struct ManagerSnapshot {
    pub mode: Mode,
    pub total: ResourceVector,
    pub available: ResourceVector,
    /// Records in registration order
    pub processes: Vec<ProcessRecord>,
    /// Set once an invariant breach has stopped the manager
    pub halted: Option<String>,
}

impl ManagerSnapshot {
    pub fn process(&self, id: &ProcessId) -> Option<&ProcessRecord> {
        self.processes.iter().find(|r| &r.id == id)
    }

    /// Check `available + sum(allocation) == total` and `need == max - allocation`
    pub fn verify(&self) -> Result<(), String> {
        verify_records(&self.total, &self.available, &self.processes)
    }

    pub fn wait_for_graph(&self) -> WaitForGraph {
        WaitForGraph::build(&self.processes, &self.available)
    }

    pub fn safety(&self) -> SafetyReport {
        safety::check(&self.available, &self.processes)
    }

    /// An order in which every live process can run to completion, if one exists
    pub fn safe_sequence(&self) -> Option<Vec<ProcessId>> {
        let report = self.safety();
        report.safe.then(|| {
            report
                .sequence
                .iter()
                .map(|&idx| self.processes[idx].id.clone())
                .collect()
        })
    }

    /// Processes currently blocked inside `request`
    pub fn waiting(&self) -> Vec<ProcessId> {
        self.processes
            .iter()
            .filter(|r| r.alive && r.waiting.is_some())
            .map(|r| r.id.clone())
            .collect()
    }
}

/// A cycle found in the wait-for graph and the state it was found in
#[derive(Clone, Debug)]
pub struct Deadlock {
    pub cycle: Vec<ProcessId>,
    pub snapshot: ManagerSnapshot,
}
