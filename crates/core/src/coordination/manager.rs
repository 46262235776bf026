// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource manager monitor
//!
//! Owns `total`, `available` and the process table behind a single mutex.
//! `request` is the only operation that suspends; it waits on a condition
//! variable with a bounded timeout and re-checks its admission rule on every
//! wake. Every mutation is followed by an invariant check, and the first breach
//! halts the manager for good.

use super::mode::{Mode, WaitReason};
use super::process::{verify_records, ProcessId, ProcessRecord, ProcessTable};
use super::safety;
use super::snapshot::{Deadlock, ManagerSnapshot};
use crate::error::CoordinatorError;
use crate::events::{Event, EventSink};
use crate::vector::ResourceVector;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Duration;

/// Default bound on a single condition-variable wait
pub const DEFAULT_RECHECK_INTERVAL: Duration = Duration::from_millis(500);

struct ManagerState {
    available: ResourceVector,
    table: ProcessTable,
    halted: Option<String>,
}

impl ManagerState {
    fn ensure_running(&self) -> Result<(), CoordinatorError> {
        match &self.halted {
            Some(detail) => Err(CoordinatorError::InvariantViolation(detail.clone())),
            None => Ok(()),
        }
    }

    fn index_of(&self, pid: &ProcessId) -> Result<usize, CoordinatorError> {
        self.table
            .index_of(pid)
            .ok_or_else(|| CoordinatorError::UnknownProcess(pid.clone()))
    }
}

/// How a process leaves the live set
#[derive(Clone, Copy)]
enum Retirement {
    Aborted,
    Finished,
}

/// Monitor coordinating requesters over a shared resource pool
pub struct ResourceManager {
    mode: Mode,
    total: ResourceVector,
    recheck_interval: Duration,
    state: Mutex<ManagerState>,
    wake: Condvar,
    events: Arc<dyn EventSink>,
}

impl ResourceManager {
    pub fn new(total: ResourceVector, mode: Mode, events: Arc<dyn EventSink>) -> Self {
        Self {
            mode,
            state: Mutex::new(ManagerState {
                available: total.clone(),
                table: ProcessTable::new(),
                halted: None,
            }),
            total,
            recheck_interval: DEFAULT_RECHECK_INTERVAL,
            wake: Condvar::new(),
            events,
        }
    }

    pub fn with_recheck_interval(mut self, interval: Duration) -> Self {
        self.recheck_interval = interval;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn total(&self) -> &ResourceVector {
        &self.total
    }

    pub fn recheck_interval(&self) -> Duration {
        self.recheck_interval
    }

    pub(crate) fn emit(&self, event: Event) {
        self.events.emit(&event);
    }

    fn lock(&self) -> MutexGuard<'_, ManagerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_len(&self, what: &str, vector: &ResourceVector) -> Result<(), CoordinatorError> {
        if vector.len() != self.total.len() {
            return Err(CoordinatorError::InvalidArgument(format!(
                "{} {} has {} resource types, expected {}",
                what,
                vector,
                vector.len(),
                self.total.len()
            )));
        }
        Ok(())
    }

    /// Run a mutation and re-verify the invariants, halting on any breach
    fn apply<F>(&self, state: &mut ManagerState, mutate: F) -> Result<(), CoordinatorError>
    where
        F: FnOnce(&mut ManagerState) -> Result<(), String>,
    {
        let result = mutate(state)
            .and_then(|()| verify_records(&self.total, &state.available, state.table.records()));
        result.map_err(|detail| self.halt(state, detail))
    }

    fn halt(&self, state: &mut ManagerState, detail: String) -> CoordinatorError {
        if state.halted.is_none() {
            tracing::error!(%detail, "halting resource manager");
            state.halted = Some(detail.clone());
            self.emit(Event::InvariantViolated {
                detail: detail.clone(),
            });
            self.wake.notify_all();
        }
        CoordinatorError::InvariantViolation(detail)
    }

    // === Client API ===

    /// Register a process with its maximum claim
    pub fn register(
        &self,
        pid: ProcessId,
        max_claim: ResourceVector,
    ) -> Result<(), CoordinatorError> {
        let mut state = self.lock();
        state.ensure_running()?;
        self.check_len("maximum claim", &max_claim)?;
        if !self.total.covers(&max_claim) {
            return Err(CoordinatorError::InvalidArgument(format!(
                "maximum claim {} of {} exceeds total {}",
                max_claim, pid, self.total
            )));
        }

        let record = ProcessRecord::new(pid.clone(), max_claim.clone());
        if state.table.insert(record).is_none() {
            return Err(CoordinatorError::AlreadyRegistered(pid));
        }

        self.emit(Event::ProcessRegistered {
            pid,
            max_claim,
            total: self.total.clone(),
        });
        Ok(())
    }

    /// Block until `request` can be granted to `pid`, or `pid` is aborted
    pub fn request(
        &self,
        pid: &ProcessId,
        request: &ResourceVector,
    ) -> Result<(), CoordinatorError> {
        let mut state = self.lock();
        state.ensure_running()?;
        let idx = state.index_of(pid)?;
        self.check_len("request", request)?;

        let need = state.table[idx].need.clone();
        self.emit(Event::RequestIssued {
            pid: pid.clone(),
            request: request.clone(),
            need: need.clone(),
            available: state.available.clone(),
        });

        if !need.covers(request) {
            self.emit(Event::RequestRejected {
                pid: pid.clone(),
                request: request.clone(),
                need: need.clone(),
            });
            return Err(CoordinatorError::ClaimExceeded {
                pid: pid.clone(),
                request: request.clone(),
                need,
            });
        }

        let mut last_reason = None;
        loop {
            if let Err(e) = state.ensure_running() {
                state.table[idx].waiting = None;
                return Err(e);
            }

            if !state.table[idx].alive {
                state.table[idx].waiting = None;
                self.emit(Event::RequestCancelled {
                    pid: pid.clone(),
                    request: request.clone(),
                });
                return Err(CoordinatorError::Aborted(pid.clone()));
            }

            let Some(reason) = self.admission(&state, idx, request) else {
                self.grant(&mut state, idx, request)?;
                return Ok(());
            };

            state.table[idx].waiting = Some(request.clone());
            if last_reason != Some(reason) {
                self.emit(Event::RequestPending {
                    pid: pid.clone(),
                    request: request.clone(),
                    reason,
                });
                last_reason = Some(reason);
            } else {
                tracing::debug!(%pid, %request, %reason, "still waiting");
            }

            state = match self.wake.wait_timeout(state, self.recheck_interval) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }

    /// Grant `request` if it is admissible right now, without waiting
    ///
    /// Returns `Ok(false)` where `request` would block.
    pub fn try_request(
        &self,
        pid: &ProcessId,
        request: &ResourceVector,
    ) -> Result<bool, CoordinatorError> {
        let mut state = self.lock();
        state.ensure_running()?;
        let idx = state.index_of(pid)?;
        self.check_len("request", request)?;

        if !state.table[idx].alive {
            return Err(CoordinatorError::Aborted(pid.clone()));
        }
        let need = state.table[idx].need.clone();
        if !need.covers(request) {
            return Err(CoordinatorError::ClaimExceeded {
                pid: pid.clone(),
                request: request.clone(),
                need,
            });
        }

        if self.admission(&state, idx, request).is_some() {
            return Ok(false);
        }
        self.grant(&mut state, idx, request)?;
        Ok(true)
    }

    /// Return up to `release` units; anything beyond the current holding is ignored
    pub fn release(
        &self,
        pid: &ProcessId,
        release: &ResourceVector,
    ) -> Result<(), CoordinatorError> {
        let mut state = self.lock();
        state.ensure_running()?;
        let idx = state.index_of(pid)?;
        self.check_len("release", release)?;

        let released = release.min(&state.table[idx].allocation);
        self.apply(&mut state, |s| {
            let record = &mut s.table[idx];
            record.allocation = record
                .allocation
                .checked_sub(&released)
                .ok_or("allocation underflow on release")?;
            record.need = record.need.add(&released);
            s.available = s.available.add(&released);
            Ok(())
        })?;

        let record = &state.table[idx];
        self.emit(Event::ResourcesReleased {
            pid: pid.clone(),
            released,
            allocation: record.allocation.clone(),
            need: record.need.clone(),
            available: state.available.clone(),
        });
        self.wake.notify_all();
        Ok(())
    }

    /// Forcibly reclaim everything `pid` holds and cancel any pending request
    ///
    /// Idempotent: a process that is no longer alive is left untouched.
    pub fn abort(&self, pid: &ProcessId) -> Result<(), CoordinatorError> {
        self.retire(pid, Retirement::Aborted).map(|_| ())
    }

    /// Mark `pid` as done, returning anything it still holds
    ///
    /// Returns `Ok(false)` when `pid` was already retired, e.g. aborted as a
    /// victim before it got here.
    pub fn finish(&self, pid: &ProcessId) -> Result<bool, CoordinatorError> {
        self.retire(pid, Retirement::Finished)
    }

    /// Retire `pid`, reporting whether it was still alive
    fn retire(&self, pid: &ProcessId, how: Retirement) -> Result<bool, CoordinatorError> {
        let mut state = self.lock();
        state.ensure_running()?;
        let idx = state.index_of(pid)?;
        if !state.table[idx].alive {
            return Ok(false);
        }

        let reclaimed = state.table[idx].allocation.clone();
        self.apply(&mut state, |s| {
            s.available = s.available.add(&reclaimed);
            let record = &mut s.table[idx];
            record.allocation = ResourceVector::zeros(record.max.len());
            record.need = record.max.clone();
            record.waiting = None;
            record.alive = false;
            Ok(())
        })?;

        let available = state.available.clone();
        self.emit(match how {
            Retirement::Aborted => Event::ProcessAborted {
                pid: pid.clone(),
                reclaimed,
                available,
            },
            Retirement::Finished => Event::ProcessFinished {
                pid: pid.clone(),
                reclaimed,
                available,
            },
        });
        self.wake.notify_all();
        Ok(true)
    }

    // === Views ===

    /// Copy of the current state, taken under the lock
    pub fn snapshot(&self) -> ManagerSnapshot {
        let state = self.lock();
        ManagerSnapshot {
            mode: self.mode,
            total: self.total.clone(),
            available: state.available.clone(),
            processes: state.table.records().to_vec(),
            halted: state.halted.clone(),
        }
    }

    /// Build the wait-for graph from a consistent snapshot and look for a cycle
    pub fn detect_cycle(&self) -> Option<Deadlock> {
        let snapshot = self.snapshot();
        let cycle = snapshot.wait_for_graph().find_cycle()?;
        self.emit(Event::CycleDetected {
            cycle: cycle.clone(),
        });
        Some(Deadlock { cycle, snapshot })
    }

    pub fn live_processes(&self) -> Vec<ProcessId> {
        self.lock().table.live_ids()
    }

    pub fn is_alive(&self, pid: &ProcessId) -> Result<bool, CoordinatorError> {
        let state = self.lock();
        let idx = state.index_of(pid)?;
        Ok(state.table[idx].alive)
    }

    pub fn is_halted(&self) -> bool {
        self.lock().halted.is_some()
    }

    // === Internals ===

    /// Why `request` cannot be granted right now, or `None` if it can
    fn admission(
        &self,
        state: &ManagerState,
        idx: usize,
        request: &ResourceVector,
    ) -> Option<WaitReason> {
        if !state.available.covers(request) {
            return Some(WaitReason::Insufficient);
        }
        if self.mode.uses_safety_check() {
            let report = safety::check_grant(&state.available, state.table.records(), idx, request);
            self.emit(Event::SafetyChecked {
                pid: state.table[idx].id.clone(),
                request: request.clone(),
                safe: report.safe,
            });
            if !report.safe {
                return Some(WaitReason::Unsafe);
            }
        }
        None
    }

    fn grant(
        &self,
        state: &mut ManagerState,
        idx: usize,
        request: &ResourceVector,
    ) -> Result<(), CoordinatorError> {
        self.apply(state, |s| {
            s.available = s
                .available
                .checked_sub(request)
                .ok_or("available underflow on grant")?;
            let record = &mut s.table[idx];
            record.need = record
                .need
                .checked_sub(request)
                .ok_or("need underflow on grant")?;
            record.allocation = record.allocation.add(request);
            record.waiting = None;
            Ok(())
        })?;

        let record = &state.table[idx];
        self.emit(Event::RequestGranted {
            pid: record.id.clone(),
            request: request.clone(),
            allocation: record.allocation.clone(),
            need: record.need.clone(),
            available: state.available.clone(),
        });
        self.wake.notify_all();
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn corrupt_available(&self, available: ResourceVector) {
        self.lock().available = available;
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
