// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Playing a scenario out
//!
//! Requesters run on tokio's blocking pool, since `request` parks the calling
//! thread. In detection mode a watcher task runs alongside them. Requesters
//! still blocked at the deadline (or on cancellation) are aborted by the runner
//! so every thread exits.

use super::config::{RunConfig, Scenario, ScenarioError};
use crate::coordination::{ManagerSnapshot, Mode, ProcessId, ResourceManager};
use crate::error::CoordinatorError;
use crate::events::EventSink;
use crate::requester::{Requester, RequesterOutcome};
use crate::watcher::DeadlockWatcher;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinSet;

/// Errors that stop a run before it can report
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error("coordinator error: {0}")]
    Coordinator(#[from] CoordinatorError),

    #[error("task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Why the runner stopped waiting on its own
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stall {
    /// Requesters were still running at the deadline
    Deadline,
    /// The run was cancelled from outside
    Cancelled,
}

/// How one process's script ended
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProcessOutcome {
    pub pid: ProcessId,
    pub outcome: RequesterOutcome,
}

/// Everything a finished run reports
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub scenario: String,
    pub mode: Mode,
    /// One entry per process, in scenario order
    pub outcomes: Vec<ProcessOutcome>,
    /// Processes aborted by the watcher
    pub victims: Vec<ProcessId>,
    pub stall: Option<Stall>,
    /// Cycle confirmed at teardown, if the stall was a deadlock
    pub deadlock: Option<Vec<ProcessId>>,
    pub elapsed_ms: u64,
    pub snapshot: ManagerSnapshot,
}

impl RunReport {
    pub fn count(&self, status: &str) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.outcome.as_str() == status)
            .count()
    }

    /// Every script ran to completion
    pub fn all_completed(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| o.outcome == RequesterOutcome::Completed)
    }
}

/// Run `scenario` with `config` applied, reporting events to `events`
pub async fn run_scenario(
    scenario: &Scenario,
    config: RunConfig,
    events: Arc<dyn EventSink>,
) -> Result<RunReport, RunError> {
    let scenario = config.apply(scenario);
    scenario.validate()?;
    let mode = scenario.mode();
    let started = Instant::now();

    tracing::info!(
        scenario = %scenario.name,
        %mode,
        total = %scenario.total,
        processes = scenario.processes.len(),
        "starting scenario"
    );

    let manager = Arc::new(
        ResourceManager::new(scenario.total.clone(), mode, events)
            .with_recheck_interval(scenario.recheck_interval),
    );
    for process in &scenario.processes {
        manager.register(process.id.clone(), process.max.clone())?;
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let watcher = mode.uses_watcher().then(|| {
        let watcher = DeadlockWatcher::new(Arc::clone(&manager), scenario.watcher.clone());
        tokio::spawn(watcher.run(shutdown_rx))
    });

    let mut requesters = JoinSet::new();
    for process in &scenario.processes {
        let requester =
            Requester::new(process.id.clone(), process.script()).with_delay(scenario.step_delay);
        let manager = Arc::clone(&manager);
        requesters.spawn_blocking(move || {
            let outcome = requester.run(&manager);
            (requester.pid().clone(), outcome)
        });
    }

    let deadline = tokio::time::sleep(scenario.deadline);
    tokio::pin!(deadline);
    let mut cancel = config.cancel;
    let mut outcomes = HashMap::new();
    let mut stall = None;
    let mut deadlock = None;

    loop {
        tokio::select! {
            joined = requesters.join_next() => match joined {
                Some(joined) => {
                    let (pid, outcome) = joined?;
                    tracing::info!(%pid, %outcome, "requester finished");
                    outcomes.insert(pid, outcome);
                }
                None => break,
            },
            _ = &mut deadline, if stall.is_none() => {
                stall = Some(Stall::Deadline);
                deadlock = teardown(&manager, Stall::Deadline);
            }
            _ = cancelled(&mut cancel), if stall.is_none() => {
                stall = Some(Stall::Cancelled);
                deadlock = teardown(&manager, Stall::Cancelled);
            }
        }
    }

    // The watcher may already be gone; nothing to signal then.
    let _ = shutdown_tx.send(true);
    let victims = match watcher {
        Some(handle) => handle.await?,
        None => Vec::new(),
    };

    let outcomes = scenario
        .processes
        .iter()
        .map(|p| ProcessOutcome {
            pid: p.id.clone(),
            outcome: outcomes
                .remove(&p.id)
                .unwrap_or_else(|| RequesterOutcome::Failed("no outcome recorded".to_string())),
        })
        .collect();

    let report = RunReport {
        scenario: scenario.name.clone(),
        mode,
        outcomes,
        victims,
        stall,
        deadlock,
        elapsed_ms: started.elapsed().as_millis() as u64,
        snapshot: manager.snapshot(),
    };
    tracing::info!(
        scenario = %report.scenario,
        completed = report.count("completed"),
        aborted = report.count("aborted"),
        failed = report.count("failed"),
        victims = report.victims.len(),
        "scenario finished"
    );
    Ok(report)
}

/// Confirm any deadlock, then abort every live process so blocked threads exit
fn teardown(manager: &ResourceManager, stall: Stall) -> Option<Vec<ProcessId>> {
    let deadlock = manager.detect_cycle().map(|d| d.cycle);
    match (&deadlock, stall) {
        (Some(cycle), _) => tracing::warn!(?cycle, "deadlock confirmed"),
        (None, Stall::Deadline) => tracing::warn!("requesters still running at deadline"),
        (None, Stall::Cancelled) => tracing::info!("run cancelled"),
    }

    for pid in manager.live_processes() {
        if let Err(e) = manager.abort(&pid) {
            tracing::error!(%pid, error = %e, "teardown abort failed");
        }
    }
    deadlock
}

/// Resolves once `cancel` reads true; never resolves without a receiver
async fn cancelled(cancel: &mut Option<watch::Receiver<bool>>) {
    if let Some(rx) = cancel {
        if rx.wait_for(|flag| *flag).await.is_ok() {
            return;
        }
    }
    std::future::pending::<()>().await
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
