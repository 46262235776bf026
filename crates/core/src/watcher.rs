// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic deadlock detection and recovery
//!
//! Each tick builds the wait-for graph from a consistent snapshot, and when a
//! cycle is found aborts the member holding the most resources.

use crate::coordination::{ManagerSnapshot, ProcessId, ResourceManager};
use crate::error::CoordinatorError;
use crate::events::Event;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Configuration for the watcher task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// How often to scan for cycles
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    /// Abort the chosen victim; when false cycles are only reported
    pub auto_resolve: bool,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            auto_resolve: true,
        }
    }
}

impl WatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_auto_resolve(mut self, enabled: bool) -> Self {
        self.auto_resolve = enabled;
        self
    }
}

/// Outcome of a tick that found a cycle
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub cycle: Vec<ProcessId>,
    pub victim: ProcessId,
    /// Whether the victim was actually aborted
    pub aborted: bool,
}

/// Pick the cycle member with the largest total allocation
///
/// Ties go to the member that appears first in `cycle`.
pub fn choose_victim(cycle: &[ProcessId], snapshot: &ManagerSnapshot) -> Option<ProcessId> {
    let mut best: Option<(&ProcessId, u64)> = None;
    for pid in cycle {
        let held = snapshot.process(pid).map(|r| r.held()).unwrap_or(0);
        match best {
            Some((_, top)) if held <= top => {}
            _ => best = Some((pid, held)),
        }
    }
    best.map(|(pid, _)| pid.clone())
}

/// Background task resolving deadlocks on a shared manager
pub struct DeadlockWatcher {
    manager: Arc<ResourceManager>,
    config: WatcherConfig,
}

impl DeadlockWatcher {
    pub fn new(manager: Arc<ResourceManager>, config: WatcherConfig) -> Self {
        Self { manager, config }
    }

    pub fn config(&self) -> &WatcherConfig {
        &self.config
    }

    /// Run a single detection pass
    ///
    /// Returns `None` when the wait-for graph has no cycle.
    pub fn tick(&self) -> Result<Option<Resolution>, CoordinatorError> {
        let Some(deadlock) = self.manager.detect_cycle() else {
            return Ok(None);
        };
        let Some(victim) = choose_victim(&deadlock.cycle, &deadlock.snapshot) else {
            return Ok(None);
        };

        let allocation = deadlock
            .snapshot
            .process(&victim)
            .map(|r| r.allocation.clone())
            .unwrap_or_default();
        tracing::warn!(victim = %victim, %allocation, "deadlock victim chosen");
        self.manager.emit(Event::VictimChosen {
            pid: victim.clone(),
            allocation,
        });

        if self.config.auto_resolve {
            self.manager.abort(&victim)?;
        }

        Ok(Some(Resolution {
            cycle: deadlock.cycle,
            victim,
            aborted: self.config.auto_resolve,
        }))
    }

    /// Tick every interval until `shutdown` flips to true
    ///
    /// Returns the victims aborted along the way. Stops early if the manager halts.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Vec<ProcessId> {
        let period = self.config.interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut victims = Vec::new();
        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {
                    match self.tick() {
                        Ok(Some(resolution)) if resolution.aborted => {
                            victims.push(resolution.victim);
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::error!(error = %e, "deadlock watcher stopping");
                            break;
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        tracing::debug!(victims = victims.len(), "deadlock watcher stopped");
        victims
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
