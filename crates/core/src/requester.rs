// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted requesters
//!
//! A requester issues its requests in order, then its releases, sleeping a
//! fixed delay after each step so interleavings with other requesters are
//! observable. It stops for good the first time a call fails.

use crate::coordination::{ProcessId, ResourceManager};
use crate::error::CoordinatorError;
use crate::events::Event;
use crate::vector::ResourceVector;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ordered request and release vectors
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub requests: Vec<ResourceVector>,
    pub releases: Vec<ResourceVector>,
}

impl Script {
    pub fn new(requests: Vec<ResourceVector>, releases: Vec<ResourceVector>) -> Self {
        Self { requests, releases }
    }
}

/// How a requester's script ended
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum RequesterOutcome {
    /// Every request granted and every release performed
    Completed,
    /// A request was cancelled because the process was aborted
    Aborted,
    /// A call was rejected (claim exceeded, halted manager, ...)
    Failed(String),
}

impl RequesterOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequesterOutcome::Completed => "completed",
            RequesterOutcome::Aborted => "aborted",
            RequesterOutcome::Failed(_) => "failed",
        }
    }
}

impl std::fmt::Display for RequesterOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequesterOutcome::Failed(reason) => write!(f, "failed: {}", reason),
            other => f.write_str(other.as_str()),
        }
    }
}

/// A client process driving a fixed script against the manager
#[derive(Clone, Debug)]
pub struct Requester {
    pid: ProcessId,
    script: Script,
    delay: Duration,
}

impl Requester {
    pub fn new(pid: ProcessId, script: Script) -> Self {
        Self {
            pid,
            script,
            delay: Duration::from_millis(500),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn pid(&self) -> &ProcessId {
        &self.pid
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Run the script to completion on the calling thread
    ///
    /// Blocks inside `request` while resources are unavailable. Never retries.
    pub fn run(&self, manager: &ResourceManager) -> RequesterOutcome {
        let span = tracing::info_span!("requester", pid = %self.pid);
        let _guard = span.enter();

        match self.play(manager) {
            Ok(()) => RequesterOutcome::Completed,
            Err(e) => {
                manager.emit(Event::RequesterStopped {
                    pid: self.pid.clone(),
                    reason: e.to_string(),
                });
                match e {
                    CoordinatorError::Aborted(_) => RequesterOutcome::Aborted,
                    other => RequesterOutcome::Failed(other.to_string()),
                }
            }
        }
    }

    fn play(&self, manager: &ResourceManager) -> Result<(), CoordinatorError> {
        for request in &self.script.requests {
            manager.request(&self.pid, request)?;
            std::thread::sleep(self.delay);
        }
        for release in &self.script.releases {
            manager.release(&self.pid, release)?;
            std::thread::sleep(self.delay);
        }
        // Releases on an aborted process are no-ops; only a live finish counts.
        if !manager.finish(&self.pid)? {
            return Err(CoordinatorError::Aborted(self.pid.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "requester_tests.rs"]
mod tests;
