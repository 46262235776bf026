// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario documents
//!
//! A scenario names the resource pool, the processes competing for it and the
//! script each one plays. Parsing and validation happen together so that a
//! `Scenario` in hand is always runnable.

use crate::coordination::{safety, Mode, ProcessId, ProcessRecord, SafetyReport};
use crate::requester::Script;
use crate::vector::ResourceVector;
use crate::watcher::WatcherConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading a scenario
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML syntax error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid scenario: {0}")]
    Invalid(String),

    #[error("unknown built-in scenario '{0}'")]
    UnknownBuiltin(String),
}

fn default_step_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_recheck_interval() -> Duration {
    crate::coordination::DEFAULT_RECHECK_INTERVAL
}

fn default_deadline() -> Duration {
    Duration::from_secs(10)
}

/// One competing process and its script
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessSpec {
    pub id: ProcessId,
    /// Maximum claim declared at registration
    pub max: ResourceVector,
    #[serde(default)]
    pub requests: Vec<ResourceVector>,
    #[serde(default)]
    pub releases: Vec<ResourceVector>,
}

impl ProcessSpec {
    pub fn script(&self) -> Script {
        Script::new(self.requests.clone(), self.releases.clone())
    }
}

/// A runnable resource-contention scenario
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub total: ResourceVector,
    /// Discipline to run under; `None` means no prevention
    #[serde(default)]
    pub mode: Option<Mode>,
    /// Pause after every request and release
    #[serde(default = "default_step_delay", with = "humantime_serde")]
    pub step_delay: Duration,
    /// Upper bound on a single wait inside `request`
    #[serde(default = "default_recheck_interval", with = "humantime_serde")]
    pub recheck_interval: Duration,
    /// How long the runner waits for requesters before tearing down
    #[serde(default = "default_deadline", with = "humantime_serde")]
    pub deadline: Duration,
    #[serde(default)]
    pub watcher: WatcherConfig,
    #[serde(default, rename = "process")]
    pub processes: Vec<ProcessSpec>,
}

impl Scenario {
    /// Read, parse and validate a scenario file
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_scenario(&content)
    }

    pub fn mode(&self) -> Mode {
        self.mode.unwrap_or_default()
    }

    pub fn process(&self, id: &ProcessId) -> Option<&ProcessSpec> {
        self.processes.iter().find(|p| &p.id == id)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        let invalid = |msg: String| Err(ScenarioError::Invalid(msg));

        if self.name.trim().is_empty() {
            return invalid("name must not be empty".to_string());
        }
        if self.total.is_empty() {
            return invalid("total must list at least one resource type".to_string());
        }
        if self.processes.is_empty() {
            return invalid("at least one [[process]] is required".to_string());
        }
        if self.recheck_interval.is_zero() {
            return invalid("recheck_interval must be greater than zero".to_string());
        }
        if self.watcher.interval.is_zero() {
            return invalid("watcher.interval must be greater than zero".to_string());
        }

        let width = self.total.len();
        let mut seen = HashSet::new();
        for process in &self.processes {
            let id = &process.id;
            if id.as_str().trim().is_empty() {
                return invalid("process id must not be empty".to_string());
            }
            if !seen.insert(id) {
                return invalid(format!("duplicate process id '{}'", id));
            }
            if process.max.len() != width {
                return invalid(format!(
                    "{}: max {} has {} resource types, total has {}",
                    id,
                    process.max,
                    process.max.len(),
                    width
                ));
            }
            if !self.total.covers(&process.max) {
                return invalid(format!(
                    "{}: max {} exceeds total {}",
                    id, process.max, self.total
                ));
            }
            let steps = process
                .requests
                .iter()
                .map(|v| ("request", v))
                .chain(process.releases.iter().map(|v| ("release", v)));
            for (kind, vector) in steps {
                if vector.len() != width {
                    return invalid(format!(
                        "{}: {} {} has {} resource types, total has {}",
                        id,
                        kind,
                        vector,
                        vector.len(),
                        width
                    ));
                }
            }
            for request in &process.requests {
                if !process.max.covers(request) {
                    return invalid(format!(
                        "{}: request {} exceeds max {}",
                        id, request, process.max
                    ));
                }
            }
        }
        Ok(())
    }

    /// Safety of the state before any request has been made
    pub fn initial_safety(&self) -> SafetyReport {
        let records: Vec<ProcessRecord> = self
            .processes
            .iter()
            .map(|p| ProcessRecord::new(p.id.clone(), p.max.clone()))
            .collect();
        safety::check(&self.total, &records)
    }

    /// Resource types whose combined maximum claims exceed the total
    ///
    /// Without avoidance, these are where a deadlock can form.
    pub fn oversubscribed(&self) -> Vec<usize> {
        (0..self.total.len())
            .filter(|&r| {
                let claimed: u64 = self.processes.iter().map(|p| u64::from(p.max.get(r))).sum();
                claimed > u64::from(self.total.get(r))
            })
            .collect()
    }
}

/// Parse and validate a scenario from TOML content
pub fn parse_scenario(content: &str) -> Result<Scenario, ScenarioError> {
    let scenario: Scenario = toml::from_str(content)?;
    scenario.validate()?;
    Ok(scenario)
}

/// Per-run overrides layered over a scenario
///
/// Unset fields keep the scenario's value.
#[derive(Clone, Debug, Default)]
pub struct RunConfig {
    pub mode: Option<Mode>,
    pub step_delay: Option<Duration>,
    pub recheck_interval: Option<Duration>,
    pub deadline: Option<Duration>,
    pub watch_interval: Option<Duration>,
    pub auto_resolve: Option<bool>,
    /// Flipping this to true tears the run down early
    pub cancel: Option<tokio::sync::watch::Receiver<bool>>,
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = Some(delay);
        self
    }

    pub fn with_recheck_interval(mut self, interval: Duration) -> Self {
        self.recheck_interval = Some(interval);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_watch_interval(mut self, interval: Duration) -> Self {
        self.watch_interval = Some(interval);
        self
    }

    pub fn with_auto_resolve(mut self, enabled: bool) -> Self {
        self.auto_resolve = Some(enabled);
        self
    }

    pub fn with_cancel(mut self, cancel: tokio::sync::watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// The scenario with these overrides applied
    pub fn apply(&self, scenario: &Scenario) -> Scenario {
        let mut scenario = scenario.clone();
        if let Some(mode) = self.mode {
            scenario.mode = Some(mode);
        }
        if let Some(delay) = self.step_delay {
            scenario.step_delay = delay;
        }
        if let Some(interval) = self.recheck_interval {
            scenario.recheck_interval = interval;
        }
        if let Some(deadline) = self.deadline {
            scenario.deadline = deadline;
        }
        if let Some(interval) = self.watch_interval {
            scenario.watcher.interval = interval;
        }
        if let Some(enabled) = self.auto_resolve {
            scenario.watcher.auto_resolve = enabled;
        }
        scenario
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
