// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dlk check <path>` - Validate a scenario file

use crate::error::DlkError;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use dlk_core::{Mode, ProcessId, ResourceVector, Scenario};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Args)]
pub struct CheckArgs {
    /// Scenario TOML file
    pub path: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// What a valid scenario looks like before it runs
#[derive(Debug, Serialize)]
pub struct CheckSummary {
    pub name: String,
    pub mode: Mode,
    pub total: ResourceVector,
    pub processes: Vec<ProcessId>,
    /// Resource types whose combined maximum claims exceed the total
    pub oversubscribed: Vec<usize>,
    pub initially_safe: bool,
    pub safe_sequence: Vec<ProcessId>,
}

impl CheckSummary {
    pub fn from_scenario(scenario: &Scenario) -> Self {
        let safety = scenario.initial_safety();
        Self {
            name: scenario.name.clone(),
            mode: scenario.mode(),
            total: scenario.total.clone(),
            processes: scenario.processes.iter().map(|p| p.id.clone()).collect(),
            oversubscribed: scenario.oversubscribed(),
            initially_safe: safety.safe,
            safe_sequence: safety
                .sequence
                .iter()
                .filter_map(|&idx| scenario.processes.get(idx).map(|p| p.id.clone()))
                .collect(),
        }
    }
}

impl fmt::Display for CheckSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scenario '{}' is valid", self.name)?;
        writeln!(f, "  Mode: {}", self.mode)?;
        writeln!(f, "  Total: {}", self.total)?;
        writeln!(f, "  Processes: {}", join_ids(&self.processes, ", "))?;
        if self.initially_safe {
            writeln!(f, "  Initial state: SAFE ({})", join_ids(&self.safe_sequence, " -> "))?;
        } else {
            writeln!(f, "  Initial state: UNSAFE")?;
        }
        if self.oversubscribed.is_empty() {
            write!(f, "  Claims fit the pool; no deadlock is possible")
        } else {
            let resources: Vec<_> = self.oversubscribed.iter().map(|r| format!("R{}", r)).collect();
            write!(
                f,
                "  Oversubscribed: {} (deadlock possible without avoidance)",
                resources.join(", ")
            )
        }
    }
}

fn join_ids(ids: &[ProcessId], sep: &str) -> String {
    ids.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(sep)
}

pub fn handle(args: CheckArgs) -> Result<()> {
    let scenario =
        Scenario::load(&args.path).map_err(|e| DlkError::invalid_scenario(&args.path, e))?;
    output::print(&CheckSummary::from_scenario(&scenario), args.format)
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
