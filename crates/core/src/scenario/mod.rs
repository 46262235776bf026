// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenarios: declarative contention setups and the runner that plays them
//!
//! This module provides:
//! - `Scenario` - TOML document naming the pool, processes and scripts
//! - `builtin` - scenarios shipped with the binary
//! - `run_scenario` - registers, spawns requesters and a watcher, reports

mod builtin;
mod config;
mod runner;

pub use builtin::{builtin, builtin_names, builtins};
pub use config::{parse_scenario, ProcessSpec, RunConfig, Scenario, ScenarioError};
pub use runner::{run_scenario, ProcessOutcome, RunError, RunReport, Stall};
