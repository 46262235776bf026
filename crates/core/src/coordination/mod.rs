// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordination of countable resources among competing processes
//!
//! This module provides:
//! - **ResourceManager** - monitor exposing register/request/release/abort
//! - **Safety check** - Banker's Algorithm used in avoidance mode
//! - **WaitForGraph** - on-demand wait-for graph with cycle detection
//! - **ManagerSnapshot** - consistent state copies for detection and reporting

mod graph;
mod manager;
mod mode;
mod process;
pub mod safety;
mod snapshot;

pub use graph::WaitForGraph;
pub use manager::{ResourceManager, DEFAULT_RECHECK_INTERVAL};
pub use mode::{Mode, WaitReason};
pub use process::{verify_records, ProcessId, ProcessRecord, ProcessTable};
pub use safety::SafetyReport;
pub use snapshot::{Deadlock, ManagerSnapshot};
