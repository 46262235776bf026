// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dlk-core: deadlock-handling resource coordinator
//!
//! This crate provides:
//! - `ResourceManager` - a monitor over a pool of typed, countable resources
//!   running in no-prevention, avoidance (Banker's) or detection mode
//! - `DeadlockWatcher` - periodic wait-for-graph cycle detection with victim abort
//! - `Requester` - scripted client driving request/release sequences
//! - An injected event stream (`EventSink`) for observability
//! - TOML scenarios and a runner that plays them out on tokio

pub mod coordination;
pub mod error;
pub mod events;
pub mod requester;
pub mod scenario;
pub mod vector;
pub mod watcher;

pub use coordination::{
    ManagerSnapshot, Mode, ProcessId, ProcessRecord, ResourceManager, SafetyReport, WaitForGraph,
    WaitReason,
};
pub use error::CoordinatorError;
pub use events::{
    ChannelSink, Event, EventReceiver, EventRecord, EventSink, FanoutSink, JsonLinesSink,
    NoopSink, RecordingSink, TracingSink,
};
pub use requester::{Requester, RequesterOutcome, Script};
pub use scenario::{
    builtin, builtin_names, builtins, parse_scenario, run_scenario, ProcessOutcome, ProcessSpec,
    RunConfig, RunError, RunReport, Scenario, ScenarioError, Stall,
};
pub use vector::ResourceVector;
pub use watcher::{choose_victim, DeadlockWatcher, Resolution, WatcherConfig};
