// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event stream for observing the coordinator
//!
//! This module provides:
//! - `Event` - everything the manager, watcher and requesters report
//! - `EventSink` - the injected consumer of those events
//! - `ChannelSink` - forwards records over a tokio channel
//! - `JsonLinesSink` - append-only JSONL audit trail for external visualizers

mod channel;
mod log;
mod sink;

pub use channel::{ChannelSink, EventReceiver};
pub use log::JsonLinesSink;
pub use sink::{EventSink, FanoutSink, NoopSink, RecordingSink, TracingSink};

use crate::coordination::{ProcessId, WaitReason};
use crate::vector::ResourceVector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Events emitted by the coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    // Process lifecycle
    ProcessRegistered {
        pid: ProcessId,
        max_claim: ResourceVector,
        total: ResourceVector,
    },
    ProcessAborted {
        pid: ProcessId,
        reclaimed: ResourceVector,
        available: ResourceVector,
    },
    ProcessFinished {
        pid: ProcessId,
        reclaimed: ResourceVector,
        available: ResourceVector,
    },
    RequesterStopped {
        pid: ProcessId,
        reason: String,
    },

    // Requests
    RequestIssued {
        pid: ProcessId,
        request: ResourceVector,
        need: ResourceVector,
        available: ResourceVector,
    },
    RequestRejected {
        pid: ProcessId,
        request: ResourceVector,
        need: ResourceVector,
    },
    RequestPending {
        pid: ProcessId,
        request: ResourceVector,
        reason: WaitReason,
    },
    RequestGranted {
        pid: ProcessId,
        request: ResourceVector,
        allocation: ResourceVector,
        need: ResourceVector,
        available: ResourceVector,
    },
    RequestCancelled {
        pid: ProcessId,
        request: ResourceVector,
    },
    ResourcesReleased {
        pid: ProcessId,
        released: ResourceVector,
        allocation: ResourceVector,
        need: ResourceVector,
        available: ResourceVector,
    },

    // Algorithms
    SafetyChecked {
        pid: ProcessId,
        request: ResourceVector,
        safe: bool,
    },
    CycleDetected {
        cycle: Vec<ProcessId>,
    },
    VictimChosen {
        pid: ProcessId,
        allocation: ResourceVector,
    },
    InvariantViolated {
        detail: String,
    },
}

impl Event {
    /// Stable event name used for routing and in the JSONL log
    pub fn name(&self) -> String {
        match self {
            Event::ProcessRegistered { .. } => "process:registered".to_string(),
            Event::ProcessAborted { .. } => "process:aborted".to_string(),
            Event::ProcessFinished { .. } => "process:finished".to_string(),
            Event::RequesterStopped { .. } => "requester:stopped".to_string(),
            Event::RequestIssued { .. } => "request:issued".to_string(),
            Event::RequestRejected { .. } => "request:rejected".to_string(),
            Event::RequestPending { .. } => "request:pending".to_string(),
            Event::RequestGranted { .. } => "request:granted".to_string(),
            Event::RequestCancelled { .. } => "request:cancelled".to_string(),
            Event::ResourcesReleased { .. } => "resources:released".to_string(),
            Event::SafetyChecked { .. } => "safety:checked".to_string(),
            Event::CycleDetected { .. } => "cycle:detected".to_string(),
            Event::VictimChosen { .. } => "victim:chosen".to_string(),
            Event::InvariantViolated { .. } => "invariant:violated".to_string(),
        }
    }

    /// The process this event concerns, if any
    pub fn pid(&self) -> Option<&ProcessId> {
        match self {
            Event::ProcessRegistered { pid, .. }
            | Event::ProcessAborted { pid, .. }
            | Event::ProcessFinished { pid, .. }
            | Event::RequesterStopped { pid, .. }
            | Event::RequestIssued { pid, .. }
            | Event::RequestRejected { pid, .. }
            | Event::RequestPending { pid, .. }
            | Event::RequestGranted { pid, .. }
            | Event::RequestCancelled { pid, .. }
            | Event::ResourcesReleased { pid, .. }
            | Event::SafetyChecked { pid, .. }
            | Event::VictimChosen { pid, .. } => Some(pid),
            Event::CycleDetected { .. } | Event::InvariantViolated { .. } => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::ProcessRegistered {
                pid,
                max_claim,
                total,
            } => write!(f, "{pid} registered with MAX={max_claim}, TOTAL={total}"),
            Event::ProcessAborted {
                pid,
                reclaimed,
                available,
            } => write!(f, "{pid} ABORTED -> released {reclaimed}, AVAIL={available}"),
            Event::ProcessFinished {
                pid,
                reclaimed,
                available,
            } => write!(f, "{pid} FINISHED -> released {reclaimed}, AVAIL={available}"),
            Event::RequesterStopped { pid, reason } => write!(f, "{pid} STOP: {reason}"),
            Event::RequestIssued {
                pid,
                request,
                need,
                available,
            } => write!(f, "{pid} REQUEST {request} (NEED={need}, AVAIL={available})"),
            Event::RequestRejected { pid, request, need } => {
                write!(f, "{pid} REJECTED {request} (exceeds NEED={need})")
            }
            Event::RequestPending {
                pid,
                request,
                reason,
            } => write!(f, "{pid} WAIT {request} ({reason}), waiting..."),
            Event::RequestGranted {
                pid,
                request,
                allocation,
                need,
                available,
            } => write!(
                f,
                "{pid} GRANTED {request} -> ALLOC={allocation}, NEED={need}, AVAIL={available}"
            ),
            Event::RequestCancelled { pid, request } => {
                write!(f, "{pid} CANCELLED {request} (process aborted)")
            }
            Event::ResourcesReleased {
                pid,
                released,
                allocation,
                need,
                available,
            } => write!(
                f,
                "{pid} RELEASE {released} -> ALLOC={allocation}, NEED={need}, AVAIL={available}"
            ),
            Event::SafetyChecked { pid, request, safe } => {
                write!(f, "[Banker] simulate grant {request} to {pid}: SAFE={safe}")
            }
            Event::CycleDetected { cycle } => {
                write!(f, "[DETECT] cycle found: ")?;
                for (i, pid) in cycle.iter().enumerate() {
                    if i > 0 {
                        write!(f, " -> ")?;
                    }
                    write!(f, "{pid}")?;
                }
                Ok(())
            }
            Event::VictimChosen { pid, allocation } => write!(
                f,
                "[RESOLUTION] choose victim={pid} (max allocation={allocation})"
            ),
            Event::InvariantViolated { detail } => write!(f, "[HALT] invariant violated: {detail}"),
        }
    }
}

/// An event with its position in the stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Monotonic sequence number, starting at 1
    pub sequence: u64,
    /// Milliseconds since the sink was created
    pub timestamp_ms: u64,
    /// The event name
    pub name: String,
    /// The full event data
    pub event: Event,
}

#[cfg(test)]
mod tests;
