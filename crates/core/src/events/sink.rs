// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event sinks injected into the manager at construction

use super::Event;
use std::sync::{Arc, Mutex};

/// Consumer of coordinator events
///
/// Called from inside the manager's critical section, so implementations must
/// not block and must not call back into the manager.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &Event);
}

/// Discards every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: &Event) {}
}

/// Logs each event as a numbered step through `tracing`
#[derive(Debug, Default)]
pub struct TracingSink {
    step: Mutex<u64>,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events logged so far
    pub fn steps(&self) -> u64 {
        *self.step.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl EventSink for TracingSink {
    fn emit(&self, event: &Event) {
        let mut step = self.step.lock().unwrap_or_else(|e| e.into_inner());
        *step += 1;
        let name = event.name();
        match event {
            Event::InvariantViolated { .. } => {
                tracing::error!(step = *step, event = %name, "{}", event)
            }
            Event::CycleDetected { .. } | Event::VictimChosen { .. } => {
                tracing::warn!(step = *step, event = %name, "{}", event)
            }
            Event::SafetyChecked { .. } => {
                tracing::debug!(step = *step, event = %name, "{}", event)
            }
            _ => tracing::info!(step = *step, event = %name, "{}", event),
        }
    }
}

/// Keeps every event in memory
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events recorded so far, in emission order
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Names of all events recorded so far
    pub fn names(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(Event::name)
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &Event) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
    }
}

/// Delivers each event to several sinks, in order
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for FanoutSink {
    fn emit(&self, event: &Event) {
        for sink in &self.sinks {
            sink.emit(event);
        }
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
