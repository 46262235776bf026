// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel sink for delivering events to an async consumer

use super::{Event, EventRecord, EventSink};
use std::sync::Mutex;
use std::time::Instant;
use tokio::sync::mpsc;

/// Receiver side of a `ChannelSink`
pub type EventReceiver = mpsc::UnboundedReceiver<EventRecord>;

/// Forwards sequenced event records over an unbounded tokio channel
///
/// Sending never blocks. Records are dropped once the receiver is gone.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<EventRecord>,
    sequence: Mutex<u64>,
    start_time: Instant,
}

impl ChannelSink {
    /// Create a sink and the receiver that observes it
    pub fn new() -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = Self {
            tx,
            sequence: Mutex::new(0),
            start_time: Instant::now(),
        };
        (sink, rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: &Event) {
        let mut sequence = self.sequence.lock().unwrap_or_else(|e| e.into_inner());
        *sequence += 1;
        let record = EventRecord {
            sequence: *sequence,
            timestamp_ms: self.start_time.elapsed().as_millis() as u64,
            name: event.name(),
            event: event.clone(),
        };
        let _ = self.tx.send(record);
    }
}
