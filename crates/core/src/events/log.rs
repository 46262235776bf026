// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSONL event log for audit trails and external visualizers

use super::{Event, EventRecord, EventSink};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

struct LogState {
    writer: LineWriter<File>,
    sequence: u64,
}

/// Appends one `EventRecord` per line
pub struct JsonLinesSink {
    path: PathBuf,
    state: Mutex<LogState>,
    start_time: Instant,
}

impl JsonLinesSink {
    /// Open or create a log at the given path
    ///
    /// Sequence numbers continue after any records already in the file.
    pub fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let sequence = if path.exists() {
            let file = File::open(&path)?;
            BufReader::new(file).lines().count() as u64
        } else {
            0
        };

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            state: Mutex::new(LogState {
                writer: LineWriter::new(file),
                sequence,
            }),
            start_time: Instant::now(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record in a log file
    pub fn read_all(path: &Path) -> std::io::Result<Vec<EventRecord>> {
        if !path.exists() {
            return Ok(vec![]);
        }

        let file = File::open(path)?;
        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: EventRecord = serde_json::from_str(&line)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            records.push(record);
        }
        Ok(records)
    }
}

impl EventSink for JsonLinesSink {
    fn emit(&self, event: &Event) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.sequence += 1;

        let record = EventRecord {
            sequence: state.sequence,
            timestamp_ms: self.start_time.elapsed().as_millis() as u64,
            name: event.name(),
            event: event.clone(),
        };

        let result = serde_json::to_string(&record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            .and_then(|json| writeln!(state.writer, "{}", json));

        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to append event");
        }
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
