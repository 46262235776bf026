// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dlk run <scenario>` - Play a scenario out under one discipline

use crate::error::DlkError;
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use dlk_core::{
    builtin, run_scenario, EventSink, FanoutSink, JsonLinesSink, Mode, RunConfig, RunReport,
    Scenario, ScenarioError, Stall, TracingSink,
};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Args)]
pub struct RunArgs {
    /// Built-in scenario name (see `dlk scenarios`)
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub scenario: Option<String>,

    /// Load the scenario from a TOML file
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Discipline: classic, avoid or detect
    #[arg(long, short = 'm')]
    pub mode: Option<Mode>,

    /// Pause after each request and release (e.g. "200ms")
    #[arg(long, value_parser = humantime::parse_duration)]
    pub delay: Option<Duration>,

    /// Upper bound on a single wait inside a request
    #[arg(long, value_parser = humantime::parse_duration)]
    pub recheck: Option<Duration>,

    /// Deadlock watcher polling interval
    #[arg(long, value_parser = humantime::parse_duration)]
    pub watch_interval: Option<Duration>,

    /// Report cycles without aborting a victim
    #[arg(long)]
    pub no_resolve: bool,

    /// How long to wait for requesters before tearing down
    #[arg(long, value_parser = humantime::parse_duration)]
    pub deadline: Option<Duration>,

    /// Append every event to this JSONL file
    #[arg(long)]
    pub events_out: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl RunArgs {
    fn load(&self) -> Result<Scenario> {
        if let Some(path) = &self.file {
            return Scenario::load(path).map_err(|e| DlkError::invalid_scenario(path, e).into());
        }
        let name = self.scenario.as_deref().unwrap_or_default();
        builtin(name).map_err(|e| match e {
            ScenarioError::UnknownBuiltin(name) => DlkError::unknown_scenario(&name).into(),
            other => anyhow::Error::new(other),
        })
    }

    fn run_config(&self) -> RunConfig {
        let mut config = RunConfig::new();
        config.mode = self.mode;
        config.step_delay = self.delay;
        config.recheck_interval = self.recheck;
        config.watch_interval = self.watch_interval;
        config.deadline = self.deadline;
        if self.no_resolve {
            config.auto_resolve = Some(false);
        }
        config
    }
}

pub async fn handle(args: RunArgs) -> Result<()> {
    let scenario = args.load()?;
    tracing::debug!(scenario = %scenario.name, file = ?args.file, "scenario loaded");

    let (cancel_tx, cancel_rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted, tearing down scenario...");
        let _ = cancel_tx.send(true);
    })?;
    let config = args.run_config().with_cancel(cancel_rx);

    let mut sink = FanoutSink::new().with(Arc::new(TracingSink::new()));
    if let Some(path) = &args.events_out {
        let log = JsonLinesSink::open(path)
            .with_context(|| format!("opening events log {}", path.display()))?;
        sink = sink.with(Arc::new(log));
    }
    let events: Arc<dyn EventSink> = Arc::new(sink);

    let report = run_scenario(&scenario, config, events).await?;
    output::print(&RunSummary(report), args.format)
}

/// Printable view of a finished run
#[derive(Serialize)]
#[serde(transparent)]
pub struct RunSummary(pub RunReport);

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = &self.0;
        writeln!(f, "Scenario: {} ({})", report.scenario, report.mode)?;
        writeln!(
            f,
            "  Elapsed: {}",
            humantime::format_duration(Duration::from_millis(report.elapsed_ms))
        )?;
        for outcome in &report.outcomes {
            writeln!(f, "  {:<8} {}", outcome.pid.as_str(), outcome.outcome)?;
        }

        if !report.victims.is_empty() {
            let victims: Vec<_> = report.victims.iter().map(|p| p.as_str()).collect();
            writeln!(f, "  Victims: {}", victims.join(", "))?;
        }
        if let Some(cycle) = &report.deadlock {
            let cycle: Vec<_> = cycle.iter().map(|p| p.as_str()).collect();
            writeln!(f, "  DEADLOCK CONFIRMED: {}", cycle.join(" -> "))?;
        }
        match report.stall {
            Some(Stall::Deadline) => {
                writeln!(f, "  Stalled until deadline; remaining processes aborted")?
            }
            Some(Stall::Cancelled) => writeln!(f, "  Cancelled; remaining processes aborted")?,
            None => {}
        }
        if let Some(detail) = &report.snapshot.halted {
            writeln!(f, "  HALTED: {}", detail)?;
        }
        write!(
            f,
            "  Final: AVAIL={} TOTAL={}",
            report.snapshot.available, report.snapshot.total
        )
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
