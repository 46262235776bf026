// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dlk scenarios` - List built-in scenarios

use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use dlk_core::{builtins, Scenario};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct ScenariosArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// One line of the listing; the full scenario in JSON
#[derive(Serialize)]
#[serde(transparent)]
pub struct ScenarioEntry(pub Scenario);

impl fmt::Display for ScenarioEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scenario = &self.0;
        write!(
            f,
            "{:<16} {} processes, TOTAL={:<12} {}",
            scenario.name,
            scenario.processes.len(),
            scenario.total.to_string(),
            scenario.description
        )
    }
}

pub fn handle(args: ScenariosArgs) -> Result<()> {
    let entries: Vec<_> = builtins()?.into_iter().map(ScenarioEntry).collect();
    output::print_list(&entries, args.format)
}
