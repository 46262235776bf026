// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dlk - deadlock handling lab CLI

mod commands;
mod error;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, run, scenarios};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::error::DlkError;

#[derive(Parser)]
#[command(
    name = "dlk",
    version,
    about = "Deadlock lab - run resource contention scenarios under different disciplines"
)]
struct Cli {
    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario to completion (or teardown)
    Run(run::RunArgs),
    /// List built-in scenarios
    Scenarios(scenarios::ScenariosArgs),
    /// Validate a scenario file
    Check(check::CheckArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match logging::setup_logging(cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: failed to set up logging: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match dispatch(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<DlkError>() {
                Some(err) => eprint!("{}", err),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run(args) => run::handle(args).await,
        Commands::Scenarios(args) => scenarios::handle(args),
        Commands::Check(args) => check::handle(args),
    }
}
