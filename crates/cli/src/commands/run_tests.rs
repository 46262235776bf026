// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use clap::Parser;
use dlk_core::{ManagerSnapshot, ProcessId, ProcessOutcome, RequesterOutcome, ResourceVector};

#[derive(Parser)]
struct TestCli {
    #[command(flatten)]
    args: RunArgs,
}

fn parse(argv: &[&str]) -> RunArgs {
    let mut full = vec!["dlk-run"];
    full.extend_from_slice(argv);
    TestCli::try_parse_from(full).map(|cli| cli.args).unwrap()
}

fn report(deadlock: Option<Vec<&str>>, stall: Option<Stall>) -> RunReport {
    RunReport {
        scenario: "crossed-claims".to_string(),
        mode: Mode::NoPrevention,
        outcomes: vec![
            ProcessOutcome {
                pid: ProcessId::new("P1"),
                outcome: RequesterOutcome::Aborted,
            },
            ProcessOutcome {
                pid: ProcessId::new("P2"),
                outcome: RequesterOutcome::Completed,
            },
        ],
        victims: vec![],
        stall,
        deadlock: deadlock.map(|ids| ids.into_iter().map(ProcessId::new).collect()),
        elapsed_ms: 1500,
        snapshot: ManagerSnapshot {
            mode: Mode::NoPrevention,
            total: ResourceVector::from([1, 1]),
            available: ResourceVector::from([1, 1]),
            processes: vec![],
            halted: None,
        },
    }
}

#[test]
fn flags_become_overrides() {
    let args = parse(&[
        "crossed-claims",
        "--mode",
        "detect",
        "--delay",
        "200ms",
        "--watch-interval",
        "1s",
        "--no-resolve",
    ]);
    let config = args.run_config();

    assert_eq!(config.mode, Some(Mode::Detection));
    assert_eq!(config.step_delay, Some(Duration::from_millis(200)));
    assert_eq!(config.watch_interval, Some(Duration::from_secs(1)));
    assert_eq!(config.auto_resolve, Some(false));
    assert_eq!(config.deadline, None);
}

#[test]
fn scenario_or_file_is_required() {
    assert!(TestCli::try_parse_from(["dlk-run"]).is_err());
    assert!(TestCli::try_parse_from(["dlk-run", "crossed-claims", "--file", "x.toml"]).is_err());
}

#[test]
fn unknown_builtin_gets_hints() {
    let err = parse(&["philosophers"]).load().unwrap_err();
    let dlk = err.downcast_ref::<DlkError>().unwrap();
    assert!(dlk.message.contains("philosophers"));
    assert!(!dlk.hints.is_empty());
}

#[test]
fn summary_reports_confirmed_deadlock() {
    let text = RunSummary(report(Some(vec!["P1", "P2"]), Some(Stall::Deadline))).to_string();

    assert!(text.contains("Scenario: crossed-claims (no-prevention)"));
    assert!(text.contains("P1       aborted"));
    assert!(text.contains("DEADLOCK CONFIRMED: P1 -> P2"));
    assert!(text.contains("Stalled until deadline"));
    assert!(text.ends_with("Final: AVAIL=[1, 1] TOTAL=[1, 1]"));
}

#[test]
fn summary_serializes_as_the_report() {
    let json = serde_json::to_value(RunSummary(report(None, None))).unwrap();
    assert_eq!(json["scenario"], "crossed-claims");
    assert_eq!(json["deadlock"], serde_json::Value::Null);
    assert_eq!(json["outcomes"][1]["outcome"]["status"], "completed");
}
