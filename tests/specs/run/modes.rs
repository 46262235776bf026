//! `dlk run` specs for each discipline
//!
//! Timings are shortened so every run finishes in about a second.

use crate::prelude::*;

fn run(project: &Project, extra: &[&str]) -> Outcome {
    let mut args = vec!["run"];
    args.extend_from_slice(extra);
    args.extend_from_slice(FAST);
    project.dlk().args(&args).passes()
}

#[test]
fn avoidance_completes_every_process() {
    let project = Project::empty();
    run(&project, &["crossed-claims", "--mode", "avoid"])
        .stdout_has("Scenario: crossed-claims (avoidance)")
        .stdout_has("P1       completed")
        .stdout_has("P2       completed")
        .stdout_lacks("DEADLOCK");
}

#[test]
fn detection_aborts_a_victim() {
    let project = Project::empty();
    let out = run(
        &project,
        &["crossed-claims", "--mode", "detect", "--format", "json"],
    );
    let json = out.json();

    assert_eq!(json["mode"], "detection");
    assert_eq!(json["victims"], serde_json::json!(["P1"]));
    assert_eq!(json["outcomes"][0]["outcome"]["status"], "aborted");
    assert_eq!(json["outcomes"][1]["outcome"]["status"], "completed");
}

#[test]
fn classic_mode_confirms_the_deadlock() {
    let project = Project::empty();
    run(
        &project,
        &["dining-ring", "--mode", "classic", "--deadline", "800ms"],
    )
    .stdout_has("DEADLOCK CONFIRMED: P1 -> P2 -> P3")
    .stdout_has("Stalled until deadline");
}

#[test]
fn scenario_file_runs_with_its_own_settings() {
    let project = Project::empty();
    project.file("crossed.toml", CROSSED_TOML);

    project
        .dlk()
        .args(&["run", "--file", "crossed.toml"])
        .passes()
        .stdout_has("Scenario: crossed (no-prevention)")
        .stdout_has("DEADLOCK CONFIRMED: P1 -> P2");
}

#[test]
fn events_are_written_as_json_lines() {
    let project = Project::empty();
    run(
        &project,
        &["crossed-claims", "--mode", "detect", "--events-out", "events.jsonl"],
    );

    let log = project.read("events.jsonl");
    let names: Vec<String> = log
        .lines()
        .map(|line| {
            let record: serde_json::Value = serde_json::from_str(line).unwrap();
            record["name"].as_str().unwrap().to_string()
        })
        .collect();

    assert_eq!(names.first().map(String::as_str), Some("process:registered"));
    assert!(names.iter().any(|n| n == "cycle:detected"));
    assert!(names.iter().any(|n| n == "victim:chosen"));
    assert!(names.iter().any(|n| n == "process:finished"));
}

#[test]
fn log_file_receives_step_lines() {
    let project = Project::empty();
    project
        .dlk()
        .env("RUST_LOG", "info")
        .args(&["--log-file", "logs/dlk.log", "run", "crossed-claims", "--mode", "avoid"])
        .args(FAST)
        .passes();

    let log = project.read("logs/dlk.log");
    assert!(log.contains("GRANTED"));
}
