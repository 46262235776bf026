//! Error reporting specs
//!
//! Failures exit non-zero and explain themselves on stderr.

use crate::prelude::*;

#[test]
fn unknown_scenario_suggests_listing() {
    Project::empty()
        .dlk()
        .args(&["run", "philosophers"])
        .fails()
        .stderr_has("error: Unknown scenario 'philosophers'")
        .stderr_has("dlk scenarios");
}

#[test]
fn unknown_mode_is_rejected_by_argument_parsing() {
    Project::empty()
        .dlk()
        .args(&["run", "crossed-claims", "--mode", "optimistic"])
        .fails()
        .stderr_has("unknown mode");
}

#[test]
fn bad_duration_is_rejected() {
    Project::empty()
        .dlk()
        .args(&["run", "crossed-claims", "--delay", "soon"])
        .fails()
        .stderr_has("--delay");
}

#[test]
fn run_needs_a_scenario() {
    Project::empty().dlk().args(&["run"]).fails();
}

#[test]
fn missing_file_names_the_path() {
    Project::empty()
        .dlk()
        .args(&["run", "--file", "nowhere.toml"])
        .fails()
        .stderr_has("nowhere.toml");
}
