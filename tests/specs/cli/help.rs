//! Help and version specs

use crate::prelude::*;

#[test]
fn help_lists_subcommands() {
    Project::empty()
        .dlk()
        .args(&["--help"])
        .passes()
        .stdout_has("run")
        .stdout_has("scenarios")
        .stdout_has("check");
}

#[test]
fn run_help_lists_overrides() {
    Project::empty()
        .dlk()
        .args(&["run", "--help"])
        .passes()
        .stdout_has("--mode")
        .stdout_has("--deadline")
        .stdout_has("--no-resolve")
        .stdout_has("--events-out");
}

#[test]
fn version_prints() {
    Project::empty()
        .dlk()
        .args(&["--version"])
        .passes()
        .stdout_has("dlk");
}
