//! `dlk check <path>` specs

use crate::prelude::*;

#[test]
fn valid_file_is_summarized() {
    let project = Project::empty();
    project.file("crossed.toml", CROSSED_TOML);

    project
        .dlk()
        .args(&["check", "crossed.toml"])
        .passes()
        .stdout_has("Scenario 'crossed' is valid")
        .stdout_has("Initial state: SAFE")
        .stdout_has("Oversubscribed: R0, R1");
}

#[test]
fn json_summary_has_safe_sequence() {
    let project = Project::empty();
    project.file("crossed.toml", CROSSED_TOML);

    let out = project
        .dlk()
        .args(&["check", "crossed.toml", "--format", "json"])
        .passes();
    let json = out.json();

    assert_eq!(json["initially_safe"], true);
    assert_eq!(json["safe_sequence"], serde_json::json!(["P1", "P2"]));
}

#[test]
fn invalid_file_explains_the_problem() {
    let project = Project::empty();
    project.file(
        "bad.toml",
        &CROSSED_TOML.replace(
            "max = [1, 1]\nrequests = [[0, 1]",
            "max = [2, 1]\nrequests = [[0, 1]",
        ),
    );

    project
        .dlk()
        .args(&["check", "bad.toml"])
        .fails()
        .stderr_has("Cannot load scenario bad.toml")
        .stderr_has("exceeds total");
}

#[test]
fn syntax_error_is_reported() {
    let project = Project::empty();
    project.file("broken.toml", "name = \n");

    project
        .dlk()
        .args(&["check", "broken.toml"])
        .fails()
        .stderr_has("TOML syntax error");
}
