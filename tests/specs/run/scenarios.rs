//! `dlk scenarios` specs

use crate::prelude::*;

#[test]
fn lists_builtins() {
    Project::empty()
        .dlk()
        .args(&["scenarios"])
        .passes()
        .stdout_has("crossed-claims")
        .stdout_has("dining-ring")
        .stdout_has("TOTAL=[1, 1]");
}

#[test]
fn json_lists_full_scenarios() {
    let out = Project::empty()
        .dlk()
        .args(&["scenarios", "--format", "json"])
        .passes();
    let json = out.json();
    let list = json.as_array().unwrap();

    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["name"], "crossed-claims");
    assert_eq!(list[1]["process"].as_array().unwrap().len(), 3);
}
