// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::coordination::ProcessId;
use yare::parameterized;

#[test]
fn names_are_listed_in_order() {
    let names: Vec<_> = builtin_names().collect();
    assert_eq!(names, vec!["crossed-claims", "dining-ring"]);
}

#[test]
fn every_builtin_parses() {
    let scenarios = builtins().unwrap();
    assert_eq!(scenarios.len(), 2);
    for scenario in scenarios {
        assert!(!scenario.description.is_empty(), "{}", scenario.name);
        assert!(scenario.initial_safety().safe, "{}", scenario.name);
    }
}

#[parameterized(
    crossed_claims = { "crossed-claims", 2, vec![0, 1] },
    dining_ring = { "dining-ring", 3, vec![0, 1, 2] },
)]
fn builtins_can_deadlock_without_avoidance(name: &str, processes: usize, contended: Vec<usize>) {
    let scenario = builtin(name).unwrap();
    assert_eq!(scenario.name, name);
    assert_eq!(scenario.processes.len(), processes);
    assert_eq!(scenario.oversubscribed(), contended);
}

#[test]
fn crossed_claims_matches_classic_demo() {
    let scenario = builtin("crossed-claims").unwrap();
    let p2 = scenario.process(&ProcessId::new("P2")).unwrap();
    assert_eq!(p2.requests[0].as_slice(), &[0, 1]);
    assert_eq!(p2.requests[1].as_slice(), &[1, 0]);
}

#[test]
fn unknown_name_is_an_error() {
    let err = builtin("philosophers").unwrap_err();
    assert!(matches!(err, ScenarioError::UnknownBuiltin(ref name) if name == "philosophers"));
}
