// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenarios shipped with the binary

use super::config::{parse_scenario, Scenario, ScenarioError};

const CROSSED_CLAIMS: &str = r#"
name = "crossed-claims"
description = "Two processes take two single-unit resources in opposite order"
total = [1, 1]

[[process]]
id = "P1"
max = [1, 1]
requests = [[1, 0], [0, 1]]
releases = [[1, 1]]

[[process]]
id = "P2"
max = [1, 1]
requests = [[0, 1], [1, 0]]
releases = [[1, 1]]
"#;

const DINING_RING: &str = r#"
name = "dining-ring"
description = "Three processes in a ring, each holding one resource and wanting its neighbour's"
total = [1, 1, 1]

[[process]]
id = "P1"
max = [1, 1, 0]
requests = [[1, 0, 0], [0, 1, 0]]
releases = [[1, 1, 0]]

[[process]]
id = "P2"
max = [0, 1, 1]
requests = [[0, 1, 0], [0, 0, 1]]
releases = [[0, 1, 1]]

[[process]]
id = "P3"
max = [1, 0, 1]
requests = [[0, 0, 1], [1, 0, 0]]
releases = [[1, 0, 1]]
"#;

const BUILTINS: &[(&str, &str)] = &[
    ("crossed-claims", CROSSED_CLAIMS),
    ("dining-ring", DINING_RING),
];

/// Names of every built-in scenario
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|(name, _)| *name)
}

/// Look up a built-in scenario by name
pub fn builtin(name: &str) -> Result<Scenario, ScenarioError> {
    let (_, content) = BUILTINS
        .iter()
        .find(|(n, _)| *n == name)
        .ok_or_else(|| ScenarioError::UnknownBuiltin(name.to_string()))?;
    parse_scenario(content)
}

/// Every built-in scenario, in listing order
pub fn builtins() -> Result<Vec<Scenario>, ScenarioError> {
    builtin_names().map(builtin).collect()
}

#[cfg(test)]
#[path = "builtin_tests.rs"]
mod tests;
