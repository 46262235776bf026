// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deadlock-handling disciplines

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the manager treats requests that could lead to deadlock
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Grant whenever resources are available; deadlocks are real and permanent
    #[default]
    #[serde(alias = "classic")]
    NoPrevention,
    /// Grant only if the Banker's safety check passes
    #[serde(alias = "avoid")]
    Avoidance,
    /// Grant on availability; a watcher breaks wait-for cycles by aborting a victim
    #[serde(alias = "detect")]
    Detection,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::NoPrevention, Mode::Avoidance, Mode::Detection];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::NoPrevention => "no-prevention",
            Mode::Avoidance => "avoidance",
            Mode::Detection => "detection",
        }
    }

    /// Whether grants go through the safety check
    pub fn uses_safety_check(&self) -> bool {
        matches!(self, Mode::Avoidance)
    }

    /// Whether a watcher should run alongside the requesters
    pub fn uses_watcher(&self) -> bool {
        matches!(self, Mode::Detection)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" | "none" | "no-prevention" => Ok(Mode::NoPrevention),
            "avoid" | "avoidance" | "bankers" => Ok(Mode::Avoidance),
            "detect" | "detection" => Ok(Mode::Detection),
            other => Err(format!(
                "unknown mode '{}' (expected classic, avoid or detect)",
                other
            )),
        }
    }
}

/// Why a request is currently blocked
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaitReason {
    /// `available` does not cover the request
    Insufficient,
    /// Granting would leave the system unsafe
    Unsafe,
}

impl fmt::Display for WaitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitReason::Insufficient => f.write_str("insufficient AVAIL"),
            WaitReason::Unsafe => f.write_str("unsafe by Banker's"),
        }
    }
}

#[cfg(test)]
#[path = "mode_tests.rs"]
mod tests;
