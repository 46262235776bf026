//! Shared helpers for CLI specs

#![allow(dead_code)]

pub use predicates::prelude::*;
pub use std::path::{Path, PathBuf};

use assert_cmd::assert::Assert;
use assert_cmd::Command;

/// Fast timings for built-in scenarios so specs finish in a few seconds
pub const FAST: &[&str] = &[
    "--delay",
    "100ms",
    "--recheck",
    "20ms",
    "--watch-interval",
    "50ms",
];

pub const CROSSED_TOML: &str = r#"
name = "crossed"
description = "opposite order"
total = [1, 1]
step_delay = "100ms"
recheck_interval = "20ms"
deadline = "800ms"

[watcher]
interval = "50ms"

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

/// Scratch directory for scenario files and outputs
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `rel` under the project, creating parents
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(rel)).unwrap()
    }

    /// The `dlk` binary, run from the project directory with logging quieted
    pub fn dlk(&self) -> Cli {
        let mut cmd = Command::cargo_bin("dlk").unwrap();
        cmd.current_dir(self.dir.path()).env("RUST_LOG", "warn");
        Cli { cmd }
    }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args<S: AsRef<std::ffi::OsStr>>(mut self, args: &[S]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> Outcome {
        Outcome(self.cmd.assert().success())
    }

    pub fn fails(mut self) -> Outcome {
        Outcome(self.cmd.assert().failure())
    }
}

pub struct Outcome(Assert);

impl Outcome {
    pub fn stdout_has(self, needle: &str) -> Self {
        Self(self.0.stdout(predicate::str::contains(needle)))
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        Self(self.0.stdout(predicate::str::contains(needle).not()))
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        Self(self.0.stderr(predicate::str::contains(needle)))
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.0.get_output().stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.0.get_output().stderr).into_owned()
    }

    /// Parse stdout as a single JSON document
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout()).unwrap()
    }
}
