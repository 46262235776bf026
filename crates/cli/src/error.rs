// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors shown to the operator when a scenario cannot be started

use dlk_core::ScenarioError;
use std::fmt;
use std::path::Path;

/// A failure rendered with its causes and the commands that might help
#[derive(Debug)]
pub struct DlkError {
    pub message: String,
    pub causes: Vec<String>,
    pub hints: Vec<String>,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DlkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            causes: Vec::new(),
            hints: Vec::new(),
            source: None,
        }
    }

    pub fn because(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for DlkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;
        for cause in &self.causes {
            writeln!(f, "  caused by: {}", cause)?;
        }
        if !self.hints.is_empty() {
            writeln!(f)?;
        }
        for hint in &self.hints {
            writeln!(f, "hint: {}", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for DlkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

// === Scenario loading ===

impl DlkError {
    /// A `dlk run <name>` that matches no built-in
    pub fn unknown_scenario(name: &str) -> Self {
        let known: Vec<_> = dlk_core::builtin_names().collect();
        DlkError::new(format!("Unknown scenario '{}'", name))
            .because(format!("Built-in scenarios: {}", known.join(", ")))
            .hint("List built-in scenarios: dlk scenarios")
            .hint(format!("Run a scenario file: dlk run --file {}.toml", name))
    }

    /// A scenario file that is missing, malformed or inconsistent
    pub fn invalid_scenario(path: &Path, err: ScenarioError) -> Self {
        let base = DlkError::new(format!("Cannot load scenario {}", path.display()))
            .because(err.to_string());
        let base = match &err {
            ScenarioError::Io { .. } => base.hint("Check that the file exists and is readable"),
            ScenarioError::Toml(_) => base
                .hint("Fix the TOML syntax at the reported line")
                .hint("Compare with a built-in scenario: dlk scenarios --format json"),
            ScenarioError::Invalid(_) | ScenarioError::UnknownBuiltin(_) => base
                .hint("Every vector must have one entry per resource type in `total`")
                .hint(format!("Re-check the file: dlk check {}", path.display())),
        };
        base.with_source(err)
    }
}
