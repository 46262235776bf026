// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the resource coordinator

use crate::coordination::ProcessId;
use crate::vector::ResourceVector;
use thiserror::Error;

/// Errors surfaced by `ResourceManager` entry points
///
/// Resource shortage and unsafe states are not errors; those block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    #[error("process {0} is already registered")]
    AlreadyRegistered(ProcessId),
    #[error("process {0} is not registered")]
    UnknownProcess(ProcessId),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{pid} requested {request} which exceeds its remaining need {need}")]
    ClaimExceeded {
        pid: ProcessId,
        request: ResourceVector,
        need: ResourceVector,
    },
    #[error("{0} aborted; request cancelled")]
    Aborted(ProcessId),
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}
