// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-length resource count vectors
//!
//! One slot per resource type. Components are unsigned so "non-negative" holds
//! by construction; subtraction is checked and reports underflow instead of
//! wrapping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Counts of each resource type, indexed by resource number
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceVector(Vec<u32>);

impl ResourceVector {
    pub fn new(counts: Vec<u32>) -> Self {
        Self(counts)
    }

    /// A vector of `len` zero counts
    pub fn zeros(len: usize) -> Self {
        Self(vec![0; len])
    }

    /// Number of resource types
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, resource: usize) -> u32 {
        self.0.get(resource).copied().unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    /// True if every component is zero
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    /// Component-wise `self >= other`
    pub fn covers(&self, other: &ResourceVector) -> bool {
        self.0.len() == other.0.len() && self.0.iter().zip(&other.0).all(|(a, b)| a >= b)
    }

    /// Component-wise sum, saturating at `u32::MAX`
    pub fn add(&self, other: &ResourceVector) -> ResourceVector {
        Self(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(a, b)| a.saturating_add(*b))
                .collect(),
        )
    }

    /// Component-wise difference, `None` if any component would go negative
    pub fn checked_sub(&self, other: &ResourceVector) -> Option<ResourceVector> {
        if self.0.len() != other.0.len() {
            return None;
        }
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| a.checked_sub(*b))
            .collect::<Option<Vec<_>>>()
            .map(Self)
    }

    /// Component-wise minimum
    pub fn min(&self, other: &ResourceVector) -> ResourceVector {
        Self(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(a, b)| (*a).min(*b))
                .collect(),
        )
    }

    /// Sum across all resource types
    pub fn total(&self) -> u64 {
        self.0.iter().map(|&c| u64::from(c)).sum()
    }
}

impl From<Vec<u32>> for ResourceVector {
    fn from(counts: Vec<u32>) -> Self {
        Self(counts)
    }
}

impl<const N: usize> From<[u32; N]> for ResourceVector {
    fn from(counts: [u32; N]) -> Self {
        Self(counts.to_vec())
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
#[path = "vector_tests.rs"]
mod tests;
