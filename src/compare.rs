//! Table comparison
//!
//! Diffs a python-side table against a reference table index by index. The
//! sign convention is python minus reference. Unequal lengths are an error;
//! nothing is truncated or padded.

use itertools::Itertools;
use serde::Serialize;

use crate::error::{Result, ZetaError};

/// Default number of leading entries handed to the chart collaborator
pub const DEFAULT_CHART_WINDOW: usize = 32;

/// One index where the two tables disagree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub index: usize,
    pub python: i16,
    pub reference: i16,
    /// python - reference
    pub delta: i32,
}

/// Result of comparing two equal-length tables
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Comparison {
    deltas: Vec<i32>,
    mismatches: Vec<Mismatch>,
    max_abs_diff: u32,
}

impl Comparison {
    /// Per-index signed differences, python - reference
    pub fn deltas(&self) -> &[i32] {
        &self.deltas
    }

    /// Every index with a non-zero delta, in index order
    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    pub fn mismatch_count(&self) -> usize {
        self.mismatches.len()
    }

    /// Largest |delta|; 0 for identical or empty tables
    pub fn max_abs_diff(&self) -> u32 {
        self.max_abs_diff
    }

    pub fn is_match(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Number of compared entries
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}

/// Diff two tables.
///
/// Fails with [`ZetaError::LengthMismatch`] when the lengths differ.
pub fn compare_tables(python: &[i16], reference: &[i16]) -> Result<Comparison> {
    if python.len() != reference.len() {
        return Err(ZetaError::LengthMismatch {
            python: python.len(),
            reference: reference.len(),
        });
    }

    let deltas: Vec<i32> = python
        .iter()
        .zip_eq(reference)
        .map(|(&p, &r)| i32::from(p) - i32::from(r))
        .collect();

    let mismatches: Vec<Mismatch> = deltas
        .iter()
        .positions(|&d| d != 0)
        .map(|index| Mismatch {
            index,
            python: python[index],
            reference: reference[index],
            delta: deltas[index],
        })
        .collect();

    let max_abs_diff = deltas.iter().map(|d| d.unsigned_abs()).max().unwrap_or(0);

    Ok(Comparison {
        deltas,
        mismatches,
        max_abs_diff,
    })
}

// ============================================================================
// Chart Series
// ============================================================================

/// Leading window of both tables and their deltas, ready for a chart widget
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    /// 0..min(window, len)
    pub labels: Vec<usize>,
    pub python: Vec<i16>,
    pub reference: Vec<i16>,
    pub deltas: Vec<i32>,
}

impl ChartSeries {
    /// Take the first `window` entries of a compared pair.
    ///
    /// `python` and `reference` must be the tables `comparison` came from.
    pub fn new(python: &[i16], reference: &[i16], comparison: &Comparison, window: usize) -> Self {
        let len = window.min(comparison.len());
        Self {
            labels: (0..len).collect(),
            python: python[..len].to_vec(),
            reference: reference[..len].to_vec(),
            deltas: comparison.deltas()[..len].to_vec(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
