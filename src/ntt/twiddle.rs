//! NTT twiddle-factor ("zeta") tables
//!
//! # Contents
//!
//! - [`bit_reverse`]: index permutation used by the iterative NTT
//! - [`generate_zetas`]: Montgomery-path table, bit-for-bit what the
//!   fixed-width reference code computes
//! - [`reference_table`] / [`verify_table`]: brute-force table built with
//!   plain wide arithmetic, used to check the Montgomery path
//!
//! # Layout
//!
//! Entry i holds ROOT^{bitrev(i, log₂ N)}. With ROOT of order 2N this is the
//! access pattern of a Cooley-Tukey forward NTT: entry 1 is ROOT^{N/2}, the
//! first-stage twiddle, and so on.

use std::fmt;

use serde::Serialize;

use super::modular::{mul_mod, pow_mod, reduce_signed};
use super::montgomery::{montgomery_reduce, to_montgomery};
use super::params::ModulusParams;
use crate::compare::{compare_tables, Comparison};
use crate::error::{Result, ZetaError};
use crate::task::CancelToken;

/// Reverse the low `bits` bits of `n`.
///
/// Bits above `bits` are ignored; `bits == 0` yields 0. For `bits` wider
/// than `usize` the result is the reversal truncated to its low `usize::BITS`
/// bits.
#[inline]
pub fn bit_reverse(n: usize, bits: u32) -> usize {
    // earlier iterations would be shifted out of the accumulator anyway
    (bits.saturating_sub(usize::BITS)..bits)
        .fold(0, |acc, i| (acc << 1) | n.checked_shr(i).map_or(0, |v| v & 1))
}

// ============================================================================
// Twiddle Table
// ============================================================================

/// Immutable table of N twiddle factors for one parameter set.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct TwiddleTable {
    params: ModulusParams,
    zetas: Vec<i16>,
}

impl fmt::Debug for TwiddleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TwiddleTable {{ params: {}, n: {}, zetas: [...] }}",
            self.params.name,
            self.zetas.len()
        )
    }
}

impl TwiddleTable {
    pub fn params(&self) -> &ModulusParams {
        &self.params
    }

    /// Raw reducer output, each value in (-Q, Q)
    pub fn as_slice(&self) -> &[i16] {
        &self.zetas
    }

    pub fn len(&self) -> usize {
        self.zetas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zetas.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<i16> {
        self.zetas.get(i).copied()
    }

    /// Values reduced into [0, Q)
    pub fn canonical(&self) -> Vec<i16> {
        let q = u64::from(self.params.q);
        self.zetas
            .iter()
            .map(|&z| reduce_signed(i64::from(z), q) as i16)
            .collect()
    }

    /// Values scaled by 2^16 mod Q, canonical in [0, Q)
    ///
    /// This is the representation the fixed-width reference code prints.
    pub fn montgomery_form(&self) -> Vec<i16> {
        self.zetas
            .iter()
            .map(|&z| to_montgomery(i64::from(z), &self.params))
            .collect()
    }

    /// Compare against another table of the same length, `self` on the
    /// python side.
    pub fn compare(&self, reference: &TwiddleTable) -> Result<Comparison> {
        compare_tables(&self.zetas, &reference.zetas)
    }
}

// ============================================================================
// Montgomery-path Generation
// ============================================================================

/// Generate the twiddle table for `params`.
///
/// For each i: e = bitrev(i, log₂ N), r = ROOT^e mod Q, and the entry is
/// `montgomery_reduce(r · MONT)`. Identical parameters always yield an
/// identical table.
pub fn generate_zetas(params: &ModulusParams) -> Result<TwiddleTable> {
    params.validate()?;
    let (q, root, bits) = (u64::from(params.q), u64::from(params.root), params.log_n());

    let zetas = (0..params.n)
        .map(|i| {
            let r = pow_mod(root, bit_reverse(i, bits) as u64, q);
            let acc = i32::try_from(r * u64::from(params.mont)).map_err(|_| {
                ZetaError::OverflowAssumptionViolated(format!(
                    "r*mont for r={r}, mont={} exceeds i32",
                    params.mont
                ))
            })?;
            montgomery_reduce(acc, params)
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(params = params.name, n = params.n, "generated twiddle table");
    Ok(TwiddleTable {
        params: *params,
        zetas,
    })
}

// ============================================================================
// Brute-force Reference
// ============================================================================

/// Twiddle table computed without Montgomery arithmetic, canonical in [0, Q).
///
/// Powers of ROOT are accumulated by repeated wide multiplication and then
/// permuted by bit reversal. The token is checked once per index; on
/// cancellation the partial table is dropped and `Cancelled` is returned.
pub fn reference_table(params: &ModulusParams, cancel: &CancelToken) -> Result<Vec<i16>> {
    params.validate()?;
    let (q, root, bits) = (u64::from(params.q), u64::from(params.root), params.log_n());

    let mut powers = Vec::with_capacity(params.n);
    let mut acc = 1u64;
    for _ in 0..params.n {
        cancel.check()?;
        powers.push(acc as i16);
        acc = mul_mod(acc, root, q);
    }

    let table = (0..params.n)
        .map(|i| powers[bit_reverse(i, bits)])
        .collect();
    Ok(table)
}

/// Check a generated table against the brute-force reference.
///
/// The comparison is on canonical values, so a clean result has no
/// mismatches regardless of the signed representatives the reducer chose.
pub fn verify_table(table: &TwiddleTable, cancel: &CancelToken) -> Result<Comparison> {
    let reference = reference_table(table.params(), cancel)?;
    let comparison = compare_tables(&table.canonical(), &reference)?;
    tracing::debug!(
        params = table.params().name,
        mismatches = comparison.mismatch_count(),
        "verified twiddle table"
    );
    Ok(comparison)
}

// ============================================================================
// Tests
// ============================================================================
