//! 16-bit Montgomery reduction
//!
//! Mirrors the fixed-width reference C reducer exactly: the low half of the
//! accumulator is truncated to `i16` and multiplied by QINV with
//! two's-complement wraparound. Arbitrary-precision arithmetic diverges from
//! the reference at precisely this step, so the truncation is spelled out
//! with `as i16` and `wrapping_mul` instead of masks on a wide integer.

use super::params::ModulusParams;
use crate::error::{Result, ZetaError};

/// Montgomery reduction: returns t ≡ a · 2^-16 (mod Q).
///
/// For `a` in [-Q·2^15, Q·2^15) the result lies in (-Q, Q). The subtraction
/// `a - t·Q` is checked in 32 bits; inputs near the ends of the `i32` range
/// fail with [`ZetaError::OverflowAssumptionViolated`] instead of wrapping.
#[inline]
pub fn montgomery_reduce(a: i32, params: &ModulusParams) -> Result<i16> {
    // QINV is stored as its unsigned residue; reinterpret the low 16 bits
    let qinv = params.qinv as u16 as i16;
    let t = (a as i16).wrapping_mul(qinv);

    let tq = i32::from(t)
        .checked_mul(params.q as i32)
        .ok_or_else(|| overflow(format!("t*q with t={t}, q={}", params.q)))?;
    let diff = a
        .checked_sub(tq)
        .ok_or_else(|| overflow(format!("a - t*q with a={a}, t*q={tq}")))?;

    // arithmetic shift; the low 16 bits of diff are zero by construction
    Ok((diff >> 16) as i16)
}

/// Montgomery multiplication: a · b · 2^-16 (mod Q)
#[inline]
pub fn montgomery_mul(a: i16, b: i16, params: &ModulusParams) -> Result<i16> {
    montgomery_reduce(i32::from(a) * i32::from(b), params)
}

/// Convert a residue into Montgomery form, canonical in [0, Q)
#[inline]
pub fn to_montgomery(x: i64, params: &ModulusParams) -> i16 {
    let q = i64::from(params.q);
    (x.rem_euclid(q) * i64::from(params.mont) % q) as i16
}

fn overflow(what: String) -> ZetaError {
    ZetaError::OverflowAssumptionViolated(what)
}

// ============================================================================
// Tests
// ============================================================================
