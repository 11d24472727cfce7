//! Modulus parameter sets for Montgomery-form twiddle generation
//!
//! A [`ModulusParams`] record bundles the prime modulus with the constants the
//! 16-bit Montgomery reducer needs and the root used for twiddle factors.
//!
//! # Parameter Sets
//!
//! | Name | q | ROOT | N | Use Case |
//! |------|---|------|---|----------|
//! | `KYBER_256` | 3329 | 17 | 256 | Full 8-bit reversal over Kyber's q |
//! | `ML_KEM` | 3329 | 17 | 128 | NIST ML-KEM zetas (7-bit reversal) |
//! | `FALCON_512` | 12289 | 49 | 512 | NIST Falcon modulus |
//!
//! # References
//!
//! - NIST FIPS 203/206

use serde::Serialize;

use super::modular::{is_prime, mod_inv, pow_mod};
use crate::error::{Result, ZetaError};

/// The Montgomery radix R = 2^16
pub const MONT_RADIX: u64 = 1 << 16;

// ============================================================================
// Parameter Set Structure
// ============================================================================

/// Parameters for a 16-bit Montgomery NTT over Z_q
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ModulusParams {
    /// Human-readable name, also the preset lookup key
    pub name: &'static str,
    /// Prime modulus Q
    pub q: u32,
    /// Q^{-1} mod 2^16
    pub qinv: u32,
    /// 2^16 mod Q
    pub mont: u32,
    /// Root of unity whose order divides 2N
    pub root: u32,
    /// Transform size N (power of two)
    pub n: usize,
}

impl ModulusParams {
    /// Derive QINV and MONT for (q, root, n) and validate the result.
    pub fn derive(name: &'static str, q: u32, root: u32, n: usize) -> Result<Self> {
        let qinv = mod_inv(u64::from(q), MONT_RADIX).ok_or_else(|| {
            ZetaError::InvalidParameters(format!("q={q} has no inverse mod 2^16"))
        })?;
        let params = Self {
            name,
            q,
            qinv: qinv as u32,
            mont: (MONT_RADIX % u64::from(q.max(1))) as u32,
            root,
            n,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every invariant the reducer and generator rely on.
    ///
    /// The root only has to satisfy ROOT^(2N) ≡ 1; see [`Self::is_primitive`]
    /// for the stricter check.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(ZetaError::InvalidParameters(msg));
        let (q, n) = (u64::from(self.q), self.n);

        if n == 0 || !n.is_power_of_two() {
            return invalid(format!("n={n} is not a power of two"));
        }
        // t·Q and reduced values must fit the 16/32-bit widths
        if !(3..1 << 15).contains(&q) || !is_prime(q) {
            return invalid(format!("q={q} must be an odd prime below 2^15"));
        }
        if u64::from(self.qinv) >= MONT_RADIX || (u64::from(self.qinv) * q) % MONT_RADIX != 1 {
            return invalid(format!("qinv={} is not q^-1 mod 2^16", self.qinv));
        }
        if u64::from(self.mont) != MONT_RADIX % q {
            return invalid(format!("mont={} is not 2^16 mod q", self.mont));
        }
        // ROOT^e only takes q-1 distinct values, so 2N is capped there
        let two_n = match self.two_n() {
            Some(two_n) if two_n < q => two_n,
            _ => return invalid(format!("n={n} exceeds (q-1)/2 for q={q}")),
        };
        let root = u64::from(self.root);
        if root == 0 || root >= q {
            return invalid(format!("root={root} is not a unit in [1, q)"));
        }
        if pow_mod(root, two_n, q) != 1 {
            return invalid(format!("order of root={root} does not divide 2n={two_n}"));
        }
        Ok(())
    }

    /// Multiplicative order of ROOT, if it divides 2N.
    ///
    /// Since 2N is a power of two, the order is the smallest power of two k
    /// with ROOT^k ≡ 1.
    pub fn root_order(&self) -> Option<u64> {
        let (root, q) = (u64::from(self.root), u64::from(self.q));
        let two_n = self.two_n()?;
        std::iter::successors(Some(1u64), |&k| (k < two_n).then_some(k * 2))
            .find(|&k| pow_mod(root, k, q) == 1)
    }

    /// True when ROOT is a primitive 2N-th root of unity.
    pub fn is_primitive(&self) -> bool {
        self.two_n().is_some_and(|two_n| self.root_order() == Some(two_n))
    }

    /// 2N, or `None` if it does not fit a u64
    fn two_n(&self) -> Option<u64> {
        u64::try_from(self.n).ok()?.checked_mul(2)
    }

    /// log2(N), the bit width used for bit reversal
    #[inline]
    pub fn log_n(&self) -> u32 {
        self.n.trailing_zeros()
    }
}

/// Look up a preset by name (case-insensitive).
pub fn by_name(name: &str) -> Option<&'static ModulusParams> {
    ALL_PARAMS
        .iter()
        .copied()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}

// ============================================================================
// Presets
// ============================================================================

/// Kyber modulus with a 256-entry table (8-bit reversal)
///
/// ROOT = 17 has order 256 mod 3329, which divides 2N = 512 but is not a
/// primitive 512th root: 3329 - 1 = 2^8 · 13.
pub const KYBER_256: ModulusParams = ModulusParams {
    name: "kyber-256",
    q: 3329,
    qinv: 62209,
    mont: 2285,
    root: 17,
    n: 256,
};

/// NIST ML-KEM zetas [FIPS 203]
///
/// 128 entries, 7-bit reversal. In Montgomery form this is the table the
/// reference C implementation ships: 2285, 2571, 2970, 1812, ...
pub const ML_KEM: ModulusParams = ModulusParams {
    name: "ml-kem",
    q: 3329,
    qinv: 62209,
    mont: 2285,
    root: 17,
    n: 128,
};

/// NIST Falcon-512 modulus [FIPS 206]
///
/// q = 12289 ≡ 1 (mod 1024), ψ = 49 is a primitive 1024th root.
pub const FALCON_512: ModulusParams = ModulusParams {
    name: "falcon-512",
    q: 12289,
    qinv: 53249,
    mont: 4091,
    root: 49,
    n: 512,
};

/// All presets, in lookup order
pub const ALL_PARAMS: &[&ModulusParams] = &[&KYBER_256, &ML_KEM, &FALCON_512];

// ============================================================================
// Tests
// ============================================================================
