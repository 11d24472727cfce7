//! Montgomery-form NTT twiddle factors
//!
//! This module provides the numeric core: parameter sets, 16-bit Montgomery
//! reduction with explicit fixed-width semantics, bit reversal and twiddle
//! table generation with a brute-force cross-check.

pub mod modular;
pub mod montgomery;
pub mod params;
pub mod twiddle;

pub use modular::{is_prime, mod_inv, mul_mod, pow_mod, reduce_signed};
pub use montgomery::{montgomery_mul, montgomery_reduce, to_montgomery};
pub use params::{by_name, ModulusParams, ALL_PARAMS, FALCON_512, KYBER_256, ML_KEM};
pub use twiddle::{bit_reverse, generate_zetas, reference_table, verify_table, TwiddleTable};
