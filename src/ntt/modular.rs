//! Modular arithmetic helpers over Z_q
//!
//! Plain wide-integer arithmetic used to derive and check parameters and to
//! build the brute-force reference table. The Montgomery path lives in
//! [`super::montgomery`] and deliberately does not use these helpers.

/// Multiply two values modulo q
///
/// Uses 128-bit intermediate to avoid overflow.
#[inline(always)]
pub fn mul_mod(a: u64, b: u64, q: u64) -> u64 {
    ((a as u128 * b as u128) % q as u128) as u64
}

/// Compute base^exp mod modulus using binary exponentiation
///
/// Time complexity: O(log exp)
pub fn pow_mod(mut base: u64, mut exp: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }
    let mut result = 1u64;
    base %= modulus;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, modulus);
        }
        exp >>= 1;
        base = mul_mod(base, base, modulus);
    }
    result
}

/// Modular inverse via the extended Euclidean algorithm
///
/// Returns `None` when gcd(a, m) ≠ 1.
pub fn mod_inv(a: u64, m: u64) -> Option<u64> {
    if m == 0 {
        return None;
    }
    let (mut old_r, mut r) = (a as i128 % m as i128, m as i128);
    let (mut old_s, mut s) = (1i128, 0i128);

    while r != 0 {
        let quotient = old_r / r;
        (old_r, r) = (r, old_r - quotient * r);
        (old_s, s) = (s, old_s - quotient * s);
    }

    (old_r == 1).then(|| old_s.rem_euclid(m as i128) as u64)
}

/// Deterministic primality test by trial division
///
/// Moduli handled here are below 2^15, so √q ≤ 182 candidates.
pub fn is_prime(q: u64) -> bool {
    match q {
        0 | 1 => false,
        2 | 3 => true,
        _ if q % 2 == 0 => false,
        _ => (3..)
            .step_by(2)
            .take_while(|&d: &u64| d * d <= q)
            .all(|d| q % d != 0),
    }
}

/// Reduce a signed value to [0, q)
#[inline(always)]
pub fn reduce_signed(a: i64, q: u64) -> u64 {
    a.rem_euclid(q as i64) as u64
}
