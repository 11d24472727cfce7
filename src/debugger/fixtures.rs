//! Starting data for a debugging session
//!
//! Two 65-entry zeta tables as captured from a python port and from the C
//! reference, together with the sources they came from. Both tables are the
//! Montgomery-form ML-KEM zetas for indices 0..=64; they disagree only in the
//! final entry, where the captured reference reads 2227 instead of 2226.

/// Zetas printed by the python port
pub const PYTHON_ZETAS: &[i16] = &[
    2285, 2571, 2970, 1812, 1493, 1422, 287, 202, 3158, 622, 1577, 182, 962,
    2127, 1855, 1468, 573, 2004, 264, 383, 2500, 1458, 1727, 3199, 2648, 1017,
    732, 608, 1787, 411, 3124, 1758, 1223, 652, 2777, 1015, 2036, 1491, 3047,
    1785, 516, 3321, 3009, 2663, 1711, 2167, 126, 1469, 2476, 3239, 3058, 830,
    107, 1908, 3082, 2378, 2931, 961, 1821, 2604, 448, 2264, 677, 2054, 2226,
];

/// Zetas printed by the C reference
pub const REFERENCE_ZETAS: &[i16] = &[
    2285, 2571, 2970, 1812, 1493, 1422, 287, 202, 3158, 622, 1577, 182, 962,
    2127, 1855, 1468, 573, 2004, 264, 383, 2500, 1458, 1727, 3199, 2648, 1017,
    732, 608, 1787, 411, 3124, 1758, 1223, 652, 2777, 1015, 2036, 1491, 3047,
    1785, 516, 3321, 3009, 2663, 1711, 2167, 126, 1469, 2476, 3239, 3058, 830,
    107, 1908, 3082, 2378, 2931, 961, 1821, 2604, 448, 2264, 677, 2054, 2227,
];

/// Python port under inspection
pub const PYTHON_SOURCE: &str = r#"Q = 3329
QINV = 62209  # q^-1 mod 2^16
MONT = 2285   # 2^16 mod q
ROOT = 17

def montgomery_reduce(a):
    t = (a * QINV) & 0xFFFF
    return (a - t * Q) >> 16

def bit_reverse(n, bits):
    r = 0
    for _ in range(bits):
        r = (r << 1) | (n & 1)
        n >>= 1
    return r

def generate_zetas():
    return [montgomery_reduce(pow(ROOT, bit_reverse(i, 7), Q) * MONT)
            for i in range(128)]
"#;

/// Fixed-width C reference
pub const REFERENCE_SOURCE: &str = r#"#define KYBER_Q 3329
#define QINV 62209 /* q^-1 mod 2^16 */
#define MONT 2285  /* 2^16 mod q */

static int16_t montgomery_reduce(int32_t a) {
    int16_t t = (int16_t)a * QINV;
    return (a - (int32_t)t * KYBER_Q) >> 16;
}

static unsigned bit_reverse(unsigned n, int bits) {
    unsigned r = 0;
    for (int i = 0; i < bits; i++) {
        r = (r << 1) | (n & 1);
        n >>= 1;
    }
    return r;
}

void generate_zetas(int16_t zetas[128]) {
    for (unsigned i = 0; i < 128; i++)
        zetas[i] = montgomery_reduce(
            (int32_t)pow_mod(17, bit_reverse(i, 7), KYBER_Q) * MONT);
}
"#;
