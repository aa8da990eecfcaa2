//! # Arith — Numerical Primitives
//!
//! Building blocks shared by the compositeness tests: 2-adic valuation,
//! perfect-square detection, the Jacobi symbol, and modular halving.
//! Everything here is a straight function of its inputs; the only state
//! touched is the OS entropy source that seeds the Newton iteration.
//!
//! ## Algorithm: Integer Newton Square Root
//!
//! For `n` of 64 bits or more, `is_square` runs the integer Newton map
//! x ← ⌊(x + ⌊n/x⌋) / 2⌋ from a random seed of about half the bit length
//! of `n`. On perfect squares the iteration settles on ⌊√n⌋; on non-squares
//! it ends up oscillating between ⌊√n⌋ and ⌊√n⌋+1, so the loop stops once
//! consecutive iterates differ by at most one. The final equality check
//! `x·x == n` is the authoritative verdict either way.
//!
//! ## Algorithm: Binary Jacobi
//!
//! `jacobi` uses the standard reduce / strip-twos / reciprocity loop, plus
//! one refinement: after each reduction, a residue larger than half the
//! denominator is replaced by its negation `d − n` (with the sign flip
//! `(−1/d)` requires), which strips more low bits per round. The "larger
//! than half" test compares significant-bit counts instead of magnitudes —
//! equal bit counts already guarantee `n > d/2`, and a missed borderline
//! case only costs one extra round.
//!
//! ## References
//!
//! - H. Cohen, "A Course in Computational Algebraic Number Theory",
//!   Algorithm 1.4.12 (Kronecker–Jacobi), Springer GTM 138, 1993.

use std::cmp::Ordering;

use rand::rngs::OsRng;
use rand::RngCore;
use rug::integer::Order;
use rug::ops::{NegAssign, RemRounding, SubFrom};
use rug::Integer;

/// Count the low-order zero bits of `x`, i.e. the largest `k` with `2^k | x`.
///
/// Returns 0 both for odd `x` and for `x == 0` (the latter by convention).
///
/// # Panics
///
/// Panics if `x` is negative.
pub fn trailing_zero_bits(x: &Integer) -> u32 {
    assert!(
        x.cmp0() != Ordering::Less,
        "trailing_zero_bits: negative input {}",
        x
    );
    // Index of the least significant set bit is exactly the 2-adic valuation.
    x.find_one(0).unwrap_or(0)
}

/// Decide whether `n` is a perfect square. Negative inputs return false.
///
/// Below 64 bits the root is taken through `f64` and checked exactly; the
/// double has enough precision that the truncated root of a perfect square
/// in that range is never off. Larger inputs go through the integer Newton
/// iteration described in the module docs, seeded with `bit_length/2`
/// cryptographically random bits so the start is of the right magnitude.
pub fn is_square(n: &Integer) -> bool {
    if n.cmp0() == Ordering::Less {
        return false;
    }
    let bits = n.significant_bits();
    if bits < 64 {
        let v = n.to_u64().expect("below 64 bits fits in u64");
        let a = (v as f64).sqrt() as u64;
        return a * a == v;
    }

    // Random seed of bit_length/2 bits with the top bit pinned, so the
    // first iterate is already within a factor of two of sqrt(n).
    let half = bits / 2;
    let mut seed = vec![0u8; (half as usize + 7) / 8];
    OsRng.fill_bytes(&mut seed);
    let mut x = Integer::from_digits(&seed, Order::Lsf);
    x.keep_bits_mut(half);
    x.set_bit(half - 1, true);

    let warmup = half;
    let max_iters = 2 * bits;
    for iter in 0..max_iters {
        let mut next = Integer::from(n / &x);
        next += &x;
        next >>= 1;
        let prev = std::mem::replace(&mut x, next);
        if iter >= warmup {
            let diff = Integer::from(&x - &prev).abs();
            if diff <= 1u32 {
                return Integer::from(x.square_ref()) == *n;
            }
        }
    }
    // Iteration cap hit without settling; not a square.
    false
}

/// Jacobi symbol `(n/d)` for odd positive `d`. Returns −1, 0, or +1;
/// 0 exactly when `gcd(n, d) > 1`. The numerator may be negative.
///
/// # Panics
///
/// Panics if `d` is not positive or not odd.
pub fn jacobi(n: &Integer, d: &Integer) -> i32 {
    assert!(
        d.cmp0() == Ordering::Greater && d.is_odd(),
        "jacobi: denominator must be odd and positive, got {}",
        d
    );
    if *d == 1u32 {
        return 1;
    }

    let mut num = n.clone().rem_euc(d);
    let mut den = d.clone();
    let mut j = 1i32;
    loop {
        // num is reduced into [0, den) here.
        if num.cmp0() == Ordering::Equal {
            return 0;
        }
        // Negation shortcut: equal bit counts imply num > den/2, so den − num
        // is smaller. (−1/den) = −1 when den ≡ 3 (mod 4).
        if num.significant_bits() == den.significant_bits() {
            num.sub_from(&den);
            if den.mod_u(4) == 3 {
                j = -j;
            }
        }
        // Strip factors of two; (2/den) = −1 when den ≡ ±3 (mod 8).
        let s = trailing_zero_bits(&num);
        if s > 0 {
            num >>= s;
            if s % 2 == 1 {
                let m8 = den.mod_u(8);
                if m8 == 3 || m8 == 5 {
                    j = -j;
                }
            }
        }
        if num == 1u32 {
            return j;
        }
        // Quadratic reciprocity: both ≡ 3 (mod 4) flips the sign.
        if num.mod_u(4) == 3 && den.mod_u(4) == 3 {
            j = -j;
        }
        std::mem::swap(&mut num, &mut den);
        num = num.rem_euc(&den);
    }
}

/// Halve `x` modulo an odd `n` without a modular inverse:
/// an odd `x` picks up `+n` first, which is exact because `n` is odd.
/// Expects `x` already reduced into `[0, n)`.
pub(crate) fn half_mod(mut x: Integer, n: &Integer) -> Integer {
    if x.is_odd() {
        x += n;
    }
    x >> 1
}

/// Flip the sign of `d` in place and step its magnitude by two: the
/// Selfridge discriminant sequence 5, −7, 9, −11, 13, …
pub(crate) fn next_selfridge_d(d: &mut Integer) {
    if d.cmp0() == Ordering::Greater {
        *d += 2u32;
    } else {
        *d -= 2u32;
    }
    d.neg_assign();
}
