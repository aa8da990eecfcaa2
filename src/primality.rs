//! # Primality — Baillie–PSW and Its Three Filters
//!
//! The compositeness tests behind [`bpsw`], in the order the composition
//! runs them:
//!
//! ### Small-prime filter
//!
//! One gcd against the product of all primes below 2^10 replaces 172 trial
//! divisions. A nontrivial gcd proves a small factor exists; inputs below
//! 2^11 that *are* a table prime are recognized exactly, everything else
//! with a small factor is composite.
//!
//! ### Strong Miller–Rabin, base 2
//!
//! Writes N−1 = d·2^s with d odd and examines the chain
//! 2^d, 2^{2d}, …, 2^{2^{s−1}d} mod N: the test passes iff the first term
//! is ±1 or some later term is N−1. A single fixed base suffices here —
//! BPSW's strength comes from pairing base 2 with the Lucas test, and the
//! known base-2 pseudoprimes (2047 = 23·89 is the first) are exactly what
//! the Lucas step removes.
//!
//! ### Strong Lucas–Selfridge
//!
//! Selfridge's "Method A": pick the first D in 5, −7, 9, −11, … with
//! Jacobi symbol (D/N) = −1, set P = 1, Q = (1−D)/4, and evaluate the
//! Lucas sequences U, V at the odd part of N+1 by a left-to-right binary
//! chain over the triple (U_k, V_k, Q^k):
//!
//! - doubling:     U_{2k} = U_k·V_k,  V_{2k} = V_k² − 2Q^k,  Q^{2k} = (Q^k)²
//! - incrementing: U_{2k+1} = (P·U_{2k} + V_{2k})/2,
//!                 V_{2k+1} = (D·U_{2k} + P·V_{2k})/2,  Q^{2k+1} = Q^{2k}·Q
//!
//! The halvings are exact modulo the odd N (see `arith::half_mod`), so no
//! modular inverse is ever computed. N passes iff U_d ≡ 0 or some
//! V_{d·2^r} ≡ 0 for r < s. Perfect squares are rejected up front: no D
//! has (D/N) = −1 when N is square, and the parameter search would spin.
//!
//! Each half admits pseudoprimes the other rejects: 5459 passes Lucas but
//! fails Miller–Rabin, 2047 passes Miller–Rabin but fails Lucas. No
//! composite is known to pass both, and exhaustive search has verified
//! the disjointness to at least 2^64. That disjointness is the entire
//! point of the composition.
//!
//! ## References
//!
//! - R. Baillie, S. S. Wagstaff, "Lucas Pseudoprimes", Math. Comp.
//!   35(152):1391–1417, 1980 — parameter "Method A" and the strong test.
//! - D. H. Lehmer, "Computer Technology Applied to the Theory of Numbers",
//!   MAA Studies in Mathematics 6, 1969 (Lucas chains).

use std::cmp::Ordering;

use rug::ops::RemRounding;
use rug::Integer;
use tracing::trace;

use crate::arith::{half_mod, is_square, jacobi, next_selfridge_d, trailing_zero_bits};
use crate::tables::tables;

/// Outcome of the small-prime filter. Mirrors the shape of
/// `rug::integer::IsPrime`, but the middle state here means "no small
/// factor found, keep testing", not "probably prime".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmallPrimeVerdict {
    /// The input is one of the primes below 2^10.
    Prime,
    /// The input shares a factor with the small-prime product and is not
    /// itself a table prime.
    Composite,
    /// No prime factor below 2^10; the input needs the full tests.
    Inconclusive,
}

/// Attempt ceiling for the Selfridge discriminant search. Non-square inputs
/// are expected to succeed within two attempts on average; exhausting the
/// ceiling is believed impossible and treated as a caller-visible bug.
const MAX_SELFRIDGE_ATTEMPTS: u32 = 10_000;

/// Trial-division verdict for `n` via one gcd with the product of all
/// primes below 2^10.
///
/// # Panics
///
/// Panics if `n` is negative.
pub fn small_prime_test(n: &Integer) -> SmallPrimeVerdict {
    assert!(
        n.cmp0() != Ordering::Less,
        "small_prime_test: negative input {}",
        n
    );
    let t = tables();
    let g = Integer::from(n.gcd_ref(&t.prod_small_primes));
    if g == 1u32 {
        return SmallPrimeVerdict::Inconclusive;
    }
    // A shared factor below 2^10 exists. Only inputs below 2^11 can still
    // be prime, namely the table primes themselves.
    if n.significant_bits() < 11 {
        let v = n.to_u32().expect("below 11 bits fits in u32");
        if t.primes_under_1024.binary_search(&v).is_ok() {
            return SmallPrimeVerdict::Prime;
        }
    }
    SmallPrimeVerdict::Composite
}

/// Strong Miller–Rabin test of `n` for the fixed base `a`.
///
/// Returns false when `gcd(n, a) != 1`; a passing result means `n` is
/// prime or a strong pseudoprime to base `a`.
///
/// # Panics
///
/// Panics unless `n` is odd and at least 3, and `a` at least 2.
pub fn strong_miller_rabin(n: &Integer, a: u32) -> bool {
    assert!(
        n.is_odd() && *n >= 3u32,
        "strong_miller_rabin: modulus must be odd and >= 3, got {}",
        n
    );
    assert!(a >= 2, "strong_miller_rabin: base must be >= 2, got {}", a);
    let base = Integer::from(a);
    if Integer::from(n.gcd_ref(&base)) != 1u32 {
        return false;
    }

    // n − 1 = d · 2^s, d odd.
    let n_minus_1 = Integer::from(n - 1u32);
    let s = trailing_zero_bits(&n_minus_1);
    let d = Integer::from(&n_minus_1 >> s);

    let mut x = base
        .pow_mod(&d, n)
        .expect("pow_mod with non-negative exponent cannot fail");
    if x == 1u32 || x == n_minus_1 {
        return true;
    }
    for _ in 1..s {
        x.square_mut();
        x %= n;
        if x == n_minus_1 {
            return true;
        }
    }
    false
}

/// Strong Lucas test of `n` with Selfridge's parameters.
///
/// A passing result means `n` is prime or a strong Lucas pseudoprime
/// (5459 is the first composite to pass).
///
/// # Panics
///
/// Panics unless `n` is odd and at least 3, or if the discriminant search
/// exceeds its attempt ceiling (no such input is known to exist).
pub fn strong_lucas_selfridge(n: &Integer) -> bool {
    assert!(
        n.is_odd() && *n >= 3u32,
        "strong_lucas_selfridge: modulus must be odd and >= 3, got {}",
        n
    );
    // A square has (D/n) != −1 for every D; reject now rather than spin.
    if is_square(n) {
        return false;
    }

    // Selfridge "Method A": first D in 5, −7, 9, −11, … with (D/n) = −1.
    let mut disc = Integer::from(5);
    let mut attempts = 0u32;
    loop {
        match jacobi(&disc, n) {
            -1 => break,
            0 => {
                // (D/n) = 0 means a shared factor. For |D| < n that factor
                // is proper, so n is composite; |D| = n happens only when a
                // tiny prime n is reached by the sequence itself.
                return Integer::from(disc.abs_ref()) == *n;
            }
            _ => {}
        }
        attempts += 1;
        assert!(
            attempts < MAX_SELFRIDGE_ATTEMPTS,
            "strong_lucas_selfridge: no discriminant with (D/{}) = -1 after {} attempts",
            n,
            attempts
        );
        next_selfridge_d(&mut disc);
    }
    trace!(attempts, "selfridge discriminant found");

    // P = 1, Q = (1 − D)/4; the sequence keeps D ≡ 1 (mod 4), so the
    // division is exact.
    let mut q = Integer::from(1) - &disc;
    q.div_exact_u_mut(4);
    let q = q.rem_euc(n);
    if Integer::from(n.gcd_ref(&q)) != 1u32 {
        return false;
    }
    let disc_mod = disc.rem_euc(n);

    // n + 1 = t · 2^s, t odd.
    let n_plus_1 = Integer::from(n + 1u32);
    let s = trailing_zero_bits(&n_plus_1);
    let t = Integer::from(&n_plus_1 >> s);

    // Left-to-right binary chain computing (U_t, V_t, Q^t) mod n.
    let mut u = Integer::from(1); // U_1
    let mut v = Integer::from(1); // V_1 = P
    let mut qk = q.clone(); // Q^1
    let bits = t.significant_bits();
    for i in (0..bits - 1).rev() {
        // (U, V, Q^k) → (U_{2k}, V_{2k}, Q^{2k})
        u *= &v;
        u %= n;
        v.square_mut();
        v -= &qk;
        v -= &qk;
        v = v.rem_euc(n);
        qk.square_mut();
        qk %= n;
        if t.get_bit(i) {
            // → (U_{2k+1}, V_{2k+1}, Q^{2k+1}); with P = 1 the numerators
            // are U + V and D·U + V, each halved exactly mod the odd n.
            qk *= &q;
            qk %= n;
            let mut u_next = Integer::from(&u + &v);
            u_next %= n;
            let mut v_next = Integer::from(&disc_mod * &u);
            v_next += &v;
            v_next %= n;
            u = half_mod(u_next, n);
            v = half_mod(v_next, n);
        }
    }

    // Strong verdict: U_t ≡ 0, or V_{t·2^r} ≡ 0 for some r < s.
    if u.cmp0() == Ordering::Equal {
        return true;
    }
    for r in 0..s {
        if v.cmp0() == Ordering::Equal {
            return true;
        }
        if r + 1 < s {
            v.square_mut();
            v -= &qk;
            v -= &qk;
            v = v.rem_euc(n);
            qk.square_mut();
            qk %= n;
        }
    }
    false
}

/// Baillie–PSW compositeness test.
///
/// `false` proves `n` composite (or below 2); `true` means `n` is prime or
/// a strong Baillie–PSW pseudoprime, of which none is known.
///
/// # Examples
///
/// ```
/// use rug::Integer;
///
/// // 2047 passes Miller-Rabin base 2 but not the Lucas half.
/// assert!(!nextprime::bpsw(&Integer::from(2047)));
/// assert!(nextprime::bpsw(&Integer::from(2053)));
/// ```
pub fn bpsw(n: &Integer) -> bool {
    // 0, 1, and negatives are never prime; everything past this point
    // satisfies the sub-tests' preconditions.
    if *n < 2u32 {
        return false;
    }
    match small_prime_test(n) {
        SmallPrimeVerdict::Prime => true,
        SmallPrimeVerdict::Composite => false,
        // No factor below 2^10, so n is odd and >= 3 here.
        SmallPrimeVerdict::Inconclusive => {
            strong_miller_rabin(n, 2) && strong_lucas_selfridge(n)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: u64) -> Integer {
        Integer::from(v)
    }

    #[test]
    fn small_prime_test_recognizes_table_primes() {
        for v in [2u64, 3, 5, 7, 541, 1021] {
            assert_eq!(
                small_prime_test(&int(v)),
                SmallPrimeVerdict::Prime,
                "{} is a prime below 2^10",
                v
            );
        }
    }

    #[test]
    fn small_prime_test_flags_small_factors() {
        for v in [0u64, 1021 * 2, 4, 9, 1024, 2047, 3 * 1031] {
            assert_eq!(
                small_prime_test(&int(v)),
                SmallPrimeVerdict::Composite,
                "{} has a factor below 2^10",
                v
            );
        }
    }

    #[test]
    fn small_prime_test_is_inconclusive_past_the_table() {
        // Primes above the table and semiprimes of such primes both land in
        // Inconclusive; the filter alone cannot tell them apart.
        assert_eq!(small_prime_test(&int(1031)), SmallPrimeVerdict::Inconclusive);
        assert_eq!(small_prime_test(&int(104_729)), SmallPrimeVerdict::Inconclusive);
        assert_eq!(
            small_prime_test(&int(1031 * 1033)),
            SmallPrimeVerdict::Inconclusive
        );
        // 1 has gcd 1 with everything.
        assert_eq!(small_prime_test(&int(1)), SmallPrimeVerdict::Inconclusive);
    }

    #[test]
    fn miller_rabin_passes_odd_primes() {
        for v in [3u64, 5, 13, 1009, 104_729, 1_000_003] {
            assert!(strong_miller_rabin(&int(v), 2), "{} is prime", v);
        }
    }

    #[test]
    fn miller_rabin_rejects_plain_composites() {
        for v in [15u64, 21, 25, 27, 33, 65, 1_000_005] {
            assert!(!strong_miller_rabin(&int(v), 2), "{} is composite", v);
        }
    }

    #[test]
    fn miller_rabin_admits_base_2_pseudoprimes() {
        // 2047 = 23 · 89 is the smallest strong pseudoprime to base 2.
        assert!(strong_miller_rabin(&int(2047), 2));
        assert!(strong_miller_rabin(&int(3_277), 2));
    }

    #[test]
    fn miller_rabin_rejects_base_sharing_a_factor() {
        assert!(!strong_miller_rabin(&int(9), 3));
    }

    #[test]
    #[should_panic(expected = "strong_miller_rabin")]
    fn miller_rabin_rejects_even_modulus() {
        strong_miller_rabin(&int(10), 2);
    }

    #[test]
    #[should_panic(expected = "strong_miller_rabin")]
    fn miller_rabin_rejects_base_below_two() {
        strong_miller_rabin(&int(7), 1);
    }

    #[test]
    fn lucas_passes_odd_primes() {
        for v in [3u64, 5, 7, 13, 1009, 104_729, 1_000_003] {
            assert!(strong_lucas_selfridge(&int(v)), "{} is prime", v);
        }
    }

    #[test]
    fn lucas_admits_its_pseudoprimes() {
        // First strong Lucas pseudoprimes with Selfridge parameters.
        for v in [5459u64, 5777, 10_877] {
            assert!(strong_lucas_selfridge(&int(v)), "{} passes Lucas", v);
        }
    }

    #[test]
    fn lucas_rejects_base_2_pseudoprimes() {
        // The complementary halves of BPSW must not overlap.
        for v in [2047u64, 3_277, 4_033] {
            assert!(!strong_lucas_selfridge(&int(v)), "{} fails Lucas", v);
        }
        assert!(!strong_miller_rabin(&int(5459), 2), "5459 fails MR base 2");
    }

    #[test]
    fn lucas_rejects_squares_and_plain_composites() {
        assert!(!strong_lucas_selfridge(&int(25)));
        assert!(!strong_lucas_selfridge(&int(3571 * 3571)));
        assert!(!strong_lucas_selfridge(&int(15)));
        assert!(!strong_lucas_selfridge(&int(1031 * 1033)));
    }

    #[test]
    #[should_panic(expected = "strong_lucas_selfridge")]
    fn lucas_rejects_even_modulus() {
        strong_lucas_selfridge(&int(8));
    }

    #[test]
    fn bpsw_handles_the_degenerate_inputs() {
        assert!(!bpsw(&Integer::new()));
        assert!(!bpsw(&int(1)));
        assert!(!bpsw(&Integer::from(-7)));
        assert!(bpsw(&int(2)));
        assert!(bpsw(&int(3)));
    }

    #[test]
    fn bpsw_rejects_what_either_half_rejects() {
        // Strong pseudoprimes to one half fail the other.
        assert!(!bpsw(&int(2047)));
        assert!(!bpsw(&int(5459)));
        assert!(!bpsw(&int(1031 * 1033)));
    }

    #[test]
    fn bpsw_accepts_large_primes() {
        // 2^127 − 1 and 2^89 − 1 are Mersenne primes.
        let m127 = (Integer::from(1) << 127u32) - 1u32;
        let m89 = (Integer::from(1) << 89u32) - 1u32;
        assert!(bpsw(&m127));
        assert!(bpsw(&m89));
        assert!(!bpsw(&Integer::from(&m127 * &m89)));
    }

    #[test]
    fn bpsw_matches_sieve_below_one_million() {
        const LIMIT: usize = 1_000_000;
        let mut composite = vec![false; LIMIT + 1];
        composite[0] = true;
        composite[1] = true;
        for n in 2..=LIMIT {
            if composite[n] {
                continue;
            }
            let mut m = n * n;
            while m <= LIMIT {
                composite[m] = true;
                m += n;
            }
        }
        for n in 0..=LIMIT {
            assert_eq!(
                bpsw(&Integer::from(n)),
                !composite[n],
                "bpsw disagrees with the sieve at {}",
                n
            );
        }
    }
}
