//! # Tables — Precomputed Process-Wide Constants
//!
//! Three read-only tables derived once at first use and shared by every
//! caller afterwards:
//!
//! 1. `primes_under_1024` — every prime below 2^10, in order (172 of them).
//! 2. `prod_small_primes` — their product, a single squarefree `Integer`;
//!    `gcd(n, prod) == 1` iff `n` has no prime factor below 2^10.
//! 3. `wheel_delta[r]` — for each residue `r` mod 210 = 2·3·5·7, the
//!    distance to the next integer coprime to 210. Always positive, so the
//!    stepper `i ← (i + Δ[i]) mod 210` never stalls; `wheel_delta[0] = 1`.

use std::sync::OnceLock;

use rug::Integer;

/// Modulus of the candidate wheel, the product of the one-digit primes.
pub(crate) const WHEEL_MODULUS: usize = 210;

pub(crate) struct Tables {
    pub primes_under_1024: Vec<u32>,
    pub prod_small_primes: Integer,
    pub wheel_delta: [u32; WHEEL_MODULUS],
}

static TABLES: OnceLock<Tables> = OnceLock::new();

/// The shared tables, built on first access.
pub(crate) fn tables() -> &'static Tables {
    TABLES.get_or_init(Tables::build)
}

impl Tables {
    fn build() -> Self {
        let primes_under_1024 = sieve_primes_below(1 << 10);
        let mut prod_small_primes = Integer::from(1u32);
        for &p in &primes_under_1024 {
            prod_small_primes *= p;
        }

        let mut wheel_delta = [0u32; WHEEL_MODULUS];
        for (r, delta) in wheel_delta.iter_mut().enumerate() {
            let mut d = 1u32;
            while gcd_u32(r as u32 + d, WHEEL_MODULUS as u32) != 1 {
                d += 1;
            }
            *delta = d;
        }

        Tables {
            primes_under_1024,
            prod_small_primes,
            wheel_delta,
        }
    }
}

/// Plain sieve of Eratosthenes. The limit here is tiny (2^10), so no wheel
/// packing or segmenting is worth the code.
fn sieve_primes_below(limit: u32) -> Vec<u32> {
    let limit = limit as usize;
    let mut composite = vec![false; limit];
    let mut primes = Vec::new();
    for n in 2..limit {
        if composite[n] {
            continue;
        }
        primes.push(n as u32);
        let mut m = n * n;
        while m < limit {
            composite[m] = true;
            m += n;
        }
    }
    primes
}

fn gcd_u32(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}
