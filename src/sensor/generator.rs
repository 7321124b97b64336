//! Pseudo-random sensor value generator
//!
//! A linear congruential generator standing in for a real sensor. The seed
//! is reduced modulo 2^32 after every step and the exposed reading is the
//! seed shifted right by 16, so readings fall in `[0, 2^16)`.

use crate::config::generator::{INCREMENT, MODULUS_MASK, MULTIPLIER, OPERATIONAL_SEED};

/// Advance `seed` by one LCG step.
///
/// Returns the next seed and the reading derived from it. The product is
/// computed with wrapping 64-bit arithmetic; since 2^32 divides 2^64 the
/// reduced seed equals the exact `(MULTIPLIER * seed + INCREMENT) mod 2^32`.
pub const fn step(seed: u64) -> (u64, u32) {
    let next = MULTIPLIER.wrapping_mul(seed).wrapping_add(INCREMENT) & MODULUS_MASK;
    (next, (next >> 16) as u32)
}

/// Stateful wrapper holding the current seed.
#[derive(Debug, Clone)]
pub struct ValueGenerator {
    seed: u64,
}

impl ValueGenerator {
    /// Create a generator starting from `seed`
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Advance the generator and return the new reading
    pub fn next_value(&mut self) -> u32 {
        let (seed, output) = step(self.seed);
        self.seed = seed;
        output
    }

    /// Current seed
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the sequence from `seed`
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
    }
}

impl Default for ValueGenerator {
    fn default() -> Self {
        Self::new(OPERATIONAL_SEED)
    }
}
