//! Deterministic seeded PRNG
//!
//! mulberry32: a 32-bit counter advanced by `0x6D2B79F5` each call, then
//! scrambled with two multiply-xorshift rounds:
//!
//! ```text
//! a = a + 0x6D2B79F5
//! t = (a ^ (a >> 15)) * (a | 1)
//! t = t ^ (t + (t ^ (t >> 7)) * (t | 61))
//! out = t ^ (t >> 14)
//! ```
//!
//! All arithmetic wraps at 32 bits. Floats are `out / 2^32`, so always in [0, 1).

use serde::{Deserialize, Serialize};

const INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Seeded generator producing a reproducible stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rng {
    state: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next raw 32-bit output
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        let a = self.state;
        let mut t = (a ^ (a >> 15)).wrapping_mul(a | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next float in [0, 1)
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / TWO_POW_32
    }

    /// Float in [min, max)
    #[inline]
    pub fn range(&mut self, (min, max): (f64, f64)) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Integer in [min, max] (inclusive)
    #[inline]
    pub fn range_u32(&mut self, (min, max): (u32, u32)) -> u32 {
        let span = (max - min) as f64 + 1.0;
        min + (self.next_f64() * span) as u32
    }

    /// True with probability `p`
    #[inline]
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// -1.0 or 1.0 with equal odds
    #[inline]
    pub fn signum(&mut self) -> f64 {
        if self.next_f64() < 0.5 { -1.0 } else { 1.0 }
    }
}

/// Chunk-local seed for `(run_seed, chunk_index)`
///
/// Golden-ratio spread of the chunk index, then the murmur3 finalizer.
pub fn chunk_seed(run_seed: u32, chunk_index: u32) -> u32 {
    let mut h = run_seed ^ chunk_index.wrapping_add(1).wrapping_mul(0x9E37_79B1);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^= h >> 16;
    h
}
