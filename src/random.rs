//! Injectable random source for variant selection.
//!
//! Selection only ever needs "pick one of these uniformly", so the seam is a
//! tiny trait rather than a full RNG API. [`Xorshift64`] is the production
//! implementation: deterministic for a given seed, which is what makes a
//! `--rng-seed` run reproducible and lets tests pin exact picks.

use std::time::{SystemTime, UNIX_EPOCH};

pub trait RandomSource {
    /// Next raw 64-bit value.
    fn next_u64(&mut self) -> u64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "cannot pick from an empty slice");
        (self.next_u64() % len as u64) as usize
    }

    /// Pick one element uniformly, `None` for an empty slice.
    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.index(items.len())])
        }
    }
}

/// xorshift64 PRNG. Not cryptographic; only needs to be fast and repeatable.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    pub fn new(seed: u64) -> Self {
        // Zero is a fixed point of xorshift.
        Self {
            state: seed.max(1),
        }
    }

    /// Seed from the wall clock, for runs without `--rng-seed`.
    pub fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9e37_79b9_7f4a_7c15);
        Self::new(nanos)
    }
}

impl RandomSource for Xorshift64 {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

/// A source that replays a fixed script of indices, wrapping modulo `len`.
#[cfg(test)]
pub(crate) struct Scripted(pub std::collections::VecDeque<u64>);

#[cfg(test)]
impl RandomSource for Scripted {
    fn next_u64(&mut self) -> u64 {
        self.0.pop_front().unwrap_or(0)
    }
}
