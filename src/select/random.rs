//! Random draw sources for trait rolls.
//!
//! Every roll consumes independent uniform draws in `[0, 1)`. Production code uses the process
//! thread RNG; tests and reproducible runs use a seeded ChaCha stream or a fixed draw sequence.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource {
    /// Next independent uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

#[derive(Clone, Copy, Debug, Default)]
/// Process-level RNG (`rand::thread_rng`). Not cryptographic, not reproducible.
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&mut self) -> f64 {
        rand::thread_rng().gen_range(0.0..1.0)
    }
}

#[derive(Clone, Debug)]
/// Seeded deterministic stream; identical seeds yield identical rolls on every platform.
pub struct SeededRandom(ChaCha8Rng);

impl SeededRandom {
    /// Stream seeded from a `u64`.
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.0.gen_range(0.0..1.0)
    }
}

#[derive(Clone, Debug)]
/// Replays a fixed list of draws, cycling when exhausted.
///
/// Values are clamped into `[0, 1)`; an empty list always yields `0.0`.
pub struct DrawSequence {
    draws: Vec<f64>,
    pos: usize,
}

impl DrawSequence {
    /// Sequence over `draws`.
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        Self {
            draws: draws.into(),
            pos: 0,
        }
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.pos
    }
}

impl RandomSource for DrawSequence {
    fn next_unit(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let v = self.draws[self.pos % self.draws.len()];
        self.pos += 1;
        if v.is_nan() {
            return 0.0;
        }
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
