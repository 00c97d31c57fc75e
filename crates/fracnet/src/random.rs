//! Shared uniform random stream.
//!
//! Every stochastic step in a run (population generation, scanline layout,
//! optimizer moves, acceptance coins) pulls from one sequential stream
//! through [`UniformSource`]. One seed reproduces the whole pipeline, and a
//! scripted sequence can drive any single component deterministically in
//! tests.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// A sequential stream of uniform doubles in `[0, 1)`.
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;

    /// Next value scaled into `[lo, hi)`.
    #[inline]
    fn next_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_uniform()
    }
}

/// Production stream: `StdRng` behind a fixed `u64` seed.
pub struct SeededUniform {
    rng: StdRng,
}

impl SeededUniform {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl UniformSource for SeededUniform {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        // Top 53 bits of the raw draw give a uniform double in [0, 1).
        let raw = self.rng.next_u64();
        (raw >> 11) as f64 / ((1u64 << 53) as f64)
    }
}

/// Fixed sequence for tests and replay; cycles when exhausted.
pub struct ScriptedUniform {
    values: Vec<f64>,
    at: usize,
}

impl ScriptedUniform {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, at: 0 }
    }

    /// Number of values handed out so far.
    pub fn consumed(&self) -> usize {
        self.at
    }
}

impl UniformSource for ScriptedUniform {
    fn next_uniform(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.at % self.values.len()];
        self.at += 1;
        v
    }
}
