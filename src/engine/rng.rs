//! Injectable randomness for AI markup.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Source of the two random draws AI markup makes per container.
pub trait MarkupRng {
    /// Uniform sample in `[low, high]`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// Returns true with probability `p`.
    fn chance(&mut self, p: f64) -> bool;
}

/// Pseudo-random source backed by `SmallRng`.
#[derive(Debug, Clone)]
pub struct SeededRng(SmallRng);

impl SeededRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        SeededRng(SmallRng::seed_from_u64(seed))
    }

    pub fn from_os_rng() -> Self {
        SeededRng(SmallRng::from_os_rng())
    }

    /// Seeded when `seed` is set, OS-seeded otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seed_from_u64(seed),
            None => Self::from_os_rng(),
        }
    }
}

impl MarkupRng for SeededRng {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        self.0.random_range(low..=high)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.0.random_bool(p.clamp(0.0, 1.0))
    }
}

/// Replays queued draws in order.
///
/// Once a queue runs dry, `uniform` returns the interval midpoint and `chance`
/// returns false.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    uniforms: VecDeque<f64>,
    flips: VecDeque<bool>,
}

impl ScriptedRng {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uniforms(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.uniforms.extend(values);
        self
    }

    pub fn with_flips(mut self, values: impl IntoIterator<Item = bool>) -> Self {
        self.flips.extend(values);
        self
    }
}

impl MarkupRng for ScriptedRng {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        self.uniforms
            .pop_front()
            .map(|v| v.clamp(low, high))
            .unwrap_or((low + high) / 2.0)
    }

    fn chance(&mut self, _p: f64) -> bool {
        self.flips.pop_front().unwrap_or(false)
    }
}
