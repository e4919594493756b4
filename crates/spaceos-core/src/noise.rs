//! Randomness seam for the telemetry simulator.
//!
//! Every stochastic decision the updater makes goes through the
//! [`NoiseSource`] trait. Production runs use [`RngNoise`] over a seedable
//! `rand` generator; tests replay exact draws with [`ScriptedNoise`].

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of the three kinds of draws the simulator needs.
pub trait NoiseSource {
    /// Uniform integer in `[low, high]`, both ends inclusive.
    /// Returns `low` when the range is empty or a single value.
    fn uniform(&mut self, low: i32, high: i32) -> i32;

    /// `true` with probability `p` (clamped to `[0, 1]`).
    fn chance(&mut self, p: f64) -> bool;

    /// Uniform index in `0..len`. Returns 0 when `len` is 0 or 1.
    fn index(&mut self, len: usize) -> usize;
}

// ---------------------------------------------------------------------------
// RngNoise
// ---------------------------------------------------------------------------

/// [`NoiseSource`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngNoise<R = StdRng> {
    rng: R,
}

impl RngNoise<StdRng> {
    /// Deterministic generator: the same seed replays the same telemetry.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl<R: Rng> RngNoise<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> NoiseSource for RngNoise<R> {
    fn uniform(&mut self, low: i32, high: i32) -> i32 {
        if low >= high {
            return low;
        }
        self.rng.random_range(low..=high)
    }

    fn chance(&mut self, p: f64) -> bool {
        if p.is_nan() {
            return false;
        }
        self.rng.random_bool(p.clamp(0.0, 1.0))
    }

    fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}

// ---------------------------------------------------------------------------
// ScriptedNoise
// ---------------------------------------------------------------------------

/// Replays queued draws in order, for exact, headless tests.
///
/// Each draw kind has its own queue. When a queue runs dry the source goes
/// quiet: `uniform` yields the in-range value closest to zero, `chance`
/// yields `false` and `index` yields 0. A quiet source therefore holds every
/// random walk still and never fires a stochastic event.
#[derive(Debug, Clone, Default)]
pub struct ScriptedNoise {
    uniforms: VecDeque<i32>,
    chances: VecDeque<bool>,
    indices: VecDeque<usize>,
}

impl ScriptedNoise {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue results for [`NoiseSource::uniform`].
    pub fn with_uniforms(mut self, values: impl IntoIterator<Item = i32>) -> Self {
        self.uniforms.extend(values);
        self
    }

    /// Queue results for [`NoiseSource::chance`].
    pub fn with_chances(mut self, values: impl IntoIterator<Item = bool>) -> Self {
        self.chances.extend(values);
        self
    }

    /// Queue results for [`NoiseSource::index`].
    pub fn with_indices(mut self, values: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(values);
        self
    }

    /// Number of queued draws not yet consumed, across all kinds.
    pub fn remaining(&self) -> usize {
        self.uniforms.len() + self.chances.len() + self.indices.len()
    }
}

impl NoiseSource for ScriptedNoise {
    fn uniform(&mut self, low: i32, high: i32) -> i32 {
        // Scripted values are clamped so a script can never break the
        // caller's range contract.
        let hi = high.max(low);
        self.uniforms
            .pop_front()
            .unwrap_or(0)
            .clamp(low, hi)
    }

    fn chance(&mut self, _p: f64) -> bool {
        self.chances.pop_front().unwrap_or(false)
    }

    fn index(&mut self, len: usize) -> usize {
        let i = self.indices.pop_front().unwrap_or(0);
        if len == 0 { 0 } else { i.min(len - 1) }
    }
}
