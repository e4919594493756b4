//! Fixed-length rolling metric windows.

use std::collections::VecDeque;

use crate::noise::NoiseSource;

/// Random-walk parameters for a [`MetricSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesBounds {
    /// Largest step, in either direction, between consecutive samples.
    pub delta: i32,
    /// Lowest value a new sample may take.
    pub low: i32,
    /// Highest value a new sample may take.
    pub high: i32,
}

impl SeriesBounds {
    /// Memory usage: steps of up to 10 points, kept within 10–90%.
    pub const MEMORY: Self = Self {
        delta: 10,
        low: 10,
        high: 90,
    };

    /// Network traffic: steps of up to 15 points, kept within 5–95%.
    pub const NETWORK: Self = Self {
        delta: 15,
        low: 5,
        high: 95,
    };

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.low, self.high.max(self.low))
    }
}

/// Ordered window of recent samples whose length never changes.
///
/// Each [`step`](Self::step) drops the oldest sample and appends the previous
/// newest sample plus a bounded random delta, clamped to the bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSeries {
    samples: VecDeque<i32>,
    bounds: SeriesBounds,
}

impl MetricSeries {
    /// Build a series from seed samples. Seeds are kept as given; an empty
    /// seed becomes a single sample at the lower bound.
    pub fn new(seed: impl IntoIterator<Item = i32>, bounds: SeriesBounds) -> Self {
        let mut samples: VecDeque<i32> = seed.into_iter().collect();
        if samples.is_empty() {
            samples.push_back(bounds.low);
        }
        Self { samples, bounds }
    }

    /// Advance the walk by one sample and return the new sample.
    pub fn step<N: NoiseSource + ?Sized>(&mut self, noise: &mut N) -> i32 {
        let last = self.last();
        let delta = noise.uniform(-self.bounds.delta, self.bounds.delta);
        let next = self.bounds.clamp(last.saturating_add(delta));
        self.samples.pop_front();
        self.samples.push_back(next);
        next
    }

    pub fn bounds(&self) -> SeriesBounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Newest sample.
    pub fn last(&self) -> i32 {
        self.samples.back().copied().unwrap_or(self.bounds.low)
    }

    pub fn min(&self) -> i32 {
        self.samples.iter().copied().min().unwrap_or(self.bounds.low)
    }

    pub fn max(&self) -> i32 {
        self.samples.iter().copied().max().unwrap_or(self.bounds.low)
    }

    /// Samples oldest first.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.samples.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<i32> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{RngNoise, ScriptedNoise};

    #[test]
    fn step_drops_oldest_and_appends() {
        let mut series = MetricSeries::new([30, 15, 25], SeriesBounds::MEMORY);
        let mut noise = ScriptedNoise::new().with_uniforms([7]);
        assert_eq!(series.step(&mut noise), 32);
        assert_eq!(series.to_vec(), vec![15, 25, 32]);
    }

    #[test]
    fn step_clamps_to_bounds() {
        let mut series = MetricSeries::new([85], SeriesBounds::MEMORY);
        let mut noise = ScriptedNoise::new().with_uniforms([10, -10, -10, -10, -10, -10, -10, -10, -10, -10]);
        assert_eq!(series.step(&mut noise), 90);
        for _ in 0..9 {
            series.step(&mut noise);
        }
        assert_eq!(series.last(), 10);
    }

    #[test]
    fn length_is_constant() {
        let mut series = MetricSeries::new([40, 20, 60, 15, 30, 45, 55, 35, 25], SeriesBounds::NETWORK);
        let mut noise = RngNoise::seeded(11);
        for _ in 0..1000 {
            series.step(&mut noise);
            assert_eq!(series.len(), 9);
        }
    }

    #[test]
    fn walk_never_leaves_bounds() {
        for bounds in [SeriesBounds::MEMORY, SeriesBounds::NETWORK] {
            let mut series = MetricSeries::new([50; 8], bounds);
            let mut noise = RngNoise::seeded(2024);
            for _ in 0..5000 {
                let v = series.step(&mut noise);
                assert!(v >= bounds.low && v <= bounds.high, "{v} outside {bounds:?}");
            }
        }
    }

    #[test]
    fn empty_seed_starts_at_low_bound() {
        let series = MetricSeries::new([], SeriesBounds::NETWORK);
        assert_eq!(series.len(), 1);
        assert_eq!(series.last(), 5);
    }

    #[test]
    fn min_max_track_window() {
        let series = MetricSeries::new([30, 15, 25, 40, 35, 45, 60, 70], SeriesBounds::MEMORY);
        assert_eq!(series.min(), 15);
        assert_eq!(series.max(), 70);
        assert_eq!(series.last(), 70);
    }
}
