//! Injectable random sources for terrain generation.
//!
//! Generation code never reaches for a global RNG; it pulls scalars from a
//! [`RandomSource`] so tests can pin the output with a seed or a scripted
//! sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A stream of uniform scalars in `[0, 1)`.
pub trait RandomSource {
    fn next_f32(&mut self) -> f32;

    /// Uniform scalar in `[min, max)`.
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }
}

/// Adapter that turns any `rand` generator into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<StdRng> {
    /// Reproducible source: the same seed always yields the same stream.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Non-reproducible source seeded from the OS.
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_f32(&mut self) -> f32 {
        self.0.gen::<f32>()
    }
}

/// Replays a fixed list of values, wrapping around at the end.
///
/// Values are clamped into `[0, 1)` so scripted tests cannot push a sampler
/// outside its documented range.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, cursor: 0 }
    }

    /// A source that always returns `value`.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceSource {
    fn next_f32(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value.clamp(0.0, 1.0 - f32::EPSILON)
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_f32(&mut self) -> f32 {
        (**self).next_f32()
    }
}
