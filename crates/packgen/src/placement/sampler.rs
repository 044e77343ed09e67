//! Seeded species sampling over a cumulative distribution.
use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::composition::{Composition, SpeciesIndex};

/// Generate a random float in the range [0, 1) from 53 random bits.
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// The RNG used for a run seeded with `seed`.
///
/// The seed's bit pattern is used so that any persisted seed value, integral
/// or not, reproduces the same stream.
pub fn seeded_rng(seed: f64) -> StdRng {
    StdRng::seed_from_u64(seed.to_bits())
}

/// Maps a uniform draw onto a species index.
///
/// The result is the number of cumulative sums that `u` strictly exceeds, so a
/// draw equal to `cumulative_sums[i]` stays with species `i`. Draws above the
/// final sum (possible only through rounding) map to the last species.
#[inline]
pub fn species_for_draw(cumulative_sums: &[f64], u: f64) -> SpeciesIndex {
    let idx = cumulative_sums.partition_point(|&c| u > c);
    idx.min(cumulative_sums.len().saturating_sub(1))
}

/// Draws species assignments and orientations from a single owned RNG.
///
/// The sampler is never reseeded: the same seed and the same sequence of calls
/// always reproduce the same values.
#[derive(Debug, Clone)]
pub struct WeightedSampler<R: RngCore = StdRng> {
    rng: R,
    composition: Composition,
    seed: Option<f64>,
}

impl WeightedSampler<StdRng> {
    /// Create a sampler whose RNG is derived from `seed`.
    pub fn seeded(composition: Composition, seed: f64) -> Self {
        Self {
            rng: seeded_rng(seed),
            composition,
            seed: Some(seed),
        }
    }
}

impl<R: RngCore> WeightedSampler<R> {
    /// Create a sampler over an injected RNG.
    pub fn new(composition: Composition, rng: R) -> Self {
        Self {
            rng,
            composition,
            seed: None,
        }
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// Seed the RNG was derived from, if it was created with [`WeightedSampler::seeded`].
    pub fn seed(&self) -> Option<f64> {
        self.seed
    }

    /// One uniform draw in [0, 1).
    pub fn draw_unit(&mut self) -> f64 {
        rand01(&mut self.rng)
    }

    /// Pick the species for one slot, consuming exactly one uniform draw.
    pub fn draw_species(&mut self) -> SpeciesIndex {
        let u = self.draw_unit();
        species_for_draw(self.composition.cumulative_sums(), u)
    }

    /// Three independent Euler angles in [0, 2π).
    pub fn draw_rotation(&mut self) -> [f64; 3] {
        let x = self.draw_unit() * TAU;
        let y = self.draw_unit() * TAU;
        let z = self.draw_unit() * TAU;
        [x, y, z]
    }
}
