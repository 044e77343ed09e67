//! Converts densities, volumes and target mass fractions into a species
//! probability vector and its cumulative distribution.
//!
//! Two modes are available:
//! - [TwoSpeciesSplit]: the classic A/B mixture driven by the mass fraction of B.
//! - [ratio_table]: any number of species, each with its own mass fraction.
//!
//! Both produce a [Composition] whose order follows species declaration order.
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::composition::{SpeciesIndex, SpeciesParameters};
use crate::error::{Error, Result};

/// Normalised species probabilities plus their running sums.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    probabilities: Vec<f64>,
    cumulative_sums: Vec<f64>,
}

impl Composition {
    /// Builds a composition from non-negative weights, normalising them to sum to one.
    pub fn from_weights(weights: &[f64]) -> Result<Self> {
        if weights.is_empty() {
            return Err(Error::InvalidComposition(
                "at least one species weight is required".into(),
            ));
        }
        if let Some((i, w)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !(w.is_finite() && **w >= 0.0))
        {
            return Err(Error::InvalidComposition(format!(
                "weight of species {i} must be finite and >= 0, got {w}"
            )));
        }

        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(Error::InvalidComposition(
                "species weights sum to zero".into(),
            ));
        }

        let probabilities: Vec<f64> = weights.iter().map(|w| w / total).collect();
        let cumulative_sums = probabilities
            .iter()
            .scan(0.0, |acc, p| {
                *acc += p;
                Some(*acc)
            })
            .collect();

        Ok(Self {
            probabilities,
            cumulative_sums,
        })
    }

    /// Probability of each species, in declaration order.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Running sums of [`Self::probabilities`]; the last entry is one up to rounding.
    pub fn cumulative_sums(&self) -> &[f64] {
        &self.cumulative_sums
    }

    pub fn species_count(&self) -> usize {
        self.probabilities.len()
    }

    pub fn probability(&self, species: SpeciesIndex) -> Option<f64> {
        self.probabilities.get(species).copied()
    }

    /// Expected number of particles of each species among `total_slots` draws.
    pub fn expected_counts(&self, total_slots: usize) -> Vec<f64> {
        self.probabilities
            .iter()
            .map(|p| p * total_slots as f64)
            .collect()
    }
}

/// Rejects mass fractions for which the ratio arithmetic is undefined.
fn check_mass_fraction(species: SpeciesIndex, mass_fraction: f64) -> Result<()> {
    if mass_fraction.is_finite() && mass_fraction > 0.0 && mass_fraction < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidComposition(format!(
            "mass fraction of species {species} must lie strictly between 0 and 1, got {mass_fraction}"
        )))
    }
}

/// Number split for a two-species mixture, derived from the mass fraction of B.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwoSpeciesSplit {
    /// Mass ratio of one B particle to one A particle.
    pub beta: f64,
    /// Number ratio of B particles to A particles.
    pub alpha: f64,
    /// Probability that a slot holds a B particle.
    pub probability_b: f64,
}

impl TwoSpeciesSplit {
    pub fn new(a: &SpeciesParameters, b: &SpeciesParameters, mass_fraction_b: f64) -> Result<Self> {
        check_mass_fraction(1, mass_fraction_b)?;
        let mass_a = a.particle_mass()?;
        let mass_b = b.particle_mass()?;

        let beta = mass_b / mass_a;
        let alpha = (1.0 / beta) * (mass_fraction_b / (1.0 - mass_fraction_b));
        let probability_b = alpha / (1.0 + alpha);
        debug!(beta, alpha, probability_b, "Solved two-species split.");

        Ok(Self {
            beta,
            alpha,
            probability_b,
        })
    }

    pub fn probability_a(&self) -> f64 {
        1.0 - self.probability_b
    }

    /// Number of B particles to generate among `total_slots`.
    ///
    /// Rounds up, so at least one B particle is requested whenever there is a slot.
    pub fn target_count_b(&self, total_slots: usize) -> usize {
        let n = (self.probability_b * total_slots as f64).ceil();
        (n as usize).min(total_slots)
    }

    /// The exact A/B composition.
    pub fn composition(&self) -> Result<Composition> {
        Composition::from_weights(&[self.probability_a(), self.probability_b])
    }

    /// The composition sampled for a run of `total_slots`, built from the
    /// rounded-up B count rather than the exact probability.
    pub fn composition_for_slots(&self, total_slots: usize) -> Result<Composition> {
        if total_slots == 0 {
            return Err(Error::InvalidConfig("total slot count must be > 0".into()));
        }
        let count_b = self.target_count_b(total_slots);
        let fraction_b = count_b as f64 / total_slots as f64;
        Composition::from_weights(&[1.0 - fraction_b, fraction_b])
    }
}

/// Composition for any number of species, each carrying its own mass fraction.
///
/// The number probability of species `i` is proportional to its mass fraction
/// divided by the mass of one of its particles.
pub fn ratio_table(species: &[SpeciesParameters]) -> Result<Composition> {
    if species.len() < 2 {
        return Err(Error::InvalidComposition(format!(
            "ratio table needs at least 2 species, got {}",
            species.len()
        )));
    }

    let mut weights = Vec::with_capacity(species.len());
    for (i, s) in species.iter().enumerate() {
        check_mass_fraction(i, s.mass_fraction)?;
        weights.push(s.mass_fraction / s.particle_mass()?);
    }

    Composition::from_weights(&weights)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn unit_species(mass_fraction: f64) -> SpeciesParameters {
        // a square prism with circumradius sqrt(0.5) has unit volume
        SpeciesParameters::new(4, 0.5f64.sqrt(), 1.0, 1.0, mass_fraction)
    }

    #[test]
    fn equal_particles_split_evenly() {
        let a = unit_species(0.5);
        let b = unit_species(0.5);
        let split = TwoSpeciesSplit::new(&a, &b, 0.5).unwrap();
        assert!((split.beta - 1.0).abs() < 1e-12);
        assert!((split.alpha - 1.0).abs() < 1e-12);
        assert!((split.probability_b - 0.5).abs() < 1e-12);
        assert_eq!(split.target_count_b(10), 5);
    }

    #[test]
    fn boundary_mass_fractions_are_rejected() {
        let a = unit_species(0.5);
        let b = unit_species(0.5);
        for x in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(
                matches!(
                    TwoSpeciesSplit::new(&a, &b, x),
                    Err(Error::InvalidComposition(_))
                ),
                "x_B = {x} should be rejected"
            );
        }
    }

    #[test]
    fn target_count_tracks_mass_fraction_limits() {
        let a = unit_species(0.5);
        let b = unit_species(0.5);
        let total = 1000;

        let low = TwoSpeciesSplit::new(&a, &b, 1e-9).unwrap();
        assert_eq!(low.target_count_b(total), 1);
        assert!(low.probability_b < 1e-8);

        let high = TwoSpeciesSplit::new(&a, &b, 1.0 - 1e-9).unwrap();
        assert_eq!(high.target_count_b(total), total);
    }

    #[test]
    fn heavier_b_particles_need_fewer_slots() {
        let a = unit_species(0.5);
        let mut b = unit_species(0.5);
        b.density = 3.0;
        let split = TwoSpeciesSplit::new(&a, &b, 0.5).unwrap();
        assert!((split.beta - 3.0).abs() < 1e-12);
        assert!((split.probability_b - 0.25).abs() < 1e-12);
        assert_eq!(split.target_count_b(10), 3);
    }

    #[test]
    fn slot_composition_uses_rounded_count() {
        let a = unit_species(0.5);
        let mut b = unit_species(0.5);
        b.density = 3.0;
        let split = TwoSpeciesSplit::new(&a, &b, 0.5).unwrap();
        let c = split.composition_for_slots(10).unwrap();
        assert!((c.probabilities()[1] - 0.3).abs() < 1e-12);
        assert!((c.cumulative_sums()[1] - 1.0).abs() < 1e-12);

        assert!(matches!(
            split.composition_for_slots(0),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn ratio_table_agrees_with_two_species_mode() {
        let a = SpeciesParameters::new(6, 0.1, 0.2, 2.5, 0.3);
        let b = SpeciesParameters::new(6, 0.15, 0.05, 1.2, 0.7);
        let table = ratio_table(&[a.clone(), b.clone()]).unwrap();
        let split = TwoSpeciesSplit::new(&a, &b, 0.7).unwrap();
        assert!((table.probabilities()[1] - split.probability_b).abs() < 1e-12);
        assert!((table.probabilities()[0] - split.probability_a()).abs() < 1e-12);
    }

    #[test]
    fn ratio_table_rejects_bad_inputs() {
        let a = unit_species(0.5);
        assert!(matches!(
            ratio_table(std::slice::from_ref(&a)),
            Err(Error::InvalidComposition(_))
        ));
        assert!(matches!(
            ratio_table(&[a.clone(), unit_species(1.0)]),
            Err(Error::InvalidComposition(_))
        ));
        let flat = SpeciesParameters::new(2, 1.0, 1.0, 1.0, 0.5);
        assert!(matches!(
            ratio_table(&[a, flat]),
            Err(Error::InvalidGeometry(_))
        ));
    }

    #[test]
    fn probabilities_sum_to_one_for_random_parameter_sets() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        for _ in 0..200 {
            let count = 2 + (rng.random::<f64>() * 5.0) as usize;
            let species: Vec<_> = (0..count)
                .map(|_| {
                    SpeciesParameters::new(
                        3 + (rng.random::<f64>() * 10.0) as u32,
                        0.01 + rng.random::<f64>(),
                        0.01 + rng.random::<f64>(),
                        0.1 + rng.random::<f64>() * 10.0,
                        0.01 + rng.random::<f64>() * 0.98,
                    )
                })
                .collect();

            let c = ratio_table(&species).unwrap();
            let sum: f64 = c.probabilities().iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
            assert!(c.probabilities().iter().all(|p| *p >= 0.0));
            assert!(c.cumulative_sums().windows(2).all(|w| w[0] <= w[1]));
            assert!((c.cumulative_sums()[count - 1] - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn from_weights_validates_and_normalises() {
        let c = Composition::from_weights(&[1.0, 3.0]).unwrap();
        assert_eq!(c.probabilities(), &[0.25, 0.75]);
        assert_eq!(c.cumulative_sums(), &[0.25, 1.0]);
        assert_eq!(c.expected_counts(8), vec![2.0, 6.0]);
        assert_eq!(c.probability(1), Some(0.75));
        assert_eq!(c.probability(2), None);

        assert!(Composition::from_weights(&[]).is_err());
        assert!(Composition::from_weights(&[0.0, 0.0]).is_err());
        assert!(Composition::from_weights(&[1.0, -1.0]).is_err());
    }
}
