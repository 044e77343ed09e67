//! Slot planning: where each particle goes and which species it is.
//!
//! A [Layout] enumerates slots in a fixed order and asks a
//! [sampler::WeightedSampler] for each slot's species. The resulting
//! [PlacementPlan] holds one [PlacementRequest] per slot, the running
//! [RunState] counts, and the extent of the container that will hold them.
use glam::DVec3;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::composition::SpeciesIndex;
use crate::error::Result;

pub mod grid;
pub mod sampler;
pub mod stacked;

pub use grid::GridLayout;
pub use sampler::WeightedSampler;
pub use stacked::StackedLayout;

/// One particle to be materialised.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRequest {
    /// Position of the slot in planning order.
    pub slot: usize,
    pub species: SpeciesIndex,
    pub location: DVec3,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: [f64; 3],
}

/// Running per-species counts for a planning pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    seed: Option<f64>,
    counts_by_species: Vec<usize>,
    total_slots: usize,
}

impl RunState {
    pub fn new(seed: Option<f64>, species_count: usize, total_slots: usize) -> Self {
        Self {
            seed,
            counts_by_species: vec![0; species_count],
            total_slots,
        }
    }

    /// Count one placed particle of `species`.
    pub fn record(&mut self, species: SpeciesIndex) {
        if let Some(count) = self.counts_by_species.get_mut(species) {
            *count += 1;
        }
    }

    pub fn seed(&self) -> Option<f64> {
        self.seed
    }

    pub fn counts_by_species(&self) -> &[usize] {
        &self.counts_by_species
    }

    pub fn total_slots(&self) -> usize {
        self.total_slots
    }

    pub fn placed(&self) -> usize {
        self.counts_by_species.iter().sum()
    }

    /// Whether every slot has been assigned.
    pub fn is_complete(&self) -> bool {
        self.placed() == self.total_slots
    }

    /// Achieved share of particles per species.
    pub fn number_fractions(&self) -> Vec<f64> {
        let placed = self.placed();
        if placed == 0 {
            return vec![0.0; self.counts_by_species.len()];
        }
        self.counts_by_species
            .iter()
            .map(|c| *c as f64 / placed as f64)
            .collect()
    }

    /// Achieved share of mass per species, given the mass of one particle of each.
    pub fn mass_fractions(&self, particle_masses: &[f64]) -> Vec<f64> {
        let masses: Vec<f64> = self
            .counts_by_species
            .iter()
            .zip(particle_masses)
            .map(|(c, m)| *c as f64 * m)
            .collect();
        let total: f64 = masses.iter().sum();
        if total <= 0.0 {
            return vec![0.0; masses.len()];
        }
        masses.into_iter().map(|m| m / total).collect()
    }
}

/// Inner dimensions of the open-top container around the planned slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerExtent {
    /// Side length of the square floor.
    pub side: f64,
    pub height: f64,
}

/// Output of a planning pass.
#[derive(Debug, Clone)]
pub struct PlacementPlan {
    pub requests: Vec<PlacementRequest>,
    pub state: RunState,
    pub container: ContainerExtent,
}

/// How slots are laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Layout {
    /// Regular 3D grid, one particle per cell.
    Grid(GridLayout),
    /// A single column of particles stacked by their self-avoidance radii.
    Stacked(StackedLayout),
}

impl Layout {
    pub fn slot_count(&self) -> usize {
        match self {
            Layout::Grid(grid) => grid.slot_count(),
            Layout::Stacked(stacked) => stacked.count,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Layout::Grid(grid) => grid.validate(),
            Layout::Stacked(stacked) => stacked.validate(),
        }
    }

    /// Plan every slot.
    ///
    /// `footprints` holds the self-avoidance radius of each species as it will
    /// be materialised; `wall_thickness` is the container wall thickness.
    pub fn plan<R: RngCore>(
        &self,
        sampler: &mut WeightedSampler<R>,
        footprints: &[f64],
        wall_thickness: f64,
    ) -> Result<PlacementPlan> {
        match self {
            Layout::Grid(grid) => grid.plan(sampler),
            Layout::Stacked(stacked) => stacked.plan(sampler, footprints, wall_thickness),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_state_tracks_counts_and_fractions() {
        let mut state = RunState::new(Some(3.5), 2, 4);
        assert!(!state.is_complete());
        for s in [0, 1, 1, 1] {
            state.record(s);
        }
        assert!(state.is_complete());
        assert_eq!(state.counts_by_species(), &[1, 3]);
        assert_eq!(state.number_fractions(), vec![0.25, 0.75]);
        // one A particle weighs as much as three B particles
        assert_eq!(state.mass_fractions(&[3.0, 1.0]), vec![0.5, 0.5]);
        assert_eq!(state.seed(), Some(3.5));
    }

    #[test]
    fn empty_run_state_reports_zero_fractions() {
        let state = RunState::new(None, 3, 0);
        assert!(state.is_complete());
        assert_eq!(state.number_fractions(), vec![0.0; 3]);
        assert_eq!(state.mass_fractions(&[1.0, 1.0, 1.0]), vec![0.0; 3]);
    }

    #[test]
    fn layout_deserialises_from_tagged_json() {
        let json = r#"{"mode":"grid","counts":[2,3,4],"distance":0.5}"#;
        let layout: Layout = serde_json::from_str(json).unwrap();
        assert_eq!(layout.slot_count(), 24);

        let json = r#"{"mode":"stacked","count":7,"container_side":2.0}"#;
        let layout: Layout = serde_json::from_str(json).unwrap();
        assert_eq!(layout, Layout::Stacked(StackedLayout::new(7, 2.0)));
    }
}
