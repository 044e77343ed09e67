//! Stacked slot layout: particles dropped one above the other at random
//! horizontal offsets.
use glam::DVec3;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::placement::{
    ContainerExtent, PlacementPlan, PlacementRequest, RunState, WeightedSampler,
};

/// `count` particles stacked inside a square container of side `container_side`.
///
/// Each particle sits above the previous one, separated by the sum of both
/// self-avoidance radii, so no two particles start overlapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedLayout {
    pub count: usize,
    pub container_side: f64,
}

impl StackedLayout {
    pub fn new(count: usize, container_side: f64) -> Self {
        Self {
            count,
            container_side,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(Error::InvalidConfig("stacked count must be > 0".into()));
        }
        if !(self.container_side.is_finite() && self.container_side > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "container side must be > 0, got {}",
                self.container_side
            )));
        }
        Ok(())
    }

    /// Half-width of the horizontal generation area for a particle with
    /// self-avoidance radius `footprint`.
    pub fn generation_bound(&self, footprint: f64, wall_thickness: f64) -> f64 {
        self.container_side * 0.5 - footprint - wall_thickness
    }

    /// Plan every slot, drawing species, x, y and rotation in that order.
    pub fn plan<R: RngCore>(
        &self,
        sampler: &mut WeightedSampler<R>,
        footprints: &[f64],
        wall_thickness: f64,
    ) -> Result<PlacementPlan> {
        self.validate()?;
        let species_count = sampler.composition().species_count();
        if footprints.len() != species_count {
            return Err(Error::InvalidConfig(format!(
                "expected {species_count} species footprints, got {}",
                footprints.len()
            )));
        }
        for (species, &footprint) in footprints.iter().enumerate() {
            if self.generation_bound(footprint, wall_thickness) <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "container side {} leaves no room for species {species} \
                     (self-avoidance radius {footprint}, wall {wall_thickness})",
                    self.container_side
                )));
            }
        }

        let mut state = RunState::new(sampler.seed(), species_count, self.count);
        let mut requests = Vec::with_capacity(self.count);
        let mut previous: Option<(f64, f64)> = None;

        for slot in 0..self.count {
            let species = sampler.draw_species();
            state.record(species);

            let footprint = footprints[species];
            let z = match previous {
                Some((z, below)) => z + below + footprint,
                None => footprint,
            };
            previous = Some((z, footprint));

            let bound = self.generation_bound(footprint, wall_thickness);
            let x = (2.0 * sampler.draw_unit() - 1.0) * bound;
            let y = (2.0 * sampler.draw_unit() - 1.0) * bound;
            let rotation = sampler.draw_rotation();

            requests.push(PlacementRequest {
                slot,
                species,
                location: DVec3::new(x, y, z),
                rotation,
            });
        }
        debug_assert!(state.is_complete());

        let height = previous.map_or(0.0, |(z, footprint)| z + footprint);
        Ok(PlacementPlan {
            requests,
            state,
            container: ContainerExtent {
                side: self.container_side,
                height,
            },
        })
    }
}
