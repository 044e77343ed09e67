//! Regular grid slot layout.
use glam::DVec3;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::placement::{
    ContainerExtent, PlacementPlan, PlacementRequest, RunState, WeightedSampler,
};

/// A `nx × ny × nz` grid of slots spaced `distance` apart.
///
/// The grid is centered on the origin in x and y and starts half a spacing
/// above the floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Number of slots along x, y and z.
    pub counts: [usize; 3],
    /// Distance between neighbouring slot centers.
    pub distance: f64,
}

impl GridLayout {
    pub fn new(counts: [usize; 3], distance: f64) -> Self {
        Self { counts, distance }
    }

    /// Number of slots, or `None` if the product does not fit in `usize`.
    pub fn checked_slot_count(&self) -> Option<usize> {
        self.counts
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n))
    }

    /// Number of slots, saturating at `usize::MAX`.
    pub fn slot_count(&self) -> usize {
        self.checked_slot_count().unwrap_or(usize::MAX)
    }

    pub fn validate(&self) -> Result<()> {
        if self.counts.contains(&0) {
            return Err(Error::InvalidConfig(format!(
                "grid counts must be > 0, got {:?}",
                self.counts
            )));
        }
        if self.checked_slot_count().is_none() {
            return Err(Error::InvalidConfig(format!(
                "grid counts {:?} overflow the slot count",
                self.counts
            )));
        }
        if !(self.distance.is_finite() && self.distance > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "grid distance must be > 0, got {}",
                self.distance
            )));
        }
        Ok(())
    }

    /// Center of cell `(x, y, z)`.
    pub fn location(&self, x: usize, y: usize, z: usize) -> DVec3 {
        let [nx, ny, _] = self.counts;
        let d = self.distance;
        DVec3::new(
            (x as f64 - nx as f64 / 2.0 + 0.5) * d,
            (y as f64 - ny as f64 / 2.0 + 0.5) * d,
            d / 2.0 + z as f64 * d,
        )
    }

    /// Container enclosing the whole grid.
    pub fn container(&self) -> ContainerExtent {
        let [nx, ny, nz] = self.counts;
        ContainerExtent {
            side: nx.max(ny) as f64 * self.distance,
            height: nz as f64 * self.distance,
        }
    }

    /// Visit cells with x outermost and z innermost, drawing the species and
    /// then the rotation of each cell.
    pub fn plan<R: RngCore>(&self, sampler: &mut WeightedSampler<R>) -> Result<PlacementPlan> {
        self.validate()?;
        let [nx, ny, nz] = self.counts;
        let total = self.slot_count();
        let mut state = RunState::new(
            sampler.seed(),
            sampler.composition().species_count(),
            total,
        );
        let mut requests = Vec::with_capacity(total);

        for x in 0..nx {
            for y in 0..ny {
                for z in 0..nz {
                    let species = sampler.draw_species();
                    state.record(species);
                    let rotation = sampler.draw_rotation();
                    requests.push(PlacementRequest {
                        slot: requests.len(),
                        species,
                        location: self.location(x, y, z),
                        rotation,
                    });
                }
            }
        }
        debug_assert!(state.is_complete());

        Ok(PlacementPlan {
            requests,
            state,
            container: self.container(),
        })
    }
}
