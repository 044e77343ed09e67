//! Particle species and the arithmetic that turns target mass fractions into a
//! sampling distribution.
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod geometry;
pub mod solver;

pub use solver::{ratio_table, Composition, TwoSpeciesSplit};

/// Position of a species in the declared species list.
///
/// The index is what the cumulative distribution and run counts are keyed by.
pub type SpeciesIndex = usize;

/// Linear RGB color used when materialising a species.
pub type Rgb = [f32; 3];

const DEFAULT_PALETTE: [Rgb; 2] = [[0.1, 0.8, 0.7], [0.8, 0.4, 0.7]];

/// Static contact coefficients applied to every body of a species.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceCoefficients {
    pub friction: f64,
    pub restitution: f64,
}

impl Default for SurfaceCoefficients {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.5,
        }
    }
}

/// Geometric and material description of a prismatic particle species.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct SpeciesParameters {
    /// Number of sides of the regular polygon face.
    pub sides: u32,
    /// Circumscribed radius of the polygon face.
    pub radius: f64,
    /// Prism height (particle thickness).
    pub height: f64,
    pub density: f64,
    /// Target share of the total mass, in (0, 1).
    pub mass_fraction: f64,
    #[serde(default)]
    pub color: Option<Rgb>,
    #[serde(default)]
    pub surface: SurfaceCoefficients,
}

impl SpeciesParameters {
    pub fn new(sides: u32, radius: f64, height: f64, density: f64, mass_fraction: f64) -> Self {
        Self {
            sides,
            radius,
            height,
            density,
            mass_fraction,
            color: None,
            surface: SurfaceCoefficients::default(),
        }
    }

    /// Sets the display color.
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    /// Sets the contact coefficients.
    pub fn with_surface(mut self, surface: SurfaceCoefficients) -> Self {
        self.surface = surface;
        self
    }

    /// Checks that the shape and density describe a physical particle.
    pub fn validate(&self) -> Result<()> {
        geometry::validate_prism(self.sides, self.radius, self.height)?;
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(Error::InvalidGeometry(format!(
                "density must be > 0, got {}",
                self.density
            )));
        }
        Ok(())
    }

    /// Volume of one particle.
    pub fn volume(&self) -> Result<f64> {
        geometry::prism_volume(self.sides, self.radius, self.height)
    }

    /// Mass of one particle (density times volume).
    pub fn particle_mass(&self) -> Result<f64> {
        self.validate()?;
        Ok(self.density * self.volume()?)
    }
}

/// A named species as declared in the run parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Species {
    pub name: String,
    #[serde(flatten)]
    pub parameters: SpeciesParameters,
}

impl Species {
    pub fn new(name: impl Into<String>, parameters: SpeciesParameters) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    /// The configured color, or the default palette entry for `index`.
    pub fn color_or_default(&self, index: SpeciesIndex) -> Rgb {
        self.parameters
            .color
            .unwrap_or(DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()])
    }
}
