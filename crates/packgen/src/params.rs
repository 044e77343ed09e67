//! Run parameters, seed materialisation, and JSON parameter files.
//!
//! [SimulationParameters] is the complete, explicit input of a run. Its seed is
//! optional; [SimulationParameters::resolve] fixes it exactly once and yields
//! [ResolvedParameters], which is what the orchestrator consumes and what gets
//! written next to the run's artifacts.
//!
//! Two file layouts are accepted by [parse_parameters]: the structured layout
//! produced by [ResolvedParameters::save], and a flat two-species layout with
//! keys such as `r_A`, `density_B` and `mass_fraction_B`.
use std::fs;
use std::path::{Path, PathBuf};

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::composition::{Species, SpeciesParameters};
use crate::error::{Error, Result};
use crate::placement::sampler::rand01;
use crate::placement::{GridLayout, Layout};

/// Parameter file used when none is given on the command line.
pub const DEFAULT_PARAMETERS_FILE: &str = "parameters.json";

/// Automatically generated seeds are drawn uniformly from `[0, SEED_RANGE)`.
pub const SEED_RANGE: f64 = 1e6;

pub const DEFAULT_END_FRAME: u32 = 230;
pub const DEFAULT_WALL_THICKNESS: f64 = 0.2;

/// How species probabilities are derived from the species list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionMode {
    /// Exactly two species; the mass fraction of the second one drives the split.
    #[default]
    TwoSpecies,
    /// Any number of species, each with its own mass fraction.
    RatioTable,
}

fn default_scale() -> f64 {
    1.0
}

fn default_end_frame() -> u32 {
    DEFAULT_END_FRAME
}

fn default_wall_thickness() -> f64 {
    DEFAULT_WALL_THICKNESS
}

/// Complete configuration of a packing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct SimulationParameters {
    /// Scale applied to particle radii and heights when materialising.
    #[serde(default = "default_scale")]
    pub scale: f64,
    pub layout: Layout,
    pub species: Vec<Species>,
    #[serde(default)]
    pub composition: CompositionMode,
    /// Run seed; `None` means one is generated at resolve time.
    #[serde(default)]
    pub seed: Option<f64>,
    #[serde(default = "default_end_frame")]
    pub end_frame: u32,
    #[serde(default = "default_wall_thickness")]
    pub wall_thickness: f64,
    /// Ask the engine host to exit once artifacts are written.
    #[serde(default)]
    pub quit_on_finish: bool,
}

impl SimulationParameters {
    pub fn new(layout: Layout, species: Vec<Species>) -> Self {
        Self {
            scale: default_scale(),
            layout,
            species,
            composition: CompositionMode::default(),
            seed: None,
            end_frame: DEFAULT_END_FRAME,
            wall_thickness: DEFAULT_WALL_THICKNESS,
            quit_on_finish: false,
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_composition(mut self, composition: CompositionMode) -> Self {
        self.composition = composition;
        self
    }

    pub fn with_seed(mut self, seed: f64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_end_frame(mut self, end_frame: u32) -> Self {
        self.end_frame = end_frame;
        self
    }

    pub fn with_wall_thickness(mut self, wall_thickness: f64) -> Self {
        self.wall_thickness = wall_thickness;
        self
    }

    pub fn with_quit_on_finish(mut self, quit_on_finish: bool) -> Self {
        self.quit_on_finish = quit_on_finish;
        self
    }

    /// Validates everything except the composition arithmetic, which is checked
    /// when the split is solved.
    pub fn validate(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "scale must be > 0, got {}",
                self.scale
            )));
        }
        if !(self.wall_thickness.is_finite() && self.wall_thickness >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "wall_thickness must be >= 0, got {}",
                self.wall_thickness
            )));
        }
        if self.end_frame < 1 {
            return Err(Error::InvalidConfig("end_frame must be >= 1".into()));
        }
        if let Some(seed) = self.seed {
            if !seed.is_finite() {
                return Err(Error::InvalidConfig(format!(
                    "seed must be finite, got {seed}"
                )));
            }
        }
        if self.species.is_empty() {
            return Err(Error::InvalidConfig("at least one species is required".into()));
        }
        self.layout.validate()?;
        for species in &self.species {
            species.parameters.validate()?;
        }
        Ok(())
    }

    /// Validate and fix the seed, generating one from the thread RNG if absent.
    pub fn resolve(self) -> Result<ResolvedParameters> {
        self.resolve_with(&mut rand::rng())
    }

    /// Validate and fix the seed, generating one from `rng` if absent.
    pub fn resolve_with(mut self, rng: &mut dyn RngCore) -> Result<ResolvedParameters> {
        self.validate()?;
        let seed = match self.seed {
            Some(seed) => seed,
            None => {
                let seed = rand01(rng) * SEED_RANGE;
                info!(seed, "No seed given; generated one.");
                seed
            }
        };
        self.seed = Some(seed);
        Ok(ResolvedParameters {
            parameters: self,
            seed,
        })
    }
}

/// Parameters whose seed has been fixed. Immutable for the rest of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParameters {
    parameters: SimulationParameters,
    seed: f64,
}

impl ResolvedParameters {
    pub fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    pub fn seed(&self) -> f64 {
        self.seed
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.parameters)?)
    }

    /// Write the parameters, including the fixed seed, as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        debug!(path = %path.display(), "Wrote resolved parameters.");
        Ok(())
    }
}

/// Flat two-species parameter layout.
#[derive(Debug, Clone, Deserialize)]
pub struct FlatParameters {
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(rename = "r_A")]
    pub r_a: f64,
    #[serde(rename = "r_B")]
    pub r_b: f64,
    #[serde(rename = "thickness_A")]
    pub thickness_a: f64,
    #[serde(rename = "thickness_B")]
    pub thickness_b: f64,
    #[serde(rename = "density_A")]
    pub density_a: f64,
    #[serde(rename = "density_B")]
    pub density_b: f64,
    pub num_sides: f64,
    #[serde(rename = "mass_fraction_B")]
    pub mass_fraction_b: f64,
    pub num_cubes_x: f64,
    pub num_cubes_y: f64,
    pub num_cubes_z: f64,
    pub distance: f64,
    #[serde(default)]
    pub seed: Option<f64>,
    #[serde(default = "default_end_frame")]
    pub end_frame: u32,
    #[serde(default)]
    pub quit_on_finish: bool,
}

impl From<FlatParameters> for SimulationParameters {
    fn from(flat: FlatParameters) -> Self {
        // counts and side numbers are truncated like integer casts of JSON numbers
        let sides = flat.num_sides as u32;
        let a = SpeciesParameters::new(
            sides,
            flat.r_a,
            flat.thickness_a,
            flat.density_a,
            1.0 - flat.mass_fraction_b,
        );
        let b = SpeciesParameters::new(
            sides,
            flat.r_b,
            flat.thickness_b,
            flat.density_b,
            flat.mass_fraction_b,
        );
        let layout = Layout::Grid(GridLayout::new(
            [
                flat.num_cubes_x as usize,
                flat.num_cubes_y as usize,
                flat.num_cubes_z as usize,
            ],
            flat.distance,
        ));

        let mut params =
            SimulationParameters::new(layout, vec![Species::new("A", a), Species::new("B", b)])
                .with_scale(flat.scale)
                .with_end_frame(flat.end_frame)
                .with_quit_on_finish(flat.quit_on_finish);
        params.seed = flat.seed;
        params
    }
}

/// Parse a parameter file in either the structured or the flat layout.
pub fn parse_parameters(json: &str) -> Result<SimulationParameters> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if value.get("species").is_some() {
        Ok(serde_json::from_value(value)?)
    } else {
        let flat: FlatParameters = serde_json::from_value(value)?;
        Ok(flat.into())
    }
}

pub fn load_parameters(path: &Path) -> Result<SimulationParameters> {
    let text = fs::read_to_string(path)?;
    let params = parse_parameters(&text)?;
    debug!(path = %path.display(), species = params.species.len(), "Loaded parameters.");
    Ok(params)
}

/// Pick the parameter file from a full argument list (program name first).
///
/// The first argument after a `--` separator wins; without a separator the
/// first positional argument is used; otherwise [DEFAULT_PARAMETERS_FILE].
pub fn parameters_file_from_args<I, S>(args: I) -> PathBuf
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let chosen = match args.iter().position(|a| a == "--") {
        Some(sep) => args.get(sep + 1),
        None => args.get(1),
    };
    chosen
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PARAMETERS_FILE))
}
