#![forbid(unsafe_code)]
//! packgen: composition solving, seeded species sampling and bake orchestration
//! for granular packing scenes.
//!
//! Modules:
//! - composition: prism geometry, particle species, and mass-fraction to probability solving
//! - placement: seeded weighted sampler and slot layouts (grid, stacked)
//! - simulation: engine capability trait, recording fake, and run orchestration
//! - params: run parameters, seed materialisation, parameter files
//! - launcher: host engine executable discovery
pub mod composition;
pub mod error;
pub mod launcher;
pub mod params;
pub mod placement;
pub mod simulation;

/// Convenient re-exports for common types. Import with `use packgen::prelude::*;`.
pub mod prelude {
    pub use crate::composition::geometry::{prism_volume, self_avoidance_radius};
    pub use crate::composition::{
        ratio_table, Composition, Species, SpeciesIndex, SpeciesParameters, SurfaceCoefficients,
        TwoSpeciesSplit,
    };
    pub use crate::error::{Error, Result};
    pub use crate::launcher::{resolve_engine_executable, EngineInvocation, HostPlatform};
    pub use crate::params::{
        load_parameters, parameters_file_from_args, parse_parameters, CompositionMode,
        ResolvedParameters, SimulationParameters,
    };
    pub use crate::placement::{
        ContainerExtent, GridLayout, Layout, PlacementPlan, PlacementRequest, RunState,
        StackedLayout, WeightedSampler,
    };
    pub use crate::simulation::{
        execute, prepare, run_packing, BodyHandle, ContainerSpec, EngineCall, EngineError,
        EngineOperation, EngineResult, GeometryEngine, PreparedRun, PrismBody, RecordingEngine,
        RunArtifacts, RunReport,
    };
}
