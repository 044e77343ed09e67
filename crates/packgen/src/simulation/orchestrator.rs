//! Drives a packing run: solve the composition, plan every slot, then
//! materialise, bake and export through a [GeometryEngine].
//!
//! [prepare] performs every step that can fail on bad input before the engine
//! is touched. [execute] then replays the plan against the engine in a fixed
//! order; any engine failure aborts the run and leaves partial artifacts that
//! must be discarded.
use tracing::{debug, info, warn};

use crate::composition::geometry::self_avoidance_radius;
use crate::composition::{ratio_table, Composition, TwoSpeciesSplit};
use crate::error::{Error, Result};
use crate::params::{CompositionMode, ResolvedParameters, SimulationParameters};
use crate::placement::{PlacementPlan, WeightedSampler};
use crate::simulation::artifacts::RunArtifacts;
use crate::simulation::engine::{
    ContainerSpec, EngineError, EngineOperation, GeometryEngine, PrismBody,
};

/// First frame of every bake.
pub const FIRST_FRAME: u32 = 1;

/// Everything derived from the parameters before any engine call.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub composition: Composition,
    /// Present in two-species mode.
    pub split: Option<TwoSpeciesSplit>,
    pub plan: PlacementPlan,
    /// One body per planned slot, in planning order.
    pub bodies: Vec<PrismBody>,
    pub container: ContainerSpec,
    /// Mass of one particle of each species, after scaling.
    pub particle_masses: Vec<f64>,
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub seed: f64,
    pub total_slots: usize,
    pub counts_by_species: Vec<usize>,
    /// Probabilities the species were drawn with.
    pub target_probabilities: Vec<f64>,
    pub number_fractions: Vec<f64>,
    pub mass_fractions: Vec<f64>,
    pub artifacts: RunArtifacts,
    pub quit_requested: bool,
}

/// Solve the sampling composition for a run of `total_slots`.
pub fn solve_composition(
    params: &SimulationParameters,
    total_slots: usize,
) -> Result<(Composition, Option<TwoSpeciesSplit>)> {
    match params.composition {
        CompositionMode::TwoSpecies => {
            let [a, b] = params.species.as_slice() else {
                return Err(Error::InvalidComposition(format!(
                    "two-species mode needs exactly 2 species, got {}",
                    params.species.len()
                )));
            };
            let split = TwoSpeciesSplit::new(
                &a.parameters,
                &b.parameters,
                b.parameters.mass_fraction,
            )?;
            info!(
                target_b = split.target_count_b(total_slots),
                total_slots,
                probability_b = split.probability_b,
                "Solved two-species split."
            );
            Ok((split.composition_for_slots(total_slots)?, Some(split)))
        }
        CompositionMode::RatioTable => {
            let species: Vec<_> = params
                .species
                .iter()
                .map(|s| s.parameters.clone())
                .collect();
            let composition = ratio_table(&species)?;
            info!(
                probabilities = ?composition.probabilities(),
                total_slots,
                "Solved ratio-table composition."
            );
            Ok((composition, None))
        }
    }
}

/// Solve, sample and plan without touching any engine.
pub fn prepare(resolved: &ResolvedParameters) -> Result<PreparedRun> {
    let params = resolved.parameters();
    params.validate()?;

    let total_slots = params.layout.slot_count();
    let (composition, split) = solve_composition(params, total_slots)?;

    let scale = params.scale;
    let footprints: Vec<f64> = params
        .species
        .iter()
        .map(|s| self_avoidance_radius(scale * s.parameters.radius, scale * s.parameters.height))
        .collect();
    let particle_masses = params
        .species
        .iter()
        .map(|s| s.parameters.particle_mass().map(|m| m * scale.powi(3)))
        .collect::<Result<Vec<f64>>>()?;

    let mut sampler = WeightedSampler::seeded(composition.clone(), resolved.seed());
    let plan = params
        .layout
        .plan(&mut sampler, &footprints, params.wall_thickness)?;
    debug!(
        counts = ?plan.state.counts_by_species(),
        "Planned {} slots.",
        plan.requests.len()
    );

    let bodies = plan
        .requests
        .iter()
        .map(|request| {
            let species = &params.species[request.species];
            let p = &species.parameters;
            PrismBody {
                species: request.species,
                sides: p.sides,
                radius: scale * p.radius,
                height: scale * p.height,
                location: request.location.into(),
                rotation: request.rotation.into(),
                surface: p.surface,
                color: species.color_or_default(request.species),
            }
        })
        .collect();

    let container = ContainerSpec {
        side: plan.container.side,
        height: plan.container.height,
        wall_thickness: params.wall_thickness,
    };

    Ok(PreparedRun {
        composition,
        split,
        plan,
        bodies,
        container,
        particle_masses,
    })
}

fn engine_err(operation: EngineOperation) -> impl FnOnce(EngineError) -> Error {
    move |source| Error::engine(operation, source)
}

/// Materialise, bake and export a prepared run.
pub fn execute<E: GeometryEngine>(
    resolved: &ResolvedParameters,
    prepared: &PreparedRun,
    engine: &mut E,
    artifacts: &RunArtifacts,
) -> Result<RunReport> {
    let params = resolved.parameters();
    info!(
        seed = resolved.seed(),
        bodies = prepared.bodies.len(),
        end_frame = params.end_frame,
        "Starting packing run."
    );

    engine
        .clear_dynamic_bodies()
        .map_err(engine_err(EngineOperation::ClearDynamicBodies))?;
    for body in &prepared.bodies {
        engine
            .create_prism(body)
            .map_err(engine_err(EngineOperation::CreatePrism))?;
    }
    let container = engine
        .create_container(&prepared.container)
        .map_err(engine_err(EngineOperation::CreateContainer))?;

    engine
        .set_frame_range(FIRST_FRAME, params.end_frame)
        .map_err(engine_err(EngineOperation::SetFrameRange))?;
    engine
        .free_bake()
        .map_err(engine_err(EngineOperation::FreeBake))?;
    engine.bake().map_err(engine_err(EngineOperation::Bake))?;
    engine
        .set_frame(params.end_frame)
        .map_err(engine_err(EngineOperation::SetFrame))?;
    debug!(end_frame = params.end_frame, "Bake finished.");

    engine
        .save_scene(&artifacts.scene)
        .map_err(engine_err(EngineOperation::SaveScene))?;
    resolved.save(&artifacts.parameters)?;

    let removed = engine
        .remove_body(container)
        .map_err(engine_err(EngineOperation::RemoveBody))?;
    if !removed {
        warn!("Container was already gone before mesh export.");
    }
    engine
        .export_mesh(&artifacts.mesh)
        .map_err(engine_err(EngineOperation::ExportMesh))?;
    info!(mesh = %artifacts.mesh.display(), "Exported mesh.");

    let state = &prepared.plan.state;
    let report = RunReport {
        seed: resolved.seed(),
        total_slots: state.total_slots(),
        counts_by_species: state.counts_by_species().to_vec(),
        target_probabilities: prepared.composition.probabilities().to_vec(),
        number_fractions: state.number_fractions(),
        mass_fractions: state.mass_fractions(&prepared.particle_masses),
        artifacts: artifacts.clone(),
        quit_requested: params.quit_on_finish,
    };

    if params.quit_on_finish {
        engine.quit().map_err(engine_err(EngineOperation::Quit))?;
    }

    Ok(report)
}

/// [prepare] then [execute].
pub fn run_packing<E: GeometryEngine>(
    resolved: &ResolvedParameters,
    engine: &mut E,
    artifacts: &RunArtifacts,
) -> Result<RunReport> {
    let prepared = prepare(resolved)?;
    execute(resolved, &prepared, engine, artifacts)
}
