use std::path::PathBuf;

use anyhow::Context;
use packgen::prelude::*;
use packgen_cli::{init_tracing, StaticMeshEngine};
use tracing::info;

/// Directory receiving the artifacts; defaults to the working directory.
const OUT_DIR_VAR: &str = "PACKGEN_OUT_DIR";

fn main() -> anyhow::Result<()> {
    init_tracing();

    let parameters_file = parameters_file_from_args(std::env::args());
    let params = load_parameters(&parameters_file)
        .with_context(|| format!("loading parameters from {}", parameters_file.display()))?;
    let resolved = params.resolve()?;

    let out_dir = std::env::var_os(OUT_DIR_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let mut engine = StaticMeshEngine::new();
    let artifacts =
        RunArtifacts::for_parameter_file(&parameters_file, &out_dir, engine.scene_extension());
    let report = run_packing(&resolved, &mut engine, &artifacts)?;

    info!(
        seed = report.seed,
        slots = report.total_slots,
        counts = ?report.counts_by_species,
        target = ?report.target_probabilities,
        number_fractions = ?report.number_fractions,
        mass_fractions = ?report.mass_fractions,
        "Packing run finished."
    );
    info!(
        scene = %report.artifacts.scene.display(),
        parameters = %report.artifacts.parameters.display(),
        mesh = %report.artifacts.mesh.display(),
        "Artifacts written."
    );
    if engine.quit_requested() {
        info!("Quit requested; exiting.");
    }
    Ok(())
}
