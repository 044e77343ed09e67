//! Start the external engine with the packing script, forwarding arguments
//! after `--` unchanged.
use std::path::PathBuf;

use anyhow::{bail, Context};
use packgen::prelude::EngineInvocation;
use packgen_cli::init_tracing;
use tracing::info;

/// Engine-side script run by the host engine.
const SCRIPT_VAR: &str = "PACKGEN_ENGINE_SCRIPT";
/// Overrides the per-platform engine executable.
const ENGINE_VAR: &str = "PACKGEN_ENGINE";

fn main() -> anyhow::Result<()> {
    init_tracing();

    let argv: Vec<String> = std::env::args().collect();
    let script = std::env::var_os(SCRIPT_VAR)
        .map(PathBuf::from)
        .with_context(|| format!("{SCRIPT_VAR} must point to the engine-side script"))?;
    let override_path = std::env::var_os(ENGINE_VAR).map(PathBuf::from);

    let invocation = EngineInvocation::for_current_host(&script, &argv, override_path.as_deref())?;
    info!(
        executable = %invocation.executable.display(),
        args = ?invocation.args,
        "Launching engine."
    );
    let status = invocation
        .command()
        .status()
        .with_context(|| format!("starting {}", invocation.executable.display()))?;
    if !status.success() {
        bail!("engine exited with {status}");
    }
    Ok(())
}
