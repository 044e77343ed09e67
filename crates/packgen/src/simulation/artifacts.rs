//! Output file naming.
use std::path::{Path, PathBuf};

/// Prefix shared by every artifact file name.
pub const ARTIFACT_PREFIX: &str = "packing";

/// Extension of the surface mesh export.
pub const MESH_EXTENSION: &str = "stl";

/// Paths of the three files a run produces.
///
/// All of them are named `packing_<suffix>.<ext>`, the suffix usually being the
/// parameter file's base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArtifacts {
    /// Engine-native scene snapshot.
    pub scene: PathBuf,
    /// Resolved parameters, including the materialised seed.
    pub parameters: PathBuf,
    /// Surface mesh export.
    pub mesh: PathBuf,
}

impl RunArtifacts {
    pub fn with_suffix(out_dir: &Path, suffix: &str, scene_extension: &str) -> Self {
        let base = format!("{ARTIFACT_PREFIX}_{suffix}");
        Self {
            scene: out_dir.join(format!("{base}.{scene_extension}")),
            parameters: out_dir.join(format!("{base}.json")),
            mesh: out_dir.join(format!("{base}.{MESH_EXTENSION}")),
        }
    }

    /// Artifacts named after `parameter_file`'s base name.
    pub fn for_parameter_file(
        parameter_file: &Path,
        out_dir: &Path,
        scene_extension: &str,
    ) -> Self {
        Self::with_suffix(out_dir, &parameters_suffix(parameter_file), scene_extension)
    }
}

/// Base name of a parameter file without its extension.
pub fn parameters_suffix(parameter_file: &Path) -> String {
    parameter_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "parameters".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifacts_share_parameter_stem() {
        let a = RunArtifacts::for_parameter_file(
            Path::new("configs/mix_30.json"),
            Path::new("out"),
            "scene.json",
        );
        assert_eq!(a.scene, Path::new("out/packing_mix_30.scene.json"));
        assert_eq!(a.parameters, Path::new("out/packing_mix_30.json"));
        assert_eq!(a.mesh, Path::new("out/packing_mix_30.stl"));
    }

    #[test]
    fn suffix_falls_back_without_stem() {
        assert_eq!(parameters_suffix(Path::new("")), "parameters");
        assert_eq!(parameters_suffix(Path::new("a/b.c.json")), "b.c");
    }
}
