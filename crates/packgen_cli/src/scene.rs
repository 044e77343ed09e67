//! In-process [GeometryEngine] that keeps bodies at their spawn poses.
//!
//! No dynamics are simulated: `bake` only records that it ran. The scene
//! snapshot is JSON and the mesh export is binary STL.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use glam::DVec3;
use packgen::prelude::{
    BodyHandle, ContainerSpec, EngineError, EngineResult, GeometryEngine, PrismBody,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::mesh::{euler_xyz, TriangleMesh};

/// Extension of the JSON scene snapshot.
pub const SCENE_EXTENSION: &str = "scene.json";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneShape {
    Prism {
        species: usize,
        sides: u32,
        radius: f64,
        height: f64,
        location: [f64; 3],
        rotation: [f64; 3],
        friction: f64,
        restitution: f64,
        color: [f32; 3],
    },
    Container {
        side: f64,
        height: f64,
        wall_thickness: f64,
    },
}

impl SceneShape {
    fn is_dynamic(&self) -> bool {
        matches!(self, SceneShape::Prism { .. })
    }

    fn mesh(&self) -> TriangleMesh {
        match *self {
            SceneShape::Prism {
                sides,
                radius,
                height,
                location,
                rotation,
                ..
            } => TriangleMesh::prism(sides, radius, height)
                .transformed(euler_xyz(rotation), DVec3::from_array(location)),
            SceneShape::Container {
                side,
                height,
                wall_thickness,
            } => TriangleMesh::open_box(side, height, wall_thickness),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneBody {
    pub handle: u64,
    #[serde(flatten)]
    pub shape: SceneShape,
}

#[derive(Serialize)]
struct SceneSnapshot<'a> {
    frame_start: u32,
    frame_end: u32,
    current_frame: u32,
    baked: bool,
    bodies: &'a [SceneBody],
}

#[derive(Debug, Default)]
pub struct StaticMeshEngine {
    bodies: Vec<SceneBody>,
    next_handle: u64,
    frame_range: (u32, u32),
    frame: u32,
    baked: bool,
    quit_requested: bool,
}

impl StaticMeshEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bodies(&self) -> &[SceneBody] {
        &self.bodies
    }

    pub fn is_baked(&self) -> bool {
        self.baked
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Triangles of every body currently in the scene.
    pub fn scene_mesh(&self) -> TriangleMesh {
        let mut mesh = TriangleMesh::new();
        for body in &self.bodies {
            mesh.extend(&body.shape.mesh());
        }
        mesh
    }

    fn insert(&mut self, shape: SceneShape) -> BodyHandle {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.bodies.push(SceneBody { handle, shape });
        BodyHandle(handle)
    }
}

impl GeometryEngine for StaticMeshEngine {
    fn scene_extension(&self) -> &str {
        SCENE_EXTENSION
    }

    fn clear_dynamic_bodies(&mut self) -> EngineResult<()> {
        let before = self.bodies.len();
        self.bodies.retain(|b| !b.shape.is_dynamic());
        debug!(removed = before - self.bodies.len(), "Cleared dynamic bodies.");
        Ok(())
    }

    fn create_prism(&mut self, body: &PrismBody) -> EngineResult<BodyHandle> {
        if body.sides < 3 || body.radius <= 0.0 || body.height <= 0.0 {
            return Err(EngineError::new(format!(
                "degenerate prism: sides={} radius={} height={}",
                body.sides, body.radius, body.height
            )));
        }
        Ok(self.insert(SceneShape::Prism {
            species: body.species,
            sides: body.sides,
            radius: body.radius,
            height: body.height,
            location: [body.location.x, body.location.y, body.location.z],
            rotation: [body.rotation.x, body.rotation.y, body.rotation.z],
            friction: body.surface.friction,
            restitution: body.surface.restitution,
            color: body.color,
        }))
    }

    fn create_container(&mut self, container: &ContainerSpec) -> EngineResult<BodyHandle> {
        Ok(self.insert(SceneShape::Container {
            side: container.side,
            height: container.height,
            wall_thickness: container.wall_thickness,
        }))
    }

    fn remove_body(&mut self, handle: BodyHandle) -> EngineResult<bool> {
        let before = self.bodies.len();
        self.bodies.retain(|b| b.handle != handle.0);
        Ok(self.bodies.len() != before)
    }

    fn set_frame_range(&mut self, start: u32, end: u32) -> EngineResult<()> {
        if end < start {
            return Err(EngineError::new(format!(
                "frame range ends before it starts: {start}..{end}"
            )));
        }
        self.frame_range = (start, end);
        self.frame = start;
        Ok(())
    }

    fn free_bake(&mut self) -> EngineResult<()> {
        self.baked = false;
        Ok(())
    }

    fn bake(&mut self) -> EngineResult<()> {
        warn!("Static engine has no dynamics; bodies keep their spawn poses.");
        self.baked = true;
        Ok(())
    }

    fn set_frame(&mut self, frame: u32) -> EngineResult<()> {
        self.frame = frame;
        Ok(())
    }

    fn save_scene(&mut self, path: &Path) -> EngineResult<()> {
        let snapshot = SceneSnapshot {
            frame_start: self.frame_range.0,
            frame_end: self.frame_range.1,
            current_frame: self.frame,
            baked: self.baked,
            bodies: &self.bodies,
        };
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| EngineError::new(format!("scene serialisation failed: {e}")))?;
        std::fs::write(path, json)?;
        info!(scene = %path.display(), bodies = self.bodies.len(), "Saved scene.");
        Ok(())
    }

    fn export_mesh(&mut self, path: &Path) -> EngineResult<()> {
        let facets = self.scene_mesh().stl_triangles();
        let mut out = BufWriter::new(File::create(path)?);
        stl_io::write_stl(&mut out, facets.iter())?;
        out.flush()?;
        debug!(triangles = facets.len(), "Wrote STL.");
        Ok(())
    }

    fn quit(&mut self) -> EngineResult<()> {
        self.quit_requested = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::BufReader;

    use packgen::prelude::*;
    use tempfile::tempdir;

    use super::*;

    fn prism(species: usize) -> PrismBody {
        PrismBody {
            species,
            sides: 6,
            radius: 0.1,
            height: 0.05,
            location: [0.0, 0.0, 0.5].into(),
            rotation: [0.1, 0.2, 0.3].into(),
            surface: SurfaceCoefficients::default(),
            color: [0.1, 0.8, 0.7],
        }
    }

    #[test]
    fn clear_keeps_static_bodies() {
        let mut engine = StaticMeshEngine::new();
        engine.create_prism(&prism(0)).unwrap();
        let container = ContainerSpec {
            side: 1.0,
            height: 1.0,
            wall_thickness: 0.1,
        };
        engine.create_container(&container).unwrap();
        engine.clear_dynamic_bodies().unwrap();
        assert_eq!(engine.bodies().len(), 1);
        assert!(!engine.bodies()[0].shape.is_dynamic());
    }

    #[test]
    fn remove_reports_missing_handles() {
        let mut engine = StaticMeshEngine::new();
        let h = engine.create_prism(&prism(1)).unwrap();
        assert!(engine.remove_body(h).unwrap());
        assert!(!engine.remove_body(h).unwrap());
    }

    #[test]
    fn degenerate_prism_is_rejected() {
        let mut engine = StaticMeshEngine::new();
        let mut body = prism(0);
        body.sides = 2;
        assert!(engine.create_prism(&body).is_err());
    }

    #[test]
    fn full_run_writes_all_artifacts() {
        let params = SimulationParameters::new(
            Layout::Grid(GridLayout::new([2, 2, 2], 0.3)),
            vec![
                Species::new("A", SpeciesParameters::new(6, 0.1, 0.05, 2.5, 0.6)),
                Species::new("B", SpeciesParameters::new(4, 0.08, 0.05, 7.8, 0.4)),
            ],
        )
        .with_seed(17.0)
        .with_quit_on_finish(true);
        let resolved = params.resolve().unwrap();
        let dir = tempdir().unwrap();
        let mut engine = StaticMeshEngine::new();
        let artifacts = RunArtifacts::with_suffix(dir.path(), "run", engine.scene_extension());

        let report = run_packing(&resolved, &mut engine, &artifacts).unwrap();
        assert_eq!(report.total_slots, 8);
        assert!(engine.is_baked());
        assert!(engine.quit_requested());

        let scene: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&artifacts.scene).unwrap()).unwrap();
        let bodies = scene["bodies"].as_array().unwrap();
        assert_eq!(bodies.len(), 9);
        assert!(bodies.iter().any(|b| b["kind"] == "container"));

        // container is removed before export
        let mut reader = BufReader::new(File::open(&artifacts.mesh).unwrap());
        let stl = stl_io::read_stl(&mut reader).unwrap();
        let hexagons = report.counts_by_species[0];
        let squares = report.counts_by_species[1];
        assert_eq!(stl.faces.len(), hexagons * 24 + squares * 16);

        let saved = load_parameters(&artifacts.parameters).unwrap();
        assert_eq!(saved.seed, Some(17.0));
    }
}
