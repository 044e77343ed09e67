//! Capability interface to the external geometry/physics engine.
//!
//! The orchestrator only ever talks to the engine through [GeometryEngine], so
//! the composition and sampling core can run against a fake such as
//! [crate::simulation::recording::RecordingEngine]. Pose vectors are `mint`
//! types so implementors are free to pick their own math library.
use std::fmt;
use std::path::Path;

use mint::Vector3;
use thiserror::Error;

use crate::composition::{Rgb, SpeciesIndex, SurfaceCoefficients};

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Failure reported by an engine implementation.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        EngineError::Message(message.into())
    }
}

/// Engine capability being exercised, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineOperation {
    ClearDynamicBodies,
    CreatePrism,
    CreateContainer,
    RemoveBody,
    SetFrameRange,
    FreeBake,
    Bake,
    SetFrame,
    SaveScene,
    ExportMesh,
    Quit,
}

impl fmt::Display for EngineOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineOperation::ClearDynamicBodies => "clear dynamic bodies",
            EngineOperation::CreatePrism => "create prism",
            EngineOperation::CreateContainer => "create container",
            EngineOperation::RemoveBody => "remove body",
            EngineOperation::SetFrameRange => "set frame range",
            EngineOperation::FreeBake => "free bake",
            EngineOperation::Bake => "bake",
            EngineOperation::SetFrame => "set frame",
            EngineOperation::SaveScene => "save scene",
            EngineOperation::ExportMesh => "export mesh",
            EngineOperation::Quit => "quit",
        };
        f.write_str(name)
    }
}

/// Opaque identifier of a body created by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub u64);

/// A dynamic prismatic particle, subject to gravity and collisions.
#[derive(Debug, Clone, PartialEq)]
pub struct PrismBody {
    pub species: SpeciesIndex,
    pub sides: u32,
    /// Circumscribed radius after scaling.
    pub radius: f64,
    /// Prism height after scaling.
    pub height: f64,
    pub location: Vector3<f64>,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: Vector3<f64>,
    pub surface: SurfaceCoefficients,
    pub color: Rgb,
}

/// A static, open-top box resting on the ground plane and centered on the origin.
///
/// Walls grow outward from the inner `side × side × height` volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerSpec {
    pub side: f64,
    pub height: f64,
    pub wall_thickness: f64,
}

/// What the orchestrator needs from a geometry/physics host.
pub trait GeometryEngine {
    /// File extension of the engine's native scene format, without the dot.
    fn scene_extension(&self) -> &str;

    /// Remove every dynamic body left over from a previous run.
    fn clear_dynamic_bodies(&mut self) -> EngineResult<()>;

    fn create_prism(&mut self, body: &PrismBody) -> EngineResult<BodyHandle>;

    fn create_container(&mut self, container: &ContainerSpec) -> EngineResult<BodyHandle>;

    /// Remove a body; returns `false` if it no longer exists.
    fn remove_body(&mut self, handle: BodyHandle) -> EngineResult<bool>;

    fn set_frame_range(&mut self, start: u32, end: u32) -> EngineResult<()>;

    /// Drop any cached simulation state.
    fn free_bake(&mut self) -> EngineResult<()>;

    /// Simulate and cache the configured frame range.
    fn bake(&mut self) -> EngineResult<()>;

    fn set_frame(&mut self, frame: u32) -> EngineResult<()>;

    fn save_scene(&mut self, path: &Path) -> EngineResult<()>;

    /// Write the surfaces of all remaining bodies to a portable mesh file.
    fn export_mesh(&mut self, path: &Path) -> EngineResult<()>;

    /// Terminate the host.
    fn quit(&mut self) -> EngineResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operations_have_readable_names() {
        assert_eq!(EngineOperation::FreeBake.to_string(), "free bake");
        assert_eq!(EngineOperation::ExportMesh.to_string(), "export mesh");
    }

    #[test]
    fn io_errors_convert() {
        let err: EngineError = std::io::Error::other("disk full").into();
        assert!(matches!(err, EngineError::Io(_)));
        assert_eq!(err.to_string(), "disk full");
    }
}
