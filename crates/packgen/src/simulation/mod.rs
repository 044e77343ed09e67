//! Materialising a planned packing in an external geometry/physics engine.
pub mod artifacts;
pub mod engine;
pub mod orchestrator;
pub mod recording;

pub use artifacts::RunArtifacts;
pub use engine::{
    BodyHandle, ContainerSpec, EngineError, EngineOperation, EngineResult, GeometryEngine,
    PrismBody,
};
pub use orchestrator::{execute, prepare, run_packing, PreparedRun, RunReport};
pub use recording::{EngineCall, RecordingEngine};
