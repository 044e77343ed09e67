//! An in-memory [GeometryEngine] that records every call.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::simulation::engine::{
    BodyHandle, ContainerSpec, EngineError, EngineOperation, EngineResult, GeometryEngine,
    PrismBody,
};

/// A call received by [RecordingEngine].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    ClearDynamicBodies,
    CreatePrism(PrismBody),
    CreateContainer(ContainerSpec),
    RemoveBody { handle: BodyHandle, existed: bool },
    SetFrameRange { start: u32, end: u32 },
    FreeBake,
    Bake,
    SetFrame(u32),
    SaveScene(PathBuf),
    ExportMesh(PathBuf),
    Quit,
}

impl EngineCall {
    pub fn operation(&self) -> EngineOperation {
        match self {
            EngineCall::ClearDynamicBodies => EngineOperation::ClearDynamicBodies,
            EngineCall::CreatePrism(_) => EngineOperation::CreatePrism,
            EngineCall::CreateContainer(_) => EngineOperation::CreateContainer,
            EngineCall::RemoveBody { .. } => EngineOperation::RemoveBody,
            EngineCall::SetFrameRange { .. } => EngineOperation::SetFrameRange,
            EngineCall::FreeBake => EngineOperation::FreeBake,
            EngineCall::Bake => EngineOperation::Bake,
            EngineCall::SetFrame(_) => EngineOperation::SetFrame,
            EngineCall::SaveScene(_) => EngineOperation::SaveScene,
            EngineCall::ExportMesh(_) => EngineOperation::ExportMesh,
            EngineCall::Quit => EngineOperation::Quit,
        }
    }
}

/// Fake engine for tests and dry runs.
///
/// Keeps no geometry, only the call log and the set of live bodies. It can be
/// told to fail the first time a given operation is requested.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    calls: Vec<EngineCall>,
    live: HashSet<BodyHandle>,
    next_handle: u64,
    fail_on: Option<EngineOperation>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail when `operation` is requested, before recording it.
    pub fn failing_on(mut self, operation: EngineOperation) -> Self {
        self.fail_on = Some(operation);
        self
    }

    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<EngineCall> {
        self.calls
    }

    pub fn operations(&self) -> Vec<EngineOperation> {
        self.calls.iter().map(EngineCall::operation).collect()
    }

    /// Number of bodies currently alive in the fake scene.
    pub fn live_bodies(&self) -> usize {
        self.live.len()
    }

    fn check(&self, operation: EngineOperation) -> EngineResult<()> {
        if self.fail_on == Some(operation) {
            return Err(EngineError::new(format!("injected failure on {operation}")));
        }
        Ok(())
    }

    fn spawn(&mut self) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.live.insert(handle);
        handle
    }
}

impl GeometryEngine for RecordingEngine {
    fn scene_extension(&self) -> &str {
        "scene"
    }

    fn clear_dynamic_bodies(&mut self) -> EngineResult<()> {
        self.check(EngineOperation::ClearDynamicBodies)?;
        self.live.clear();
        self.calls.push(EngineCall::ClearDynamicBodies);
        Ok(())
    }

    fn create_prism(&mut self, body: &PrismBody) -> EngineResult<BodyHandle> {
        self.check(EngineOperation::CreatePrism)?;
        self.calls.push(EngineCall::CreatePrism(body.clone()));
        Ok(self.spawn())
    }

    fn create_container(&mut self, container: &ContainerSpec) -> EngineResult<BodyHandle> {
        self.check(EngineOperation::CreateContainer)?;
        self.calls.push(EngineCall::CreateContainer(*container));
        Ok(self.spawn())
    }

    fn remove_body(&mut self, handle: BodyHandle) -> EngineResult<bool> {
        self.check(EngineOperation::RemoveBody)?;
        let existed = self.live.remove(&handle);
        self.calls.push(EngineCall::RemoveBody { handle, existed });
        Ok(existed)
    }

    fn set_frame_range(&mut self, start: u32, end: u32) -> EngineResult<()> {
        self.check(EngineOperation::SetFrameRange)?;
        self.calls.push(EngineCall::SetFrameRange { start, end });
        Ok(())
    }

    fn free_bake(&mut self) -> EngineResult<()> {
        self.check(EngineOperation::FreeBake)?;
        self.calls.push(EngineCall::FreeBake);
        Ok(())
    }

    fn bake(&mut self) -> EngineResult<()> {
        self.check(EngineOperation::Bake)?;
        self.calls.push(EngineCall::Bake);
        Ok(())
    }

    fn set_frame(&mut self, frame: u32) -> EngineResult<()> {
        self.check(EngineOperation::SetFrame)?;
        self.calls.push(EngineCall::SetFrame(frame));
        Ok(())
    }

    fn save_scene(&mut self, path: &Path) -> EngineResult<()> {
        self.check(EngineOperation::SaveScene)?;
        self.calls.push(EngineCall::SaveScene(path.to_path_buf()));
        Ok(())
    }

    fn export_mesh(&mut self, path: &Path) -> EngineResult<()> {
        self.check(EngineOperation::ExportMesh)?;
        self.calls.push(EngineCall::ExportMesh(path.to_path_buf()));
        Ok(())
    }

    fn quit(&mut self) -> EngineResult<()> {
        self.check(EngineOperation::Quit)?;
        self.calls.push(EngineCall::Quit);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_live_bodies() {
        let mut engine = RecordingEngine::new();
        let container = ContainerSpec {
            side: 1.0,
            height: 1.0,
            wall_thickness: 0.1,
        };
        let handle = engine.create_container(&container).unwrap();
        assert_eq!(engine.live_bodies(), 1);
        assert!(engine.remove_body(handle).unwrap());
        assert!(!engine.remove_body(handle).unwrap());
        assert_eq!(
            engine.operations(),
            vec![
                EngineOperation::CreateContainer,
                EngineOperation::RemoveBody,
                EngineOperation::RemoveBody
            ]
        );
    }

    #[test]
    fn injected_failure_is_not_recorded() {
        let mut engine = RecordingEngine::new().failing_on(EngineOperation::Bake);
        engine.free_bake().unwrap();
        let err = engine.bake().unwrap_err();
        assert_eq!(err.to_string(), "injected failure on bake");
        assert_eq!(engine.into_calls(), vec![EngineCall::FreeBake]);
    }
}
