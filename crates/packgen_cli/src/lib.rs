#![forbid(unsafe_code)]

mod mesh;
mod scene;

pub use mesh::{euler_xyz, TriangleMesh};
pub use scene::{SceneBody, SceneShape, StaticMeshEngine, SCENE_EXTENSION};

/// Install a `fmt` subscriber filtered by `RUST_LOG`. Safe to call twice.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
