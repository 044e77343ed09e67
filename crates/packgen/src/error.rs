//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result]
//! alias. Variants cover invalid configuration, non-physical geometry, undefined
//! composition arithmetic, unsupported host platforms, engine failures, IO and
//! JSON.
use thiserror::Error;

use crate::simulation::engine::{EngineError, EngineOperation};

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid composition: {0}")]
    InvalidComposition(String),

    #[error("no known engine executable for platform '{platform}'")]
    UnsupportedPlatform { platform: String },

    #[error("engine failure during {operation}: {source}")]
    EngineFailure {
        operation: EngineOperation,
        #[source]
        source: EngineError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wraps an engine error together with the operation that produced it.
    pub fn engine(operation: EngineOperation, source: EngineError) -> Self {
        Error::EngineFailure { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_failure_names_operation() {
        let err = Error::engine(EngineOperation::Bake, EngineError::new("cache locked"));
        assert_eq!(err.to_string(), "engine failure during bake: cache locked");
    }

    #[test]
    fn io_and_json_errors_convert() {
        let io: Error = std::io::Error::other("gone").into();
        assert!(matches!(io, Error::Io(_)));

        let json: Error = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(json, Error::Json(_)));
    }
}
