//! Error types for export and inference.

use crate::check::ValidationError;
use thiserror::Error;

/// Error type for graph export and runtime sessions.
#[derive(Error, Debug)]
pub enum OnnxError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid estimator or export configuration.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Structural validation failure.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Runtime (load/optimize/run) failure.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Tensor shape mismatch.
    #[error("Shape error: {0}")]
    Shape(String),
}

/// Result type for export and inference operations.
pub type Result<T> = std::result::Result<T, OnnxError>;

// Convert external library errors to simple strings at the API boundary.

impl From<tract_onnx::prelude::TractError> for OnnxError {
    fn from(e: tract_onnx::prelude::TractError) -> Self {
        OnnxError::Runtime(format!("{e:#}"))
    }
}

impl From<tract_onnx::prelude::tract_ndarray::ShapeError> for OnnxError {
    fn from(e: tract_onnx::prelude::tract_ndarray::ShapeError) -> Self {
        OnnxError::Shape(e.to_string())
    }
}
