//! Centralized error type for the beatnet umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Features: {0}")]
    Features(#[from] beatnet_features::FeatureError),

    #[error("ONNX: {0}")]
    Onnx(#[from] beatnet_onnx::OnnxError),

    #[error("Tracker: {0}")]
    Tracker(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
