//! Error types for the feature front end.

use thiserror::Error;

/// Feature extraction error type.
#[derive(Error, Debug)]
pub enum FeatureError {
    /// Invalid front-end configuration.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Resampling error.
    #[error("Resampling error: {0}")]
    Resample(String),

    /// Input block does not match the configured block size.
    #[error("Invalid block: {0}")]
    InvalidBlock(String),
}

/// Result type for feature operations.
pub type Result<T> = std::result::Result<T, FeatureError>;

// Convert external library errors to simple strings at the API boundary.

impl From<rubato::ResamplerConstructionError> for FeatureError {
    fn from(e: rubato::ResamplerConstructionError) -> Self {
        FeatureError::Resample(e.to_string())
    }
}

impl From<rubato::ResampleError> for FeatureError {
    fn from(e: rubato::ResampleError) -> Self {
        FeatureError::Resample(e.to_string())
    }
}
