//! # BeatNet ONNX
//!
//! Builds the BeatNet "BDA" beat-tracking network as an ONNX graph, exports
//! it to disk, structurally validates the result, and runs it through
//! tract-onnx.
//!
//! The exported graph takes a `(batch, time, 272)` float tensor of spectral
//! features and produces `(batch, 3, time)` activations for the classes
//! beat / downbeat / no-beat. Batch and time axes are dynamic; the feature
//! width is fixed at export time.
//!
//! ## Example
//!
//! ```no_run
//! use beatnet_onnx::{export_model, ActivationSession, ExportOptions};
//!
//! let report = export_model(&ExportOptions::streaming_softmax(), "beatnet_bda.onnx")?;
//! assert!(report.validation.is_valid());
//!
//! let session = ActivationSession::load("beatnet_bda.onnx", 1, 256)?;
//! let output = session.run_random()?;
//! assert_eq!(output.shape, vec![1, 3, 256]);
//! # Ok::<(), beatnet_onnx::OnnxError>(())
//! ```

pub mod check;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod pb;
pub mod session;

pub use check::{check_model, check_model_file, ValidationError};
pub use config::{EstimatorConfig, ExportOptions, InferenceAlgorithm, Mode};
pub use error::{OnnxError, Result};
pub use export::{export_model, ExportReport, ValidationOutcome};
pub use graph::{BdaNetwork, Estimator};
pub use session::{ActivationSession, SessionOutput};

/// Feature width the network consumes.
pub const FEATURE_WIDTH: usize = 272;

/// Hidden width of each recurrent layer.
pub const HIDDEN_SIZE: usize = 150;

/// Output classes: beat, downbeat, no-beat.
pub const NUM_CLASSES: usize = 3;

/// ONNX opset the graph targets.
pub const OPSET_VERSION: i64 = 17;

/// Name of the graph's input tensor.
pub const INPUT_NAME: &str = "input";

/// Name of the graph's output tensor.
pub const OUTPUT_NAME: &str = "output";
