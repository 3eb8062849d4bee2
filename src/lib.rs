//! # BeatNet
//!
//! Beat-tracking model export and streaming inference, built from modular
//! subsystems.
//!
//! This umbrella crate coordinates:
//! - **beatnet-onnx** - BDA network construction, ONNX export, structural
//!   validation, tract-backed inference sessions
//! - **beatnet-features** - streaming spectral feature front end (resample,
//!   frame, FFT, log filterbank, spectral diff)
//!
//! and adds [`BeatTracker`], which wires the two together: raw audio blocks
//! in, per-frame beat / downbeat / no-beat activations out.
//!
//! ## Quick Start
//!
//! ```no_run
//! use beatnet::onnx::{export_model, ExportOptions};
//! use beatnet::BeatTracker;
//!
//! // Export the model once.
//! let report = export_model(&ExportOptions::streaming_softmax(), "beatnet_bda.onnx")?;
//! assert!(report.validation.is_valid());
//!
//! // Track beats from streamed audio.
//! let mut tracker = BeatTracker::from_model("beatnet_bda.onnx", 44100, 512)?;
//! let block = vec![0.0f32; 512];
//! if let Some(activation) = tracker.process(&block)? {
//!     println!("beat: {:.3}", activation.beat);
//! }
//! # Ok::<(), beatnet::Error>(())
//! ```

/// Re-export of beatnet-features for direct access.
pub use beatnet_features as features;

/// Re-export of beatnet-onnx for direct access.
pub use beatnet_onnx as onnx;

mod error;
mod tracker;

pub use error::{Error, Result};
pub use tracker::{BeatActivation, BeatTracker};

// Commonly used subsystem types.
pub use beatnet_features::{FeatureExtractor, FEATURE_DIM, MODEL_SAMPLE_RATE};
pub use beatnet_onnx::{
    export_model, ActivationSession, EstimatorConfig, ExportOptions, ExportReport,
    InferenceAlgorithm, Mode, ValidationOutcome, NUM_CLASSES,
};
