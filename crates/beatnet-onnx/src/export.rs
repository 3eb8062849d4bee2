//! Model export.
//!
//! One configurable entry point covers what used to be three near-identical
//! scripts: the operating mode, the downstream inference algorithm, the
//! optional softmax head and the optional post-export check are all
//! [`ExportOptions`] knobs. Validation failure is reported as data in the
//! returned [`ExportReport`], not swallowed; whether it is fatal is the
//! caller's call.

use crate::check::{check_model_file, ValidationError};
use crate::config::ExportOptions;
use crate::error::Result;
use crate::graph::Estimator;
use prost::Message;
use std::path::{Path, PathBuf};

/// Outcome of the optional post-export structural check.
#[derive(Debug)]
pub enum ValidationOutcome {
    /// The check was not requested.
    Skipped,
    /// The written file passed.
    Valid,
    /// The written file failed, with the specific defect.
    Invalid(ValidationError),
}

impl ValidationOutcome {
    /// True unless the check ran and failed.
    pub fn is_valid(&self) -> bool {
        !matches!(self, ValidationOutcome::Invalid(_))
    }
}

/// What one export run produced.
#[derive(Debug)]
pub struct ExportReport {
    pub path: PathBuf,
    pub bytes_written: u64,
    pub validation: ValidationOutcome,
}

/// Export the network described by `options` to `path`, overwriting any
/// existing file.
pub fn export_model(options: &ExportOptions, path: impl AsRef<Path>) -> Result<ExportReport> {
    let path = path.as_ref();
    let estimator = match options.seed {
        Some(seed) => Estimator::with_seed(options.estimator.clone(), seed)?,
        None => Estimator::new(options.estimator.clone())?,
    };

    let metadata = [
        ("mode", options.estimator.mode.as_str().to_string()),
        (
            "inference_algorithm",
            options.estimator.algorithm.as_str().to_string(),
        ),
    ];
    let model = estimator
        .network()
        .to_model_proto(options.append_softmax, &metadata);

    let bytes = model.encode_to_vec();
    std::fs::write(path, &bytes)?;
    tracing::info!(
        path = %path.display(),
        bytes = bytes.len(),
        softmax = options.append_softmax,
        mode = options.estimator.mode.as_str(),
        "exported model"
    );

    let validation = if options.validate_after_export {
        match check_model_file(path) {
            Ok(()) => ValidationOutcome::Valid,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "exported model failed validation");
                ValidationOutcome::Invalid(e)
            }
        }
    } else {
        ValidationOutcome::Skipped
    };

    Ok(ExportReport {
        path: path.to_path_buf(),
        bytes_written: bytes.len() as u64,
        validation,
    })
}
