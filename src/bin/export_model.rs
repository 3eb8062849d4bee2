//! Export the BDA network to `beatnet_bda.onnx` and structurally check it.
//!
//! Takes no arguments; exits non-zero on export failure or when the written
//! file fails validation.

use beatnet::onnx::{export_model, ExportOptions, ValidationOutcome, FEATURE_WIDTH};
use std::process::ExitCode;

const MODEL_PATH: &str = "beatnet_bda.onnx";

fn main() -> ExitCode {
    let options = ExportOptions::streaming_softmax();
    println!("Expected dim_in: {}", FEATURE_WIDTH);

    let report = match export_model(&options, MODEL_PATH) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Export failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("Exported to {}", report.path.display());

    match report.validation {
        ValidationOutcome::Valid => {
            println!("ONNX model is valid.");
            ExitCode::SUCCESS
        }
        ValidationOutcome::Skipped => ExitCode::SUCCESS,
        ValidationOutcome::Invalid(e) => {
            eprintln!("Error: ONNX model is not valid: {e}");
            ExitCode::FAILURE
        }
    }
}
