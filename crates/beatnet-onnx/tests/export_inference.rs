//! End-to-end: export a model, load it back with tract, run inference.

use approx::assert_abs_diff_eq;
use beatnet_onnx::{
    export_model, ActivationSession, ExportOptions, ValidationOutcome, FEATURE_WIDTH, NUM_CLASSES,
};

fn export_to_temp(options: &ExportOptions) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.onnx");
    let report = export_model(options, &path).unwrap();
    assert!(report.validation.is_valid());
    (dir, path)
}

#[test]
fn test_softmax_export_runs_and_normalizes() {
    let (_dir, path) = export_to_temp(&ExportOptions::streaming_softmax().with_seed(1));

    let time_steps = 100;
    let session = ActivationSession::load(&path, 1, time_steps).unwrap();
    assert_eq!(session.input_name(), "input");

    let output = session.run_random().unwrap();
    assert_eq!(output.shape, vec![1, NUM_CLASSES, time_steps]);

    // Each time step's class scores form a probability distribution.
    for t in 0..time_steps {
        let sum: f32 = (0..NUM_CLASSES)
            .map(|c| output.data[c * time_steps + t])
            .sum();
        assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-4);
    }
}

#[test]
fn test_raw_export_is_not_normalized() {
    let (_dir, path) = export_to_temp(&ExportOptions::streaming_raw().with_seed(2));

    let time_steps = 32;
    let session = ActivationSession::load(&path, 1, time_steps).unwrap();
    let output = session.run_random().unwrap();
    assert_eq!(output.shape, vec![1, NUM_CLASSES, time_steps]);

    let off_by_much = (0..time_steps).any(|t| {
        let sum: f32 = (0..NUM_CLASSES)
            .map(|c| output.data[c * time_steps + t])
            .sum();
        (sum - 1.0).abs() > 1e-3
    });
    assert!(off_by_much, "raw scores should not sum to 1 everywhere");
}

#[test]
fn test_dynamic_time_axis_roundtrip() {
    let (_dir, path) = export_to_temp(&ExportOptions::streaming_softmax().with_seed(3));

    for time_steps in [1, 7, 256] {
        let session = ActivationSession::load(&path, 1, time_steps).unwrap();
        let output = session.run_random().unwrap();
        assert_eq!(output.shape, vec![1, NUM_CLASSES, time_steps]);
    }
}

#[test]
fn test_wrong_feature_width_fails_at_runtime() {
    let (_dir, path) = export_to_temp(&ExportOptions::streaming_softmax().with_seed(4));

    let result = ActivationSession::load_with_shape(&path, [1, 10, 100]);
    assert!(
        result.is_err(),
        "a {} -> 100 width mismatch must be rejected",
        FEATURE_WIDTH
    );
}

#[test]
fn test_offline_export_loads_too() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.onnx");
    let report = export_model(&ExportOptions::offline().with_seed(5), &path).unwrap();
    assert!(matches!(report.validation, ValidationOutcome::Skipped));

    let session = ActivationSession::load(&path, 1, 16).unwrap();
    let output = session.run_random().unwrap();
    assert_eq!(output.shape, vec![1, NUM_CLASSES, 16]);
}
