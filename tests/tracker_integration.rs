//! Full-pipeline test: export a model, then track beats from streamed audio.

use approx::assert_abs_diff_eq;
use beatnet::{export_model, BeatTracker, ExportOptions};

fn export_to_temp(options: ExportOptions) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("beatnet_bda.onnx");
    let report = export_model(&options, &path).unwrap();
    assert!(report.validation.is_valid());
    (dir, path)
}

fn click_block(offset: usize, len: usize, sample_rate: f32, bpm: f32) -> Vec<f32> {
    // Short decaying clicks on the beat grid, silence in between.
    let period = (60.0 / bpm * sample_rate) as usize;
    (0..len)
        .map(|i| {
            let pos = (offset + i) % period;
            if pos < 64 {
                (1.0 - pos as f32 / 64.0) * (2.0 * std::f32::consts::PI * 0.3 * pos as f32).sin()
            } else {
                0.0
            }
        })
        .collect()
}

#[test]
fn test_tracker_warms_up_then_emits_probabilities() {
    let (_dir, path) = export_to_temp(ExportOptions::streaming_softmax().with_seed(21));

    let sample_rate = 44100;
    let block_size = 512;
    let mut tracker = BeatTracker::from_model(&path, sample_rate, block_size).unwrap();

    let first = tracker
        .process(&click_block(0, block_size, sample_rate as f32, 120.0))
        .unwrap();
    assert!(first.is_none(), "tracker should warm up before emitting");

    let mut activations = Vec::new();
    for call in 1..40 {
        let block = click_block(call * block_size, block_size, sample_rate as f32, 120.0);
        if let Some(activation) = tracker.process(&block).unwrap() {
            activations.push(activation);
        }
    }
    assert!(!activations.is_empty(), "tracker never finished warming up");

    // Softmax export: the three activations are a probability distribution.
    for activation in &activations {
        let sum = activation.beat + activation.downbeat + activation.no_beat;
        assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-4);
        assert!(activation.beat >= 0.0 && activation.downbeat >= 0.0 && activation.no_beat >= 0.0);
    }
}

#[test]
fn test_tracker_reset_restarts_warmup() {
    let (_dir, path) = export_to_temp(ExportOptions::streaming_softmax().with_seed(22));

    let mut tracker = BeatTracker::from_model(&path, 22050, 441).unwrap();
    let mut produced = false;
    for call in 0..8 {
        let block = click_block(call * 441, 441, 22050.0, 120.0);
        if tracker.process(&block).unwrap().is_some() {
            produced = true;
        }
    }
    assert!(produced);

    tracker.reset();
    let after_reset = tracker
        .process(&click_block(0, 441, 22050.0, 120.0))
        .unwrap();
    assert!(after_reset.is_none());
}

#[test]
fn test_tracker_accepts_raw_model_too() {
    let (_dir, path) = export_to_temp(ExportOptions::streaming_raw().with_seed(23));

    let mut tracker = BeatTracker::from_model(&path, 22050, 2048).unwrap();
    // One 2048-sample block at model rate exceeds a full analysis frame.
    let activation = tracker
        .process(&click_block(0, 2048, 22050.0, 120.0))
        .unwrap();
    assert!(activation.is_some());
}
