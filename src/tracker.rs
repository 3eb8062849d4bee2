//! Streaming beat tracker: audio blocks in, class activations out.

use crate::error::{Error, Result};
use beatnet_features::FeatureExtractor;
use beatnet_onnx::{ActivationSession, NUM_CLASSES};
use std::path::Path;

/// Network activations for one analysis frame.
///
/// With a softmax-exported model these form a probability distribution;
/// with a raw export they are unnormalized scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatActivation {
    pub beat: f32,
    pub downbeat: f32,
    pub no_beat: f32,
}

/// Streams audio through the feature front end and the exported network.
///
/// Call [`process`](Self::process) once per audio block; during the first
/// few blocks the frame buffer is still filling and `Ok(None)` comes back.
pub struct BeatTracker {
    extractor: FeatureExtractor,
    session: ActivationSession,
}

impl BeatTracker {
    /// Load an exported model and set up the front end for audio at
    /// `sample_rate`, delivered in blocks of `block_size` samples.
    pub fn from_model(
        model_path: impl AsRef<Path>,
        sample_rate: u32,
        block_size: usize,
    ) -> Result<Self> {
        // One feature frame per inference call.
        let session = ActivationSession::load(model_path, 1, 1)?;
        let extractor = FeatureExtractor::new(sample_rate, block_size)?;
        Ok(Self { extractor, session })
    }

    /// Process one block of mono audio.
    pub fn process(&mut self, block: &[f32]) -> Result<Option<BeatActivation>> {
        let features = match self.extractor.process(block)? {
            Some(features) => features,
            None => return Ok(None),
        };

        let output = self.session.run(&features)?;
        if output.data.len() < NUM_CLASSES {
            return Err(Error::Tracker(format!(
                "model produced {} values, expected at least {}",
                output.data.len(),
                NUM_CLASSES
            )));
        }

        // Output is (1, 3, 1): beat, downbeat, no-beat.
        Ok(Some(BeatActivation {
            beat: output.data[0],
            downbeat: output.data[1],
            no_beat: output.data[2],
        }))
    }

    /// Drop buffered audio and spectral state, restarting the warm-up.
    pub fn reset(&mut self) {
        self.extractor.reset();
    }
}
