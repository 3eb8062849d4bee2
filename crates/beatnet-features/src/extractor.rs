//! Full feature extraction chain: blocks in, 272-wide feature frames out.

use crate::error::Result;
use crate::filterbank::FilterBank;
use crate::frame::FrameAssembler;
use crate::logspec::{log_compress, stack_features, SpectralDiff};
use crate::resample::BlockResampler;
use crate::spectrum::SpectrumProcessor;
use crate::{
    BANDS_PER_OCTAVE, FEATURE_DIM, FFT_PAD_LENGTH, FMAX_HZ, FMIN_HZ, FRAME_LENGTH,
    MODEL_SAMPLE_RATE, SPECTRUM_BINS,
};

/// Turns raw mono audio blocks into BeatNet feature vectors.
///
/// Composes resampling, frame assembly, magnitude spectra, the log
/// filterbank, and the positive spectral difference. Returns `None` until
/// the frame buffer holds one full analysis frame.
pub struct FeatureExtractor {
    resampler: BlockResampler,
    frames: FrameAssembler,
    spectrum: SpectrumProcessor,
    filterbank: FilterBank,
    diff: SpectralDiff,
}

impl FeatureExtractor {
    /// Create an extractor for audio at `input_rate` delivered in blocks of
    /// `block_size` samples.
    pub fn new(input_rate: u32, block_size: usize) -> Result<Self> {
        let resampler = BlockResampler::new(input_rate, MODEL_SAMPLE_RATE, block_size)?;
        tracing::debug!(input_rate, block_size, "feature extractor ready");
        Ok(Self {
            resampler,
            frames: FrameAssembler::new(FRAME_LENGTH),
            spectrum: SpectrumProcessor::new(FRAME_LENGTH, SPECTRUM_BINS, FFT_PAD_LENGTH),
            filterbank: FilterBank::new(
                BANDS_PER_OCTAVE,
                SPECTRUM_BINS,
                MODEL_SAMPLE_RATE,
                FMIN_HZ,
                FMAX_HZ,
                true,
            ),
            diff: SpectralDiff::new(true),
        })
    }

    /// Process one block. Yields a [`FEATURE_DIM`]-wide feature vector once
    /// the frame buffer has warmed up.
    pub fn process(&mut self, block: &[f32]) -> Result<Option<Vec<f32>>> {
        let resampled = self.resampler.process(block)?;
        let frame = match self.frames.process(&resampled) {
            Some(frame) => frame,
            None => return Ok(None),
        };

        let spectrum = self.spectrum.magnitudes(&frame);
        let bands = self.filterbank.apply(&spectrum);
        let log_bands = log_compress(&bands, 1.0, 1.0);
        let diff = self.diff.process(&log_bands);
        let features = stack_features(&log_bands, &diff);
        debug_assert_eq!(features.len(), FEATURE_DIM);
        Ok(Some(features))
    }

    /// Drop all buffered state, restarting the warm-up.
    pub fn reset(&mut self) {
        self.frames.reset();
        self.diff.reset();
    }
}
