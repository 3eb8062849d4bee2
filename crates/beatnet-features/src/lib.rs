//! # BeatNet Features
//!
//! Streaming spectral feature extraction for the BeatNet beat-tracking
//! network.
//!
//! The network consumes 272-wide feature vectors: a 136-band log-compressed
//! filterbank spectrum stacked with its positive first-order difference.
//! This crate turns raw mono audio blocks at an arbitrary sample rate into
//! exactly that, one frame at a time:
//!
//! 1. [`BlockResampler`] - resample each block to the model rate (22050 Hz)
//! 2. [`FrameAssembler`] - collect samples in a ring buffer and hand out
//!    1411-sample analysis frames
//! 3. [`SpectrumProcessor`] - Hann window, zero-pad to 2048, magnitude FFT
//! 4. [`FilterBank`] - logarithmically spaced triangular filters
//! 5. [`log_compress`] / [`SpectralDiff`] / [`stack_features`] - final
//!    feature assembly
//!
//! [`FeatureExtractor`] composes the whole chain.
//!
//! ## Example
//!
//! ```rust
//! use beatnet_features::{FeatureExtractor, FEATURE_DIM};
//!
//! let mut extractor = FeatureExtractor::new(44100, 512).unwrap();
//! let block = vec![0.0f32; 512];
//!
//! // The first few blocks only warm up the frame buffer.
//! if let Some(features) = extractor.process(&block).unwrap() {
//!     assert_eq!(features.len(), FEATURE_DIM);
//! }
//! ```

pub mod error;
pub mod extractor;
pub mod filterbank;
pub mod frame;
pub mod logspec;
pub mod resample;
pub mod spectrum;

pub use error::{FeatureError, Result};
pub use extractor::FeatureExtractor;
pub use filterbank::FilterBank;
pub use frame::FrameAssembler;
pub use logspec::{log_compress, stack_features, SpectralDiff};
pub use resample::BlockResampler;
pub use spectrum::SpectrumProcessor;

/// Sample rate the network was trained at.
pub const MODEL_SAMPLE_RATE: u32 = 22050;

/// Analysis frame length in samples (64 ms at 22050 Hz).
pub const FRAME_LENGTH: usize = 1411;

/// Hop between analysis frames in samples (20 ms at 22050 Hz).
///
/// Hopping is caller-paced: one processed block of `HOP_SIZE` resampled
/// samples advances the analysis by exactly one hop.
pub const HOP_SIZE: usize = 441;

/// Number of magnitude bins kept from the padded FFT.
pub const SPECTRUM_BINS: usize = FRAME_LENGTH / 2 + 1; // 706

/// FFT length after zero-padding (smallest power of two above FRAME_LENGTH).
pub const FFT_PAD_LENGTH: usize = 2048;

/// Triangular filterbank bands per octave.
pub const BANDS_PER_OCTAVE: usize = 16;

/// Lowest filter center frequency in Hz.
pub const FMIN_HZ: f32 = 30.0;

/// Highest filter center frequency in Hz.
pub const FMAX_HZ: f32 = 11025.0;

/// Width of the feature vector the network expects.
///
/// Filterbank bands plus their positive first-order difference.
pub const FEATURE_DIM: usize = 272;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_are_consistent() {
        // 136 filterbank bands, stacked with their diff, must fill the
        // network's input width exactly.
        let octaves = (FMAX_HZ / FMIN_HZ).log2();
        let bands = (octaves * BANDS_PER_OCTAVE as f32).floor() as usize;
        assert_eq!(bands * 2, FEATURE_DIM);
        assert_eq!(SPECTRUM_BINS, 706);
        assert!(FFT_PAD_LENGTH.is_power_of_two());
        assert!(FFT_PAD_LENGTH >= FRAME_LENGTH);
    }
}
