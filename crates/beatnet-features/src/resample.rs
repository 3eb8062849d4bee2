//! Block-based mono resampling using rubato.
//!
//! Converts fixed-size audio blocks from the host sample rate to the model
//! rate. The block size is fixed at construction, matching how an audio
//! callback delivers data.

use crate::error::{FeatureError, Result};
use rubato::{FftFixedIn, Resampler};

/// Resamples fixed-size mono blocks to a target rate.
pub struct BlockResampler {
    /// None when input and output rates match (passthrough).
    inner: Option<FftFixedIn<f32>>,
    block_size: usize,
    /// Nominal output length for one block, used for silence fills.
    nominal_out: usize,
}

impl BlockResampler {
    /// Create a resampler for `block_size` input frames per call.
    pub fn new(input_rate: u32, output_rate: u32, block_size: usize) -> Result<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(FeatureError::InvalidConfig(format!(
                "sample rates must be positive (got {} -> {})",
                input_rate, output_rate
            )));
        }
        if block_size == 0 {
            return Err(FeatureError::InvalidConfig(
                "block_size must be positive".into(),
            ));
        }

        let nominal_out =
            (block_size as f64 * output_rate as f64 / input_rate as f64).round() as usize;

        let inner = if input_rate == output_rate {
            None
        } else {
            Some(FftFixedIn::<f32>::new(
                input_rate as usize,
                output_rate as usize,
                block_size,
                2,
                1,
            )?)
        };

        Ok(Self {
            inner,
            block_size,
            nominal_out,
        })
    }

    /// Input block size in frames.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Resample one block.
    ///
    /// An empty input yields a silent block of the nominal output length,
    /// so a stalled audio callback keeps the downstream clock running.
    /// Short blocks are zero-padded to the configured size.
    pub fn process(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        if input.is_empty() {
            return Ok(vec![0.0; self.nominal_out]);
        }

        let inner = match &mut self.inner {
            None => return Ok(input.to_vec()),
            Some(inner) => inner,
        };

        let needed = inner.input_frames_next();
        let mut chunk = vec![0.0f32; needed];
        let copy = input.len().min(needed);
        chunk[..copy].copy_from_slice(&input[..copy]);

        let channels = vec![chunk];
        let mut output = inner.process(&channels, None)?;
        Ok(output.pop().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_at_model_rate() {
        let mut resampler = BlockResampler::new(22050, 22050, 441).unwrap();
        let block: Vec<f32> = (0..441).map(|i| i as f32).collect();
        let out = resampler.process(&block).unwrap();
        assert_eq!(out, block);
    }

    #[test]
    fn test_halving_rate_halves_block() {
        let mut resampler = BlockResampler::new(44100, 22050, 512).unwrap();
        let block = vec![0.5f32; 512];
        let out = resampler.process(&block).unwrap();
        // FFT resamplers carry internal latency but keep the nominal ratio.
        assert_eq!(out.len(), 256);
    }

    #[test]
    fn test_empty_input_yields_silence() {
        let mut resampler = BlockResampler::new(96000, 22050, 256).unwrap();
        let out = resampler.process(&[]).unwrap();
        let expected = (256.0f64 * 22050.0 / 96000.0).round() as usize;
        assert_eq!(out.len(), expected);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_zero_block_size_rejected() {
        assert!(BlockResampler::new(44100, 22050, 0).is_err());
        assert!(BlockResampler::new(0, 22050, 512).is_err());
    }
}
