//! Magnitude spectrum computation using rustfft.
//!
//! Frames are Hann-windowed, zero-padded to a power-of-two length, and
//! transformed. Only the bins covering the original frame length are kept,
//! matching the resolution the filterbank was designed for.

use rustfft::{num_complex::Complex, FftPlanner};

/// Computes magnitude spectra of fixed-size analysis frames.
pub struct SpectrumProcessor {
    frame_size: usize,
    padded_size: usize,
    bins: usize,
    planner: FftPlanner<f32>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
}

impl SpectrumProcessor {
    /// Create a processor for `frame_size` samples, zero-padded to
    /// `padded_size`, keeping the first `bins` magnitude bins.
    pub fn new(frame_size: usize, bins: usize, padded_size: usize) -> Self {
        let padded_size = padded_size.next_power_of_two();
        let window = hann_window(frame_size);
        Self {
            frame_size,
            padded_size,
            bins,
            planner: FftPlanner::new(),
            window,
            buffer: vec![Complex::new(0.0, 0.0); padded_size],
        }
    }

    /// Number of magnitude bins returned per frame.
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Compute the magnitude spectrum of one frame.
    ///
    /// Frames longer than the configured size are truncated, shorter ones
    /// are treated as zero-padded.
    pub fn magnitudes(&mut self, frame: &[f32]) -> Vec<f32> {
        self.buffer.fill(Complex::new(0.0, 0.0));
        let n = frame.len().min(self.frame_size);
        for i in 0..n {
            self.buffer[i] = Complex::new(frame[i] * self.window[i], 0.0);
        }

        let fft = self.planner.plan_fft_forward(self.padded_size);
        fft.process(&mut self.buffer);

        self.buffer[..self.bins].iter().map(|c| c.norm()).collect()
    }
}

/// Hann window of length `size`.
pub fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size as f32 - 1.0)).cos())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_hann_window_endpoints_and_peak() {
        let window = hann_window(1024);
        assert_abs_diff_eq!(window[0], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(window[1023], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(window[511], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_silence_gives_zero_spectrum() {
        let mut processor = SpectrumProcessor::new(1411, 706, 2048);
        let spectrum = processor.magnitudes(&vec![0.0; 1411]);
        assert_eq!(spectrum.len(), 706);
        assert!(spectrum.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_sine_peaks_near_expected_bin() {
        let frame_size = 1411;
        let padded = 2048;
        let sr = 22050.0f32;
        let freq = 440.0f32;
        let frame: Vec<f32> = (0..frame_size)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sr).sin())
            .collect();

        let mut processor = SpectrumProcessor::new(frame_size, 706, padded);
        let spectrum = processor.magnitudes(&frame);

        let peak = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        let expected = (freq / sr * padded as f32).round() as usize;
        assert!(
            (peak as i64 - expected as i64).abs() <= 2,
            "peak bin {} too far from expected {}",
            peak,
            expected
        );
    }
}
