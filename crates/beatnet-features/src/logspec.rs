//! Log-spectrum utilities: compression, spectral difference, stacking.

/// Log compression: `log10(mul * x + add)`, floored to avoid `log(0)`.
pub fn log_compress(input: &[f32], mul: f32, add: f32) -> Vec<f32> {
    input
        .iter()
        .map(|&x| (mul * x + add).max(1e-6).log10())
        .collect()
}

/// Stateful first-order spectral difference.
///
/// The first frame has no predecessor, so its difference is all zeros.
pub struct SpectralDiff {
    previous: Vec<f32>,
    positive_only: bool,
}

impl SpectralDiff {
    pub fn new(positive_only: bool) -> Self {
        Self {
            previous: Vec::new(),
            positive_only,
        }
    }

    /// Difference against the previous frame, updating the stored frame.
    pub fn process(&mut self, current: &[f32]) -> Vec<f32> {
        if self.previous.len() != current.len() {
            self.previous = current.to_vec();
            return vec![0.0; current.len()];
        }

        let diff: Vec<f32> = current
            .iter()
            .zip(self.previous.iter())
            .map(|(&cur, &prev)| {
                let delta = cur - prev;
                if self.positive_only {
                    delta.max(0.0)
                } else {
                    delta
                }
            })
            .collect();

        self.previous.copy_from_slice(current);
        diff
    }

    /// Forget the stored frame.
    pub fn reset(&mut self) {
        self.previous.clear();
    }
}

/// Stack two feature halves into one vector.
pub fn stack_features(bands: &[f32], diff: &[f32]) -> Vec<f32> {
    let mut out = Vec::with_capacity(bands.len() + diff.len());
    out.extend_from_slice(bands);
    out.extend_from_slice(diff);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_log_compress_floors_at_epsilon() {
        let out = log_compress(&[-2.0, 0.0, 9.0], 1.0, 1.0);
        assert_abs_diff_eq!(out[0], 1e-6f32.log10(), epsilon = 1e-6);
        assert_abs_diff_eq!(out[1], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(out[2], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_first_diff_is_zero() {
        let mut diff = SpectralDiff::new(true);
        let out = diff.process(&[1.0, 2.0, 3.0]);
        assert_eq!(out, vec![0.0; 3]);
    }

    #[test]
    fn test_positive_diff_clamps_decreases() {
        let mut diff = SpectralDiff::new(true);
        diff.process(&[1.0, 5.0]);
        let out = diff.process(&[3.0, 2.0]);
        assert_eq!(out, vec![2.0, 0.0]);
    }

    #[test]
    fn test_signed_diff_keeps_decreases() {
        let mut diff = SpectralDiff::new(false);
        diff.process(&[1.0, 5.0]);
        let out = diff.process(&[3.0, 2.0]);
        assert_eq!(out, vec![2.0, -3.0]);
    }

    #[test]
    fn test_stack_concatenates() {
        let out = stack_features(&[1.0, 2.0], &[3.0]);
        assert_eq!(out, vec![1.0, 2.0, 3.0]);
    }
}
