//! Logarithmically spaced triangular filterbank.
//!
//! Filter centers sit at `fmin * 2^(i / bands_per_octave)`; each filter is a
//! triangle spanning its two neighbors, optionally normalized to unit area.
//! Bin positions use the analysis frame's spectral resolution, so the
//! filters cover the lower portion of the padded FFT's bins.

/// Triangular filterbank applied to magnitude spectra.
pub struct FilterBank {
    filters: Vec<Vec<f32>>,
}

impl FilterBank {
    /// Build a filterbank.
    ///
    /// * `bands_per_octave` - filters per octave between `fmin` and `fmax`
    /// * `spectrum_bins` - spectral resolution used for Hz-to-bin mapping
    /// * `sample_rate` - rate the spectra were computed at
    /// * `normalize` - scale each filter to unit area
    pub fn new(
        bands_per_octave: usize,
        spectrum_bins: usize,
        sample_rate: u32,
        fmin: f32,
        fmax: f32,
        normalize: bool,
    ) -> Self {
        let octaves = (fmax / fmin).log2();
        let num_filters = (octaves * bands_per_octave as f32).floor() as usize;

        let centers: Vec<f32> = (0..num_filters + 2)
            .map(|i| fmin * 2.0f32.powf(i as f32 / bands_per_octave as f32))
            .collect();

        let hz_to_bin = |f: f32| f / sample_rate as f32 * spectrum_bins as f32;
        let filter_len = spectrum_bins / 2 + 1;

        let mut filters = Vec::with_capacity(num_filters);
        for i in 1..centers.len() - 1 {
            let mut filter = vec![0.0f32; filter_len];
            let left = hz_to_bin(centers[i - 1]);
            let center = hz_to_bin(centers[i]);
            let right = hz_to_bin(centers[i + 1]);

            let mut bin = left.ceil() as usize;
            while (bin as f32) < center.ceil() && bin < filter_len {
                filter[bin] = (bin as f32 - left) / (center - left);
                bin += 1;
            }
            let mut bin = center.ceil() as usize;
            while (bin as f32) < right.ceil() && bin < filter_len {
                filter[bin] = (right - bin as f32) / (right - center);
                bin += 1;
            }

            if normalize {
                let sum: f32 = filter.iter().sum();
                if sum > 0.0 {
                    for v in &mut filter {
                        *v /= sum;
                    }
                }
            }

            filters.push(filter);
        }

        Self { filters }
    }

    /// Number of bands in the bank.
    pub fn num_bands(&self) -> usize {
        self.filters.len()
    }

    /// Apply the bank to a magnitude spectrum, yielding one value per band.
    pub fn apply(&self, spectrum: &[f32]) -> Vec<f32> {
        self.filters
            .iter()
            .map(|filter| {
                filter
                    .iter()
                    .zip(spectrum.iter())
                    .map(|(w, m)| w * m)
                    .sum()
            })
            .collect()
    }
}
