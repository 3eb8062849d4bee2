//! Estimator and export configuration.

use crate::error::{OnnxError, Result};
use serde::{Deserialize, Serialize};

/// Operating mode of the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Causal, block-at-a-time operation.
    #[default]
    Streaming,
    /// Whole-signal operation.
    Offline,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Streaming => "streaming",
            Mode::Offline => "offline",
        }
    }
}

/// Post-network inference algorithm the activations feed into.
///
/// The choice does not change the exported graph; it is recorded in the
/// model metadata so downstream consumers know what the activations were
/// produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceAlgorithm {
    /// Particle filtering (streaming).
    #[default]
    ParticleFilter,
    /// Dynamic Bayesian network (offline).
    DynamicBayesian,
}

impl InferenceAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            InferenceAlgorithm::ParticleFilter => "particle_filter",
            InferenceAlgorithm::DynamicBayesian => "dynamic_bayesian",
        }
    }
}

/// Configuration for constructing the estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Input channel count. The network is mono only.
    pub channels: usize,
    pub mode: Mode,
    pub algorithm: InferenceAlgorithm,
    /// Plotting hook. Unsupported here and must stay disabled.
    pub plot: bool,
    /// Background inference thread. Unsupported here and must stay disabled.
    pub thread: bool,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            channels: 1,
            mode: Mode::Streaming,
            algorithm: InferenceAlgorithm::ParticleFilter,
            plot: false,
            thread: false,
        }
    }
}

impl EstimatorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.channels != 1 {
            return Err(OnnxError::InvalidConfig(format!(
                "network is mono, got {} channels",
                self.channels
            )));
        }
        if self.plot {
            return Err(OnnxError::InvalidConfig("plotting is not supported".into()));
        }
        if self.thread {
            return Err(OnnxError::InvalidConfig(
                "background threading is not supported".into(),
            ));
        }
        Ok(())
    }
}

/// Options for one export run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOptions {
    pub estimator: EstimatorConfig,
    /// Append a softmax over the class axis so the output is a probability
    /// distribution per time step.
    pub append_softmax: bool,
    /// Structurally validate the written file after export.
    pub validate_after_export: bool,
    /// Weight initialization seed. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::streaming_softmax()
    }
}

impl ExportOptions {
    /// Streaming particle-filter export with softmax and post-export check.
    pub fn streaming_softmax() -> Self {
        Self {
            estimator: EstimatorConfig::default(),
            append_softmax: true,
            validate_after_export: true,
            seed: None,
        }
    }

    /// Offline dynamic-Bayesian export, raw scores, no post-export check.
    pub fn offline() -> Self {
        Self {
            estimator: EstimatorConfig {
                mode: Mode::Offline,
                algorithm: InferenceAlgorithm::DynamicBayesian,
                ..Default::default()
            },
            append_softmax: false,
            validate_after_export: false,
            seed: None,
        }
    }

    /// Streaming particle-filter export, raw scores, with post-export check.
    pub fn streaming_raw() -> Self {
        Self {
            estimator: EstimatorConfig::default(),
            append_softmax: false,
            validate_after_export: true,
            seed: None,
        }
    }

    /// Fix the weight initialization seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EstimatorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_multichannel_rejected() {
        let config = EstimatorConfig {
            channels: 2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_plot_and_thread_rejected() {
        let plot = EstimatorConfig {
            plot: true,
            ..Default::default()
        };
        assert!(plot.validate().is_err());

        let thread = EstimatorConfig {
            thread: true,
            ..Default::default()
        };
        assert!(thread.validate().is_err());
    }

    #[test]
    fn test_presets_match_script_variants() {
        let a = ExportOptions::streaming_softmax();
        assert!(a.append_softmax && a.validate_after_export);
        assert_eq!(a.estimator.mode, Mode::Streaming);

        let b = ExportOptions::offline();
        assert!(!b.append_softmax && !b.validate_after_export);
        assert_eq!(b.estimator.algorithm, InferenceAlgorithm::DynamicBayesian);

        let c = ExportOptions::streaming_raw();
        assert!(!c.append_softmax && c.validate_after_export);
        assert_eq!(c.estimator.algorithm, InferenceAlgorithm::ParticleFilter);
    }
}
