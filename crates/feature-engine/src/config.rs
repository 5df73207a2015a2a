//! Feature extraction configuration

use crate::error::FeatureError;
use crate::features::DEFAULT_EPSILON;
use serde::{Deserialize, Serialize};
use signal_conditioner::{CarryScope, DEFAULT_PRE_EMPHASIS};

/// Feature extraction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Sampling rate in Hz
    pub sample_rate: f64,

    /// Samples per frame, also the FFT size (power of two)
    pub transform_size: usize,

    /// Number of mel filters (feature dimension)
    pub num_filters: usize,

    /// Pre-emphasis coefficient
    pub pre_emphasis: f64,

    /// Lifetime of the pre-emphasis carry
    pub carry_scope: CarryScope,

    /// Additive guard before log compression
    pub epsilon: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000.0,
            transform_size: 256,
            num_filters: 40,
            pre_emphasis: DEFAULT_PRE_EMPHASIS,
            carry_scope: CarryScope::Session,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl FeatureConfig {
    /// Number of non-negative frequency bins (`N/2 + 1`)
    pub fn num_bins(&self) -> usize {
        self.transform_size / 2 + 1
    }

    /// Time between two samples in seconds
    pub fn sample_period_secs(&self) -> f64 {
        1.0 / self.sample_rate
    }

    /// Check the scalar parameters.
    ///
    /// Filterbank geometry (empty filters) is checked when the bank is built.
    pub fn validate(&self) -> Result<(), FeatureError> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(FeatureError::InvalidSampleRate(self.sample_rate));
        }
        if self.transform_size < 2 || !self.transform_size.is_power_of_two() {
            return Err(FeatureError::InvalidTransformSize(self.transform_size));
        }
        if self.num_filters == 0 {
            return Err(FeatureError::NoFilters);
        }
        if self.num_filters > self.num_bins() {
            return Err(FeatureError::TooManyFilters {
                filters: self.num_filters,
                bins: self.num_bins(),
            });
        }
        if !(self.pre_emphasis > 0.0 && self.pre_emphasis < 1.0) {
            return Err(FeatureError::InvalidPreEmphasis(self.pre_emphasis));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(FeatureError::InvalidEpsilon(self.epsilon));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = FeatureConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.num_bins(), 129);
    }

    #[test]
    fn test_rejects_bad_sample_rate() {
        for rate in [0.0, -16000.0, f64::NAN, f64::INFINITY] {
            let config = FeatureConfig {
                sample_rate: rate,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(FeatureError::InvalidSampleRate(_))));
        }
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        let config = FeatureConfig {
            transform_size: 250,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(FeatureError::InvalidTransformSize(250)));
    }

    #[test]
    fn test_rejects_too_many_filters() {
        let config = FeatureConfig {
            num_filters: 130,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(FeatureError::TooManyFilters {
                filters: 130,
                bins: 129
            })
        );
    }

    #[test]
    fn test_rejects_bad_coefficients() {
        let config = FeatureConfig {
            pre_emphasis: 1.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(FeatureError::InvalidPreEmphasis(1.0)));

        let config = FeatureConfig {
            epsilon: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(FeatureError::InvalidEpsilon(0.0)));
    }
}
