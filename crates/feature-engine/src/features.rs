//! Log-Mel Feature Vector Assembly

use crate::config::FeatureConfig;
use crate::error::FeatureError;
use crate::fft::SpectralTransform;
use crate::filterbank::MelFilterbank;
use serde::{Deserialize, Serialize};
use signal_conditioner::SignalConditioner;
use std::sync::Arc;
use tracing::{debug, info};

/// Default additive guard before log compression
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Log-mel feature vector handed to the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Log mel energies, one per filter in ascending filter order
    pub values: Vec<f64>,
    /// Cycle counter of the frame these features came from
    pub sequence: u64,
    /// Wall-clock time when features were computed
    pub timestamp_ms: u64,
}

impl FeatureVector {
    /// Stamp a set of values with the current wall-clock time
    pub fn new(values: Vec<f64>, sequence: u64) -> Self {
        let timestamp_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self {
            values,
            sequence,
            timestamp_ms,
        }
    }

    /// Feature dimension
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vector holds no features
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Projects a magnitude spectrum onto a mel filterbank
#[derive(Debug, Clone, Copy)]
pub struct FeatureReducer {
    epsilon: f64,
}

impl Default for FeatureReducer {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

impl FeatureReducer {
    /// Create a reducer with log guard `epsilon`
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// `ln(sum_k |X[k]|^2 * w[m][k] + epsilon)` for every filter `m`
    pub fn reduce(&self, magnitudes: &[f64], filterbank: &MelFilterbank) -> Vec<f64> {
        assert_eq!(
            magnitudes.len(),
            filterbank.num_bins(),
            "Magnitude spectrum does not match filterbank bins"
        );

        (0..filterbank.num_filters())
            .map(|m| {
                let weights = filterbank.weights(m);
                let energy: f64 = filterbank
                    .support(m)
                    .map(|k| magnitudes[k] * magnitudes[k] * weights[k])
                    .sum();
                (energy + self.epsilon).ln()
            })
            .collect()
    }
}

/// Runs conditioning, transform and reduction over one frame
pub struct FeatureExtractor {
    conditioner: SignalConditioner,
    transform: SpectralTransform,
    filterbank: Arc<MelFilterbank>,
    reducer: FeatureReducer,
    /// Frames processed so far
    sequence: u64,
}

impl FeatureExtractor {
    /// Validate `config` and build every stage, including the filterbank
    pub fn new(config: &FeatureConfig) -> Result<Self, FeatureError> {
        config.validate()?;
        let filterbank =
            MelFilterbank::build(config.sample_rate, config.transform_size, config.num_filters)?;
        Self::with_filterbank(config, Arc::new(filterbank))
    }

    /// Build the stages around an existing filterbank
    pub fn with_filterbank(
        config: &FeatureConfig,
        filterbank: Arc<MelFilterbank>,
    ) -> Result<Self, FeatureError> {
        config.validate()?;
        if filterbank.transform_size() != config.transform_size
            || filterbank.num_filters() != config.num_filters
            || (filterbank.sample_rate() - config.sample_rate).abs() > f64::EPSILON
        {
            return Err(FeatureError::FilterbankMismatch {
                filters: filterbank.num_filters(),
                size: filterbank.transform_size(),
                sample_rate: filterbank.sample_rate(),
            });
        }

        info!(
            "Feature extractor ready: {} mel features per {}-sample frame",
            config.num_filters, config.transform_size
        );

        Ok(Self {
            conditioner: SignalConditioner::new(config.pre_emphasis, config.carry_scope),
            transform: SpectralTransform::new(config.transform_size),
            filterbank,
            reducer: FeatureReducer::new(config.epsilon),
            sequence: 0,
        })
    }

    /// Condition, transform and reduce `frame` (overwritten in the process)
    pub fn extract(&mut self, frame: &mut [f64]) -> FeatureVector {
        self.conditioner.condition(frame);
        let magnitudes = self.transform.transform(frame);
        let values = self.reducer.reduce(magnitudes, &self.filterbank);

        let sequence = self.sequence;
        self.sequence += 1;
        debug!("Frame {} reduced to {} features", sequence, values.len());

        FeatureVector::new(values, sequence)
    }

    /// Clear conditioner state (pre-emphasis carry)
    pub fn reset(&mut self) {
        self.conditioner.reset();
    }

    /// Samples expected per frame
    pub fn frame_len(&self) -> usize {
        self.transform.size()
    }

    /// Number of frames processed
    pub fn frames_processed(&self) -> u64 {
        self.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use signal_conditioner::CarryScope;

    fn silent_log() -> f64 {
        (0.0f64 + 1e-6).ln()
    }

    #[test]
    fn test_silence_end_to_end() {
        let config = FeatureConfig::default();
        let mut extractor = FeatureExtractor::new(&config).unwrap();

        // 256 mid-scale readings re-centred to zero
        let mut frame: Vec<f64> = vec![2048.0 - 2048.0; 256];
        let features = extractor.extract(&mut frame);

        assert_eq!(features.len(), 40);
        for &v in &features.values {
            assert!((v - silent_log()).abs() < 1e-9);
            assert!((v - (-13.8155)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_silence_magnitudes_are_zero() {
        let config = FeatureConfig::default();
        let mut conditioner = SignalConditioner::new(config.pre_emphasis, CarryScope::Session);
        let mut transform = SpectralTransform::new(256);

        let mut frame = vec![0.0; 256];
        conditioner.condition(&mut frame);
        let magnitudes = transform.transform(&mut frame);
        assert!(magnitudes.iter().all(|&m| m.abs() < 1e-9));
    }

    #[test]
    fn test_tone_energy_lands_in_matching_filter() {
        let bank = MelFilterbank::build(16000.0, 256, 40).unwrap();
        let reducer = FeatureReducer::default();

        // Impulse at bin 32 (2000 Hz)
        let mut magnitudes = vec![0.0; 129];
        magnitudes[32] = 100.0;
        let features = reducer.reduce(&magnitudes, &bank);

        let loudest = features
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |acc, (m, &v)| if v > acc.1 { (m, v) } else { acc })
            .0;
        let tri = bank.edges(loudest);
        assert!(tri.left <= 2000.0 && 2000.0 <= tri.right);

        // Filters not covering bin 32 stay at the floor
        for (m, &v) in features.iter().enumerate() {
            if bank.weights(m)[32] == 0.0 {
                assert_eq!(v, silent_log());
            }
        }
    }

    #[test]
    fn test_extractor_counts_frames() {
        let mut extractor = FeatureExtractor::new(&FeatureConfig::default()).unwrap();
        for expected in 0..3 {
            let mut frame = vec![0.0; 256];
            assert_eq!(extractor.extract(&mut frame).sequence, expected);
        }
        assert_eq!(extractor.frames_processed(), 3);
    }

    #[test]
    fn test_rejects_mismatched_filterbank() {
        let bank = Arc::new(MelFilterbank::build(16000.0, 512, 40).unwrap());
        let result = FeatureExtractor::with_filterbank(&FeatureConfig::default(), bank);
        assert!(matches!(
            result,
            Err(FeatureError::FilterbankMismatch {
                filters: 40,
                size: 512,
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_filterbank_for_other_rate() {
        let bank = Arc::new(MelFilterbank::build(8000.0, 256, 40).unwrap());
        let result = FeatureExtractor::with_filterbank(&FeatureConfig::default(), bank);
        assert!(matches!(
            result,
            Err(FeatureError::FilterbankMismatch { sample_rate, .. }) if sample_rate == 8000.0
        ));
    }

    #[test]
    #[should_panic(expected = "Magnitude spectrum")]
    fn test_reduce_wrong_length() {
        let bank = MelFilterbank::build(16000.0, 256, 40).unwrap();
        FeatureReducer::default().reduce(&[0.0; 64], &bank);
    }

    proptest! {
        #[test]
        fn prop_reduce_is_deterministic(magnitudes in prop::collection::vec(0.0f64..1e4, 129)) {
            let bank = MelFilterbank::build(16000.0, 256, 40).unwrap();
            let reducer = FeatureReducer::default();

            let first = reducer.reduce(&magnitudes, &bank);
            let second = reducer.reduce(&magnitudes, &bank);
            prop_assert_eq!(&first, &second);
            prop_assert!(first.iter().all(|v| v.is_finite()));
            prop_assert!(first.iter().all(|&v| v >= silent_log()));
        }
    }
}
