//! Triangular Mel Filterbank

use crate::error::FeatureError;
use std::ops::RangeInclusive;
use tracing::{debug, info};

/// Hz to mel (natural-log form, 1125 * ln(1 + f/700))
#[inline]
pub fn hz_to_mel(hz: f64) -> f64 {
    1125.0 * (1.0 + hz / 700.0).ln()
}

/// Mel to Hz
#[inline]
pub fn mel_to_hz(mel: f64) -> f64 {
    700.0 * ((mel / 1125.0).exp() - 1.0)
}

/// Corner frequencies of one triangular filter (Hz)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleEdges {
    /// Start of the rising slope (weight 0)
    pub left: f64,
    /// Peak (weight 1)
    pub center: f64,
    /// End of the falling slope (weight 0)
    pub right: f64,
}

impl TriangleEdges {
    /// Weight of this triangle at frequency `freq`
    pub fn weight(&self, freq: f64) -> f64 {
        if freq < self.left || freq > self.right {
            0.0
        } else if freq <= self.center {
            if self.center > self.left {
                (freq - self.left) / (self.center - self.left)
            } else {
                1.0
            }
        } else if self.right > self.center {
            (self.right - freq) / (self.right - self.center)
        } else {
            1.0
        }
    }
}

/// Precomputed mel filterbank over the non-negative FFT bins.
///
/// Rows are stored densely (`num_filters x num_bins`) together with the
/// range of bins holding non-zero weights, so projection only walks each
/// filter's support.
#[derive(Debug, Clone)]
pub struct MelFilterbank {
    sample_rate: f64,
    transform_size: usize,
    num_bins: usize,
    weights: Vec<f64>,
    edges: Vec<TriangleEdges>,
    supports: Vec<RangeInclusive<usize>>,
}

impl MelFilterbank {
    /// Build `num_filters` triangles equally spaced in mel over `[0, sample_rate/2]`
    pub fn build(
        sample_rate: f64,
        transform_size: usize,
        num_filters: usize,
    ) -> Result<Self, FeatureError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(FeatureError::InvalidSampleRate(sample_rate));
        }
        if transform_size < 2 || !transform_size.is_power_of_two() {
            return Err(FeatureError::InvalidTransformSize(transform_size));
        }
        if num_filters == 0 {
            return Err(FeatureError::NoFilters);
        }
        let num_bins = transform_size / 2 + 1;
        if num_filters > num_bins {
            return Err(FeatureError::TooManyFilters {
                filters: num_filters,
                bins: num_bins,
            });
        }

        let mel_min = hz_to_mel(0.0);
        let mel_max = hz_to_mel(sample_rate / 2.0);

        // num_filters + 2 anchors; neighbouring triangles share them
        let anchors: Vec<f64> = (0..num_filters + 2)
            .map(|i| {
                let mel = mel_min + (mel_max - mel_min) * i as f64 / (num_filters + 1) as f64;
                mel_to_hz(mel)
            })
            .collect();

        let bin_hz = sample_rate / transform_size as f64;
        let mut weights = vec![0.0; num_filters * num_bins];
        let mut edges = Vec::with_capacity(num_filters);
        let mut supports = Vec::with_capacity(num_filters);

        for m in 0..num_filters {
            let tri = TriangleEdges {
                left: anchors[m],
                center: anchors[m + 1],
                right: anchors[m + 2],
            };

            let row = &mut weights[m * num_bins..(m + 1) * num_bins];
            for (k, w) in row.iter_mut().enumerate() {
                *w = tri.weight(k as f64 * bin_hz);
            }

            let first = row.iter().position(|&w| w > 0.0);
            let last = row.iter().rposition(|&w| w > 0.0);
            match (first, last) {
                (Some(first), Some(last)) => supports.push(first..=last),
                _ => {
                    return Err(FeatureError::EmptyFilter {
                        index: m,
                        left: tri.left,
                        right: tri.right,
                    })
                }
            }

            debug!(
                "Mel filter {}: {:.1} / {:.1} / {:.1} Hz, bins {:?}",
                m, tri.left, tri.center, tri.right, supports[m]
            );
            edges.push(tri);
        }

        info!(
            "Mel filterbank built: {} filters over {} bins ({} Hz, N={})",
            num_filters, num_bins, sample_rate, transform_size
        );

        Ok(Self {
            sample_rate,
            transform_size,
            num_bins,
            weights,
            edges,
            supports,
        })
    }

    /// Number of filters (feature dimension)
    pub fn num_filters(&self) -> usize {
        self.edges.len()
    }

    /// Number of frequency bins per row (`N/2 + 1`)
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    /// Sample rate the bank was designed for
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Transform size the bank was designed for
    pub fn transform_size(&self) -> usize {
        self.transform_size
    }

    /// Frequency of bin `k` in Hz
    pub fn bin_frequency(&self, k: usize) -> f64 {
        k as f64 * self.sample_rate / self.transform_size as f64
    }

    /// Weights of filter `m` over all bins
    pub fn weights(&self, m: usize) -> &[f64] {
        &self.weights[m * self.num_bins..(m + 1) * self.num_bins]
    }

    /// Corner frequencies of filter `m`
    pub fn edges(&self, m: usize) -> TriangleEdges {
        self.edges[m]
    }

    /// Bins of filter `m` holding non-zero weight
    pub fn support(&self, m: usize) -> RangeInclusive<usize> {
        self.supports[m].clone()
    }
}
