//! Scheduler configuration

use crate::error::SchedulerError;
use feature_engine::FeatureConfig;
use serde::{Deserialize, Serialize};
use signal_conditioner::CarryScope;
use std::time::Duration;

/// How successive analysis frames relate to each other
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameMode {
    /// Acquire a whole new frame every cycle, then wait `frame - hop`
    #[default]
    Block,
    /// Acquire one hop per cycle and analyse the most recent frame
    Sliding,
}

/// What to store when a sample read times out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPolicy {
    /// Repeat the previous sample
    #[default]
    HoldLast,
    /// Store a zero (mid-scale) sample
    Zero,
    /// Discard the cycle and start the next one
    AbortCycle,
}

/// Timing discipline of the acquisition loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pacing {
    /// Sample slots anchored to the cycle start, sleep/spin hybrid waits
    #[default]
    RealTime,
    /// Read as fast as the source delivers (recordings, tests)
    Unpaced,
}

/// Configuration for the acquisition scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Analysis frame length in milliseconds (default: 25)
    pub frame_length_ms: u64,
    /// Hop between frame starts in milliseconds (default: 10)
    pub hop_length_ms: u64,
    /// Frame overlap model
    pub frame_mode: FrameMode,
    /// Bounded wait for one sample in microseconds
    pub sample_timeout_us: u64,
    /// Substitution policy for timed-out reads
    pub timeout_policy: TimeoutPolicy,
    /// Consecutive timeouts before the device is declared faulty
    pub max_consecutive_timeouts: u32,
    /// Timing discipline
    pub pacing: Pacing,
    /// Remaining time below which waits spin instead of sleeping
    pub spin_threshold_us: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            frame_length_ms: 25,
            hop_length_ms: 10,
            frame_mode: FrameMode::Block,
            sample_timeout_us: 1000,
            timeout_policy: TimeoutPolicy::HoldLast,
            max_consecutive_timeouts: 256,
            pacing: Pacing::RealTime,
            spin_threshold_us: 200,
        }
    }
}

impl SchedulerConfig {
    /// Create config for replaying recordings as fast as possible
    pub fn unpaced() -> Self {
        Self {
            pacing: Pacing::Unpaced,
            ..Default::default()
        }
    }

    /// Wait inserted after each emission in block mode
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.frame_length_ms.saturating_sub(self.hop_length_ms))
    }

    /// Bounded wait per sample
    pub fn sample_timeout(&self) -> Duration {
        Duration::from_micros(self.sample_timeout_us)
    }

    /// Spin threshold of the pacing clock
    pub fn spin_threshold(&self) -> Duration {
        Duration::from_micros(self.spin_threshold_us)
    }

    /// New samples acquired per cycle in sliding mode
    pub fn hop_samples(&self, sample_rate: f64) -> usize {
        (self.hop_length_ms as f64 * sample_rate / 1000.0).round() as usize
    }

    /// Check consistency with the feature pipeline settings
    pub fn validate(&self, feature: &FeatureConfig) -> Result<(), SchedulerError> {
        if self.hop_length_ms == 0 {
            return Err(SchedulerError::InvalidConfig("hop length must be > 0".into()));
        }
        if self.frame_length_ms < self.hop_length_ms {
            return Err(SchedulerError::InvalidConfig(format!(
                "frame length {}ms is shorter than hop {}ms",
                self.frame_length_ms, self.hop_length_ms
            )));
        }
        if self.sample_timeout_us == 0 {
            return Err(SchedulerError::InvalidConfig("sample timeout must be > 0".into()));
        }
        if self.max_consecutive_timeouts == 0 {
            return Err(SchedulerError::InvalidConfig(
                "max consecutive timeouts must be > 0".into(),
            ));
        }

        if self.frame_mode == FrameMode::Sliding {
            let hop = self.hop_samples(feature.sample_rate);
            if hop == 0 || hop > feature.transform_size {
                return Err(SchedulerError::InvalidConfig(format!(
                    "hop of {} samples must be within 1..={} in sliding mode",
                    hop, feature.transform_size
                )));
            }
            if feature.carry_scope == CarryScope::Session {
                return Err(SchedulerError::InvalidConfig(
                    "sliding frames re-filter overlapping samples; use frame carry scope".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing() {
        let config = SchedulerConfig::default();
        assert_eq!(config.throttle(), Duration::from_millis(15));
        assert_eq!(config.hop_samples(16000.0), 160);
        assert!(config.validate(&FeatureConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_hop_longer_than_frame() {
        let config = SchedulerConfig {
            frame_length_ms: 10,
            hop_length_ms: 25,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(&FeatureConfig::default()),
            Err(SchedulerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_zero_bounds() {
        let feature = FeatureConfig::default();
        for config in [
            SchedulerConfig {
                hop_length_ms: 0,
                ..Default::default()
            },
            SchedulerConfig {
                sample_timeout_us: 0,
                ..Default::default()
            },
            SchedulerConfig {
                max_consecutive_timeouts: 0,
                ..Default::default()
            },
        ] {
            assert!(config.validate(&feature).is_err());
        }
    }

    #[test]
    fn test_sliding_requires_frame_carry() {
        let config = SchedulerConfig {
            frame_mode: FrameMode::Sliding,
            ..Default::default()
        };
        assert!(config.validate(&FeatureConfig::default()).is_err());

        let feature = FeatureConfig {
            carry_scope: CarryScope::Frame,
            ..Default::default()
        };
        assert!(config.validate(&feature).is_ok());
    }

    #[test]
    fn test_sliding_hop_must_fit_frame() {
        let config = SchedulerConfig {
            frame_mode: FrameMode::Sliding,
            frame_length_ms: 40,
            hop_length_ms: 20,
            ..Default::default()
        };
        let feature = FeatureConfig {
            carry_scope: CarryScope::Frame,
            ..Default::default()
        };
        // 20ms at 16 kHz is 320 samples, more than a 256-sample frame
        assert!(config.validate(&feature).is_err());
    }
}
