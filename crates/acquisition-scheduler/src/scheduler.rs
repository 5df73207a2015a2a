//! Acquisition Scheduler Implementation

use crate::clock::{sample_deadline, wait_until};
use crate::config::{FrameMode, Pacing, SchedulerConfig, TimeoutPolicy};
use crate::error::SchedulerError;
use crate::sink::FeatureSink;
use adc_source::{AdcFormat, SampleSource, SourceError};
use feature_engine::{FeatureConfig, FeatureExtractor};
use metrics::counter;
use sample_window::SampleWindow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Result of one acquisition cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A feature vector was emitted
    Emitted { sequence: u64 },
    /// A sample timed out under [`TimeoutPolicy::AbortCycle`]
    Aborted { sample_index: usize },
}

/// Counters over the life of a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Cycles started
    pub cycles: u64,
    /// Feature vectors emitted
    pub emitted: u64,
    /// Cycles discarded after a timeout
    pub aborted: u64,
    /// Sample reads that timed out
    pub timeouts: u64,
    /// Samples read more than one period after their slot
    pub late_samples: u64,
}

/// Sample clock carried across sliding-mode cycles so consecutive hops
/// stay contiguous
#[derive(Debug, Clone, Copy)]
struct StreamClock {
    anchor: Instant,
    next_index: u64,
}

/// Periodic acquisition → feature extraction → emission loop
pub struct AcquisitionScheduler<S, K> {
    config: SchedulerConfig,
    sample_rate: f64,
    period: Duration,
    source: S,
    sink: K,
    format: AdcFormat,
    extractor: FeatureExtractor,
    /// Frame handed to the feature pipeline, reused across cycles
    frame: Vec<f64>,
    /// Samples read during the current cycle
    acquired: Vec<f64>,
    /// Overlap history, sliding mode only
    window: Option<SampleWindow>,
    hop_samples: usize,
    /// Running sample clock, sliding mode only
    clock: Option<StreamClock>,
    /// Last good re-centred sample
    last_sample: f64,
    consecutive_timeouts: u32,
    stats: SessionStats,
}

impl<S: SampleSource, K: FeatureSink> AcquisitionScheduler<S, K> {
    /// Validate both configurations and build the pipeline
    pub fn new(
        feature: &FeatureConfig,
        config: SchedulerConfig,
        source: S,
        sink: K,
    ) -> Result<Self, SchedulerError> {
        feature.validate()?;
        config.validate(feature)?;

        let format = source.format();
        if !format.is_valid() {
            return Err(SchedulerError::InvalidConfig(format!(
                "unsupported ADC resolution of {} bits",
                format.bits
            )));
        }

        let extractor = FeatureExtractor::new(feature)?;
        let frame_len = feature.transform_size;
        let window = match config.frame_mode {
            FrameMode::Block => None,
            FrameMode::Sliding => Some(SampleWindow::new(frame_len)),
        };
        let hop_samples = config.hop_samples(feature.sample_rate);

        info!(
            "Acquisition scheduler created: {} Hz, {} samples/frame, {:?} frames, hop {}ms",
            feature.sample_rate, frame_len, config.frame_mode, config.hop_length_ms
        );

        Ok(Self {
            config,
            sample_rate: feature.sample_rate,
            period: Duration::from_secs_f64(feature.sample_period_secs()),
            source,
            sink,
            format,
            extractor,
            frame: vec![0.0; frame_len],
            acquired: Vec::with_capacity(frame_len),
            window,
            hop_samples,
            clock: None,
            last_sample: 0.0,
            consecutive_timeouts: 0,
            stats: SessionStats::default(),
        })
    }

    /// Run one acquisition → processing → emission cycle
    pub fn run_cycle(&mut self) -> Result<CycleOutcome, SchedulerError> {
        self.stats.cycles += 1;
        counter!("mel_pipeline_cycles_total").increment(1);

        let count = match &self.window {
            Some(window) if window.is_full() => self.hop_samples,
            Some(window) => window.missing(),
            None => self.frame.len(),
        };

        let outcome = match self.acquire(count)? {
            Some(sample_index) => {
                self.stats.aborted += 1;
                counter!("mel_pipeline_aborted_cycles_total").increment(1);
                debug!("Cycle aborted at sample {}", sample_index);
                if let Some(window) = &mut self.window {
                    // Gap in the stream: rebuild the history from scratch
                    window.clear();
                    self.clock = None;
                }
                CycleOutcome::Aborted { sample_index }
            }
            None => {
                match &mut self.window {
                    Some(window) => {
                        window.extend_from_slice(&self.acquired);
                        window.copy_to(&mut self.frame);
                    }
                    None => self.frame.copy_from_slice(&self.acquired),
                }

                let features = self.extractor.extract(&mut self.frame);
                let sequence = features.sequence;
                self.sink.emit(features)?;
                self.stats.emitted += 1;
                CycleOutcome::Emitted { sequence }
            }
        };

        if self.config.frame_mode == FrameMode::Block && self.config.pacing == Pacing::RealTime {
            wait_until(Instant::now() + self.config.throttle(), self.config.spin_threshold());
        }

        Ok(outcome)
    }

    /// Run cycles until `stop` is observed at a cycle boundary
    pub fn run(&mut self, stop: &AtomicBool) -> Result<SessionStats, SchedulerError> {
        info!("Starting acquisition session");

        while !stop.load(Ordering::Relaxed) {
            if let Err(e) = self.run_cycle() {
                error!("Acquisition session failed after {} cycles: {}", self.stats.cycles, e);
                return Err(e);
            }
        }

        info!(
            "Acquisition session stopped: {} cycles, {} emitted, {} timeouts",
            self.stats.cycles, self.stats.emitted, self.stats.timeouts
        );
        Ok(self.stats.clone())
    }

    /// Read `count` samples into `self.acquired`.
    ///
    /// Returns the index of the sample that aborted the cycle, if any.
    fn acquire(&mut self, count: usize) -> Result<Option<usize>, SchedulerError> {
        let timeout = self.config.sample_timeout();
        let spin = self.config.spin_threshold();
        let period = self.period;
        // Sliding hops continue the previous cycle's sample grid; block
        // frames start a fresh grid
        let (start, first_index) = match (&self.window, self.clock) {
            (Some(_), Some(clock)) => (clock.anchor, clock.next_index),
            _ => (Instant::now(), 0),
        };
        self.acquired.clear();

        for i in 0..count {
            if self.config.pacing == Pacing::RealTime {
                let deadline = sample_deadline(start, first_index + i as u64, self.sample_rate);
                if Instant::now() > deadline + period {
                    self.stats.late_samples += 1;
                    counter!("mel_pipeline_late_samples_total").increment(1);
                }
                wait_until(deadline, spin);
            }

            match self.source.read_sample(timeout) {
                Ok(raw) => {
                    self.consecutive_timeouts = 0;
                    self.last_sample = self.format.center(raw);
                    self.acquired.push(self.last_sample);
                }
                Err(SourceError::Timeout(waited_us)) => {
                    self.stats.timeouts += 1;
                    self.consecutive_timeouts += 1;
                    counter!("mel_pipeline_sample_timeouts_total").increment(1);

                    if self.consecutive_timeouts >= self.config.max_consecutive_timeouts {
                        error!(
                            "ADC produced no data for {} consecutive reads",
                            self.consecutive_timeouts
                        );
                        return Err(SchedulerError::DeviceFault {
                            consecutive: self.consecutive_timeouts,
                        });
                    }
                    if self.consecutive_timeouts == 1 {
                        warn!("ADC read timed out after {}us (sample {})", waited_us, i);
                    }

                    match self.config.timeout_policy {
                        TimeoutPolicy::HoldLast => self.acquired.push(self.last_sample),
                        TimeoutPolicy::Zero => self.acquired.push(0.0),
                        TimeoutPolicy::AbortCycle => return Ok(Some(i)),
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        if self.window.is_some() {
            self.clock = Some(StreamClock {
                anchor: start,
                next_index: first_index + count as u64,
            });
        }
        Ok(None)
    }

    /// Clear pipeline state carried between frames
    pub fn reset(&mut self) {
        self.extractor.reset();
        if let Some(window) = &mut self.window {
            window.clear();
        }
        self.clock = None;
        self.last_sample = 0.0;
        self.consecutive_timeouts = 0;
    }

    /// Session counters so far
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Borrow the sample source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Borrow the feature sink
    pub fn sink(&self) -> &K {
        &self.sink
    }
}
