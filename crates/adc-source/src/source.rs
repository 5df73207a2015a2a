//! Sample Source Capability

use crate::error::SourceError;
use crate::AdcFormat;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// A single-sample read capability over an ADC channel.
///
/// Implementations must return within `timeout`, either with a raw code in
/// `[0, format.full_scale()]` or with [`SourceError::Timeout`].
pub trait SampleSource {
    /// Read one instantaneous sample
    fn read_sample(&mut self, timeout: Duration) -> Result<u16, SourceError>;

    /// Converter format of the returned codes
    fn format(&self) -> AdcFormat;
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn read_sample(&mut self, timeout: Duration) -> Result<u16, SourceError> {
        (**self).read_sample(timeout)
    }

    fn format(&self) -> AdcFormat {
        (**self).format()
    }
}

/// Signal produced by a [`SyntheticSource`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Waveform {
    /// Fixed raw code on every read
    Constant { code: u16 },
    /// Sinusoid centred on mid-scale, amplitude in ADC codes
    Tone { frequency_hz: f64, amplitude: f64 },
}

impl Default for Waveform {
    fn default() -> Self {
        Waveform::Tone {
            frequency_hz: 1000.0,
            amplitude: 1000.0,
        }
    }
}

/// Deterministic signal generator standing in for the microphone
pub struct SyntheticSource {
    waveform: Waveform,
    sample_rate: f64,
    format: AdcFormat,
    /// Index of the next generated sample
    position: u64,
}

impl SyntheticSource {
    /// Create a generator clocked at `sample_rate`
    pub fn new(waveform: Waveform, sample_rate: f64, format: AdcFormat) -> Self {
        info!("Creating synthetic ADC source: {:?} @ {} Hz", waveform, sample_rate);
        Self {
            waveform,
            sample_rate,
            format,
            position: 0,
        }
    }

    /// Generator that always reads mid-scale (silence)
    pub fn silence(format: AdcFormat) -> Self {
        Self::new(
            Waveform::Constant {
                code: format.midscale(),
            },
            1.0,
            format,
        )
    }

    /// Number of samples produced so far
    pub fn position(&self) -> u64 {
        self.position
    }

    fn generate(&self, n: u64) -> u16 {
        match self.waveform {
            Waveform::Constant { code } => code.min(self.format.full_scale()),
            Waveform::Tone {
                frequency_hz,
                amplitude,
            } => {
                let phase = 2.0 * std::f64::consts::PI * frequency_hz * n as f64 / self.sample_rate;
                let value = f64::from(self.format.midscale()) + amplitude * phase.sin();
                value.round().clamp(0.0, f64::from(self.format.full_scale())) as u16
            }
        }
    }
}

impl SampleSource for SyntheticSource {
    fn read_sample(&mut self, _timeout: Duration) -> Result<u16, SourceError> {
        let code = self.generate(self.position);
        self.position += 1;
        Ok(code)
    }

    fn format(&self) -> AdcFormat {
        self.format
    }
}
