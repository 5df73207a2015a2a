//! ADC Sample Sources
//!
//! This crate provides the input boundary of the feature pipeline: a
//! single-sample read capability over a microphone ADC. Hardware access is
//! abstracted behind [`SampleSource`] so that the pipeline can run against
//! synthetic signals or recorded byte streams.

mod error;
mod source;
mod stream;

pub use error::SourceError;
pub use source::{SampleSource, SyntheticSource, Waveform};
pub use stream::{StreamSource, DEFAULT_QUEUE_DEPTH};

use serde::{Deserialize, Serialize};

/// Default ADC resolution in bits
pub const DEFAULT_ADC_BITS: u8 = 12;

/// Resolution of the converter feeding a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdcFormat {
    /// Resolution in bits (1..=16)
    pub bits: u8,
}

impl Default for AdcFormat {
    fn default() -> Self {
        Self {
            bits: DEFAULT_ADC_BITS,
        }
    }
}

impl AdcFormat {
    /// Create a format with the given resolution
    pub fn new(bits: u8) -> Self {
        Self { bits }
    }

    /// Whether the resolution fits in a `u16` reading
    pub fn is_valid(&self) -> bool {
        (1..=16).contains(&self.bits)
    }

    /// Largest code the converter can produce
    pub fn full_scale(&self) -> u16 {
        ((1u32 << self.bits) - 1) as u16
    }

    /// Code corresponding to zero input (2048 for 12 bits)
    pub fn midscale(&self) -> u16 {
        1u16 << (self.bits - 1)
    }

    /// Re-centre a raw code around zero
    pub fn center(&self, raw: u16) -> f64 {
        f64::from(raw) - f64::from(self.midscale())
    }
}
