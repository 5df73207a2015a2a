//! Feature Engine Error Types

use thiserror::Error;

/// Configuration errors detected before the pipeline starts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Sample rate is zero, negative or not finite
    #[error("Invalid sample rate {0} Hz")]
    InvalidSampleRate(f64),

    /// Transform size is not a power of two >= 2
    #[error("Transform size {0} is not a power of two >= 2")]
    InvalidTransformSize(usize),

    /// Filterbank with no filters
    #[error("Filterbank needs at least one filter")]
    NoFilters,

    /// More filters than frequency bins
    #[error("{filters} mel filters exceed the {bins} available frequency bins")]
    TooManyFilters { filters: usize, bins: usize },

    /// A filter covers no frequency bin
    #[error("Mel filter {index} ({left:.1}-{right:.1} Hz) covers no frequency bin")]
    EmptyFilter { index: usize, left: f64, right: f64 },

    /// Filterbank was designed for a different frame geometry or rate
    #[error("Filterbank ({filters} filters, N={size}, {sample_rate} Hz) does not match the configured frame")]
    FilterbankMismatch {
        filters: usize,
        size: usize,
        sample_rate: f64,
    },

    /// Pre-emphasis coefficient outside (0, 1)
    #[error("Pre-emphasis coefficient {0} must be in (0, 1)")]
    InvalidPreEmphasis(f64),

    /// Log-compression guard must be strictly positive
    #[error("Log epsilon {0} must be finite and > 0")]
    InvalidEpsilon(f64),
}

/// Errors decoding a feature line
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WireError {
    /// Line does not start with the marker token
    #[error("Line does not start with {0:?}")]
    MissingMarker(&'static str),

    /// Last field is not followed by a comma
    #[error("Record is not comma-terminated")]
    Unterminated,

    /// Field is not a decimal number
    #[error("Field {index} is not a number: {field:?}")]
    InvalidField { index: usize, field: String },
}
