//! Scheduler Error Types

use adc_source::SourceError;
use feature_engine::FeatureError;
use thiserror::Error;

/// Errors that end an acquisition session
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Scheduler settings are inconsistent
    #[error("Invalid scheduler configuration: {0}")]
    InvalidConfig(String),

    /// Feature pipeline could not be built
    #[error("Feature pipeline configuration: {0}")]
    Feature(#[from] FeatureError),

    /// Device stopped producing samples
    #[error("ADC device fault: {consecutive} consecutive sample timeouts")]
    DeviceFault { consecutive: u32 },

    /// Non-recoverable source failure
    #[error("ADC source failed: {0}")]
    Source(#[from] SourceError),

    /// Downstream consumer rejected a record
    #[error("Feature emission failed: {0}")]
    Sink(#[from] SinkError),
}

/// Errors raised by a feature sink
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing the record failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Consumer has gone away
    #[error("Feature consumer closed")]
    Closed,
}

impl From<std::io::Error> for SinkError {
    fn from(err: std::io::Error) -> Self {
        SinkError::Io(err.to_string())
    }
}
