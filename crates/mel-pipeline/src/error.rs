//! Pipeline Error Types

use acquisition_scheduler::SchedulerError;
use adc_source::SourceError;
use feature_engine::FeatureError;
use thiserror::Error;

/// Errors that prevent the pipeline from starting or end it
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Feature pipeline parameters rejected
    #[error(transparent)]
    Feature(#[from] FeatureError),

    /// ADC source could not be opened
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Acquisition session failed
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    /// Logging could not be initialised
    #[error("Logging setup failed: {0}")]
    Logging(String),
}
