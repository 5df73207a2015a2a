//! Mel Feature Pipeline
//!
//! Wires an ADC sample source, the acquisition scheduler and a line-oriented
//! feature sink into one acquisition session, and owns process-level
//! concerns: configuration loading, logging setup and shutdown.

mod config;
mod error;

pub use config::{
    load_config, load_config_from, AppConfig, LoggingConfig, SourceConfig, SourceKind,
    DEFAULT_CONFIG_PATH, ENV_PREFIX,
};
pub use error::PipelineError;

use acquisition_scheduler::{AcquisitionScheduler, FeatureSink, LineSink, SessionStats};
use adc_source::{SampleSource, StreamSource, SyntheticSource};
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Initialize logging.
///
/// Logs go to standard error: standard output carries the feature records.
pub fn init_logging(config: &LoggingConfig) -> Result<(), PipelineError> {
    let level = Level::from_str(&config.level)
        .map_err(|_| PipelineError::Logging(format!("unknown log level {:?}", config.level)))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    let result = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.map_err(|e| PipelineError::Logging(e.to_string()))
}

/// Open the configured sample source
pub fn build_source(
    config: &SourceConfig,
    sample_rate: f64,
) -> Result<Box<dyn SampleSource + Send>, PipelineError> {
    let format = config.format();
    info!(
        "Microphone on pin {} ({}-bit ADC, mid-scale {})",
        config.pin,
        format.bits,
        format.midscale()
    );

    let source: Box<dyn SampleSource + Send> = match config.kind {
        SourceKind::Synthetic => {
            Box::new(SyntheticSource::new(config.waveform, sample_rate, format))
        }
        SourceKind::Stream => match &config.path {
            Some(path) => Box::new(StreamSource::open(path, config.channels, config.channel, format)?),
            None => {
                info!("Reading ADC stream from standard input");
                Box::new(StreamSource::spawn(
                    std::io::stdin(),
                    config.channels,
                    config.channel,
                    format,
                    adc_source::DEFAULT_QUEUE_DEPTH,
                )?)
            }
        },
    };
    Ok(source)
}

/// Run a session writing `AI_INPUT:` records to standard output
pub fn run_session(config: AppConfig, stop: &AtomicBool) -> Result<SessionStats, PipelineError> {
    run_session_with(config, LineSink::stdout(), stop)
}

/// Run a session emitting into `sink` until `stop` is set
pub fn run_session_with<K: FeatureSink>(
    config: AppConfig,
    sink: K,
    stop: &AtomicBool,
) -> Result<SessionStats, PipelineError> {
    config.validate()?;
    let source = build_source(&config.source, config.feature.sample_rate)?;
    let mut scheduler = AcquisitionScheduler::new(&config.feature, config.scheduler, source, sink)?;
    Ok(scheduler.run(stop)?)
}
