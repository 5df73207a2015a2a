//! Application configuration
//!
//! Layered with the `config` crate: serde defaults, then an optional TOML
//! file, then `MEL_PIPELINE__SECTION__KEY` environment variables.

use crate::error::PipelineError;
use acquisition_scheduler::SchedulerConfig;
use adc_source::{AdcFormat, Waveform};
use config::{Config, Environment, File, FileFormat, Map};
use feature_engine::FeatureConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Config file read when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "mel-pipeline.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "MEL_PIPELINE";

/// Where samples come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Generated signal, no hardware
    #[default]
    Synthetic,
    /// Little-endian u16 stream from a file, pipe or device (stdin if no path)
    Stream,
}

/// Sample source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Source type
    pub kind: SourceKind,
    /// Microphone input pin on the acquisition board
    pub pin: u8,
    /// ADC resolution in bits
    pub adc_bits: u8,
    /// Interleaved channels in a stream
    pub channels: u8,
    /// Channel carrying the microphone in a stream
    pub channel: u8,
    /// Stream path; standard input when absent
    pub path: Option<PathBuf>,
    /// Generated signal for the synthetic source
    pub waveform: Waveform,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Synthetic,
            pin: 4,
            adc_bits: 12,
            channels: 1,
            channel: 0,
            path: None,
            waveform: Waveform::default(),
        }
    }
}

impl SourceConfig {
    /// Converter format of this source
    pub fn format(&self) -> AdcFormat {
        AdcFormat::new(self.adc_bits)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Maximum level (trace, debug, info, warn, error)
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Full application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Feature extraction parameters
    pub feature: FeatureConfig,
    /// Acquisition timing
    pub scheduler: SchedulerConfig,
    /// Sample source
    pub source: SourceConfig,
    /// Logging
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Check every section and their consistency
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.feature.validate()?;
        self.scheduler
            .validate(&self.feature)
            .map_err(|e| PipelineError::Invalid(e.to_string()))?;

        if !self.source.format().is_valid() {
            return Err(PipelineError::Invalid(format!(
                "ADC resolution of {} bits is not supported",
                self.source.adc_bits
            )));
        }
        if self.source.channels == 0 || self.source.channel >= self.source.channels {
            return Err(PipelineError::Invalid(format!(
                "stream channel {} out of range for {} channels",
                self.source.channel, self.source.channels
            )));
        }
        Ok(())
    }
}

/// Load configuration from `path` (optional file) and the process environment
pub fn load_config(path: &str) -> Result<AppConfig, PipelineError> {
    let settings = Config::builder()
        .add_source(File::with_name(path).format(FileFormat::Toml).required(false))
        .add_source(environment())
        .build()?;
    finish(settings)
}

/// Load configuration from TOML text and an explicit environment map
pub fn load_config_from(
    toml: &str,
    env: Map<String, String>,
) -> Result<AppConfig, PipelineError> {
    let settings = Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .add_source(environment().source(Some(env)))
        .build()?;
    finish(settings)
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn finish(settings: Config) -> Result<AppConfig, PipelineError> {
    let config: AppConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
