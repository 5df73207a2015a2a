//! Sample Source Error Types

use thiserror::Error;

/// Errors that can occur while reading a sample from the ADC
#[derive(Debug, Error)]
pub enum SourceError {
    /// No sample arrived within the bounded wait
    #[error("Timeout waiting for ADC sample after {0}us")]
    Timeout(u64),

    /// The device side of the source has gone away
    #[error("ADC source disconnected")]
    Disconnected,

    /// Underlying I/O failure
    #[error("ADC I/O error: {0}")]
    Io(String),

    /// Requested channel does not exist in the stream layout
    #[error("Channel {channel} out of range for {channels}-channel stream")]
    InvalidChannel { channel: u8, channels: u8 },
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::Io(err.to_string())
    }
}
