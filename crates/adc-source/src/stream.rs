//! Byte-Stream Sample Source
//!
//! Decodes little-endian `u16` interleaved frames from any reader (a
//! recording, a pipe, or a character device) on a dedicated reader thread
//! and hands samples to the pipeline through a bounded channel, so every
//! read has a bounded wait.

use crate::error::SourceError;
use crate::source::SampleSource;
use crate::AdcFormat;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default number of samples buffered between reader thread and pipeline
pub const DEFAULT_QUEUE_DEPTH: usize = 4096;

/// Sample source fed from an interleaved byte stream.
///
/// A read failure on the device side is delivered in order after the
/// samples decoded before it; the channel disconnects afterwards.
pub struct StreamSource {
    rx: Receiver<Result<u16, SourceError>>,
    format: AdcFormat,
    _reader: JoinHandle<()>,
}

impl StreamSource {
    /// Open a file or device node and stream the selected channel from it
    pub fn open(
        path: impl AsRef<Path>,
        channels: u8,
        channel: u8,
        format: AdcFormat,
    ) -> Result<Self, SourceError> {
        let path = path.as_ref();
        info!("Opening ADC stream {} (channel {} of {})", path.display(), channel, channels);
        let file = File::open(path)?;
        Self::spawn(BufReader::new(file), channels, channel, format, DEFAULT_QUEUE_DEPTH)
    }

    /// Start a reader thread over `reader`
    pub fn spawn<R>(
        reader: R,
        channels: u8,
        channel: u8,
        format: AdcFormat,
        queue_depth: usize,
    ) -> Result<Self, SourceError>
    where
        R: Read + Send + 'static,
    {
        if channels == 0 || channel >= channels {
            return Err(SourceError::InvalidChannel { channel, channels });
        }

        let (tx, rx) = mpsc::sync_channel(queue_depth.max(1));
        let handle = thread::Builder::new()
            .name("adc-stream".to_string())
            .spawn(move || read_loop(reader, channels, channel, format, tx))?;

        Ok(Self {
            rx,
            format,
            _reader: handle,
        })
    }
}

fn read_loop<R: Read>(
    mut reader: R,
    channels: u8,
    channel: u8,
    format: AdcFormat,
    tx: SyncSender<Result<u16, SourceError>>,
) {
    let mut frame = vec![0u8; 2 * channels as usize];
    let offset = 2 * channel as usize;
    let full_scale = format.full_scale();
    let mut decoded: u64 = 0;

    loop {
        match reader.read_exact(&mut frame) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                debug!("ADC stream ended after {} samples", decoded);
                break;
            }
            Err(e) => {
                warn!("ADC stream read failed after {} samples: {}", decoded, e);
                // Receiver may already be gone; nothing left to report to
                let _ = tx.send(Err(e.into()));
                break;
            }
        }

        let raw = u16::from_le_bytes([frame[offset], frame[offset + 1]]);
        if tx.send(Ok(raw.min(full_scale))).is_err() {
            // Pipeline dropped the source
            break;
        }
        decoded += 1;
    }
}

impl SampleSource for StreamSource {
    fn read_sample(&mut self, timeout: Duration) -> Result<u16, SourceError> {
        match self.rx.recv_timeout(timeout) {
            Ok(sample) => sample,
            Err(RecvTimeoutError::Timeout) => Err(SourceError::Timeout(timeout.as_micros() as u64)),
            Err(RecvTimeoutError::Disconnected) => Err(SourceError::Disconnected),
        }
    }

    fn format(&self) -> AdcFormat {
        self.format
    }
}
