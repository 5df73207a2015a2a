//! Output boundary for feature vectors

use crate::error::SinkError;
use feature_engine::wire;
use feature_engine::FeatureVector;
use std::io::{self, Stdout, Write};
use std::sync::mpsc;
use tracing::trace;

/// Consumer of emitted feature vectors. Ownership moves on every call.
pub trait FeatureSink {
    /// Hand one vector to the consumer
    fn emit(&mut self, features: FeatureVector) -> Result<(), SinkError>;
}

/// Writes `AI_INPUT:` records, one line per vector, flushing each line
pub struct LineSink<W: Write> {
    writer: W,
    lines_written: u64,
}

impl LineSink<Stdout> {
    /// Sink writing to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> LineSink<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            lines_written: 0,
        }
    }

    /// Records written so far
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FeatureSink for LineSink<W> {
    fn emit(&mut self, features: FeatureVector) -> Result<(), SinkError> {
        wire::write_line(&mut self.writer, &features.values)?;
        self.writer.flush()?;
        self.lines_written += 1;
        trace!("Emitted record {}", features.sequence);
        Ok(())
    }
}

/// Collects vectors in memory
impl FeatureSink for Vec<FeatureVector> {
    fn emit(&mut self, features: FeatureVector) -> Result<(), SinkError> {
        self.push(features);
        Ok(())
    }
}

/// Forwards vectors to another thread
impl FeatureSink for mpsc::Sender<FeatureVector> {
    fn emit(&mut self, features: FeatureVector) -> Result<(), SinkError> {
        self.send(features).map_err(|_| SinkError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_sink_framing() {
        let mut sink = LineSink::new(Vec::new());
        sink.emit(FeatureVector::new(vec![1.23, -4.56, 0.0], 0)).unwrap();
        sink.emit(FeatureVector::new(vec![0.5, 0.25, -0.0], 1)).unwrap();

        assert_eq!(sink.lines_written(), 2);
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "AI_INPUT:1.23,-4.56,0.00,\nAI_INPUT:0.50,0.25,0.00,\n");
    }

    #[test]
    fn test_channel_sink_reports_closed_consumer() {
        let (mut tx, rx) = mpsc::channel();
        tx.emit(FeatureVector::new(vec![1.0], 0)).unwrap();
        assert_eq!(rx.recv().unwrap().values, vec![1.0]);

        drop(rx);
        assert!(matches!(
            tx.emit(FeatureVector::new(vec![1.0], 1)),
            Err(SinkError::Closed)
        ));
    }

    #[test]
    fn test_broken_writer() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut sink = LineSink::new(Broken);
        assert!(matches!(
            sink.emit(FeatureVector::new(vec![1.0], 0)),
            Err(SinkError::Io(_))
        ));
        assert_eq!(sink.lines_written(), 0);
    }
}
