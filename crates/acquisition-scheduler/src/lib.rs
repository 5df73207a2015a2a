//! Acquisition Scheduler
//!
//! Drives fixed-interval sample collection from an ADC source, runs the
//! feature pipeline on every acquired frame and emits the resulting
//! feature vector, throttled to the configured hop.
//!
//! Everything runs on one control path: a cycle is acquisition, then
//! processing, then emission, and the next cycle cannot begin before the
//! previous one returns. The scheduler borrows itself mutably for each
//! cycle, so no two cycles can interleave.

mod clock;
mod config;
mod error;
mod scheduler;
mod sink;

pub use clock::{sample_deadline, wait_until};
pub use config::{FrameMode, Pacing, SchedulerConfig, TimeoutPolicy};
pub use error::{SchedulerError, SinkError};
pub use scheduler::{AcquisitionScheduler, CycleOutcome, SessionStats};
pub use sink::{FeatureSink, LineSink};
