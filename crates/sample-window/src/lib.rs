//! Sliding Sample Window
//!
//! Keeps the most recent `capacity` samples of a stream so that successive
//! analysis frames can overlap: each cycle pushes one hop of new samples and
//! copies out the full window.

mod window;

pub use window::SampleWindow;
