//! Feature Engineering Engine
//!
//! Turns a conditioned audio frame into a log-mel feature vector:
//! Hamming-windowed FFT magnitudes projected onto a triangular mel
//! filterbank and log-compressed.

mod config;
mod error;
mod features;
mod fft;
mod filterbank;
pub mod wire;

pub use config::FeatureConfig;
pub use error::{FeatureError, WireError};
pub use features::{FeatureExtractor, FeatureReducer, FeatureVector, DEFAULT_EPSILON};
pub use fft::{hamming_window, SpectralTransform};
pub use filterbank::{hz_to_mel, mel_to_hz, MelFilterbank, TriangleEdges};
