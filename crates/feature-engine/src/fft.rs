//! FFT-based Magnitude Spectrum

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;
use tracing::debug;

/// Symmetric Hamming window of length `n`
pub fn hamming_window(n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![1.0; n];
    }
    let denom = (n - 1) as f64;
    (0..n)
        .map(|i| 0.54 - 0.46 * (2.0 * std::f64::consts::PI * i as f64 / denom).cos())
        .collect()
}

/// Windowed forward FFT producing the non-negative half magnitude spectrum
pub struct SpectralTransform {
    /// Transform size
    size: usize,
    /// Forward plan, created once
    fft: Arc<dyn Fft<f64>>,
    /// Precomputed Hamming coefficients
    window: Vec<f64>,
    /// Complex companion buffer
    buffer: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl SpectralTransform {
    /// Plan a transform of `size` points (power of two)
    pub fn new(size: usize) -> Self {
        assert!(
            size >= 2 && size.is_power_of_two(),
            "Transform size must be a power of two >= 2"
        );

        let fft = FftPlanner::new().plan_fft_forward(size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        debug!("Planned {}-point forward FFT", size);

        Self {
            size,
            fft,
            window: hamming_window(size),
            buffer: vec![Complex::new(0.0, 0.0); size],
            scratch,
        }
    }

    /// Transform size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of magnitude bins produced (`N/2 + 1`)
    pub fn num_bins(&self) -> usize {
        self.size / 2 + 1
    }

    /// Window `frame`, transform it and write magnitudes into its first
    /// `N/2 + 1` slots. Returns that prefix.
    ///
    /// Panics if `frame.len()` differs from the planned size.
    pub fn transform<'a>(&mut self, frame: &'a mut [f64]) -> &'a [f64] {
        assert_eq!(frame.len(), self.size, "Frame length does not match transform size");

        for ((slot, sample), w) in self.buffer.iter_mut().zip(frame.iter_mut()).zip(&self.window) {
            *sample *= w;
            *slot = Complex::new(*sample, 0.0);
        }

        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        let bins = self.num_bins();
        for (magnitude, c) in frame[..bins].iter_mut().zip(&self.buffer) {
            *magnitude = c.norm();
        }
        &frame[..bins]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak_bin(magnitudes: &[f64]) -> usize {
        magnitudes
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |acc, (k, &m)| if m > acc.1 { (k, m) } else { acc })
            .0
    }

    #[test]
    fn test_hamming_window() {
        let window = hamming_window(256);
        assert!((window[0] - 0.08).abs() < 1e-12);
        assert!((window[255] - 0.08).abs() < 1e-12);
        assert!(window.iter().all(|&w| (0.08 - 1e-12..=1.0).contains(&w)));
        assert_eq!(hamming_window(1), vec![1.0]);
        assert!(hamming_window(0).is_empty());
    }

    #[test]
    fn test_zero_frame() {
        let mut transform = SpectralTransform::new(256);
        let mut frame = vec![0.0; 256];
        let magnitudes = transform.transform(&mut frame);
        assert_eq!(magnitudes.len(), 129);
        assert!(magnitudes.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_fft_sine_wave() {
        let mut transform = SpectralTransform::new(256);

        // Bin 16 at 16 kHz = 1000 Hz
        let mut frame: Vec<f64> = (0..256)
            .map(|i| 1000.0 * (2.0 * std::f64::consts::PI * 16.0 * i as f64 / 256.0).sin())
            .collect();

        let magnitudes = transform.transform(&mut frame).to_vec();
        assert_eq!(peak_bin(&magnitudes), 16);

        // Away from the Hamming main lobe the spectrum is far below the peak
        let peak = magnitudes[16];
        for (k, &m) in magnitudes.iter().enumerate() {
            if (k as i64 - 16).abs() > 2 {
                assert!(m < peak * 0.02, "bin {} magnitude {} vs peak {}", k, m, peak);
            }
        }
    }

    #[test]
    fn test_reused_across_calls() {
        let mut transform = SpectralTransform::new(64);
        let tone = |bin: f64| -> Vec<f64> {
            (0..64)
                .map(|i| (2.0 * std::f64::consts::PI * bin * i as f64 / 64.0).cos())
                .collect()
        };

        let mut first = tone(5.0);
        assert_eq!(peak_bin(transform.transform(&mut first)), 5);
        let mut second = tone(20.0);
        assert_eq!(peak_bin(transform.transform(&mut second)), 20);
    }

    #[test]
    #[should_panic(expected = "Frame length")]
    fn test_wrong_frame_length() {
        let mut transform = SpectralTransform::new(256);
        let mut frame = vec![0.0; 128];
        transform.transform(&mut frame);
    }
}
