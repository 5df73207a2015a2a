//! Monotonic pacing helpers

use std::time::{Duration, Instant};

/// Deadline of sample `index` relative to the anchor.
///
/// Computed from the anchor every time so rounding never accumulates
/// across the frame.
pub fn sample_deadline(start: Instant, index: u64, sample_rate: f64) -> Instant {
    start + Duration::from_secs_f64(index as f64 / sample_rate)
}

/// Block until `deadline`: sleep while far away, spin for the last
/// `spin_threshold`.
pub fn wait_until(deadline: Instant, spin_threshold: Duration) {
    loop {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        let remaining = deadline - now;
        if remaining > spin_threshold {
            std::thread::sleep(remaining - spin_threshold);
        } else {
            std::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadlines_do_not_drift() {
        let start = Instant::now();
        // 16 kHz period is 62.5us; truncating to 62us would lose 128us per frame
        assert_eq!(sample_deadline(start, 256, 16000.0) - start, Duration::from_millis(16));
        assert_eq!(sample_deadline(start, 0, 16000.0), start);
    }

    #[test]
    fn test_wait_until_reaches_deadline() {
        let deadline = Instant::now() + Duration::from_millis(3);
        wait_until(deadline, Duration::from_micros(500));
        assert!(Instant::now() >= deadline);
    }

    #[test]
    fn test_past_deadline_returns_immediately() {
        let deadline = Instant::now();
        std::thread::sleep(Duration::from_millis(1));
        let before = Instant::now();
        wait_until(deadline, Duration::from_micros(200));
        assert!(before.elapsed() < Duration::from_millis(50));
    }
}
