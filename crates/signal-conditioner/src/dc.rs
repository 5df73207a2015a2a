//! DC Offset Removal

/// Subtract the arithmetic mean of `frame` from every sample.
///
/// An empty frame is left untouched.
pub fn remove_dc(frame: &mut [f64]) -> f64 {
    if frame.is_empty() {
        return 0.0;
    }

    let mean = frame.iter().sum::<f64>() / frame.len() as f64;
    for sample in frame.iter_mut() {
        *sample -= mean;
    }
    mean
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_removes_offset() {
        let mut frame = vec![11.0, 9.0, 12.0, 8.0];
        let mean = remove_dc(&mut frame);
        assert!((mean - 10.0).abs() < 1e-12);
        assert_eq!(frame, vec![1.0, -1.0, 2.0, -2.0]);
    }

    #[test]
    fn test_empty_frame() {
        let mut frame: Vec<f64> = vec![];
        assert_eq!(remove_dc(&mut frame), 0.0);
    }

    proptest! {
        #[test]
        fn prop_zero_mean_after_removal(frame in prop::collection::vec(-2048.0f64..2048.0, 1..512)) {
            let mut frame = frame;
            remove_dc(&mut frame);
            let mean = frame.iter().sum::<f64>() / frame.len() as f64;
            prop_assert!(mean.abs() < 1e-9);
        }
    }
}
