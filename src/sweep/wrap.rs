use crate::types::{Sample, WrappedPoint};

/// Position of `timestamp` on a sweep axis of length `sweep_width`.
///
/// Uses the Euclidean remainder, so negative timestamps also land in
/// `[0, sweep_width)`.
pub fn wrap(timestamp: f64, sweep_width: f64) -> f64 {
    let x = timestamp.rem_euclid(sweep_width);
    // rem_euclid can round up to exactly `sweep_width` for tiny negative inputs.
    if x >= sweep_width {
        0.0
    } else {
        x
    }
}

pub fn wrap_samples(samples: &[Sample], sweep_width: f64) -> Vec<WrappedPoint> {
    samples
        .iter()
        .map(|s| WrappedPoint::new(wrap(s.timestamp, sweep_width), s.value))
        .collect()
}
