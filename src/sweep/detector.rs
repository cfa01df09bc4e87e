use crate::types::WrappedPoint;

/// What a channel has to do with its batch this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepSignal {
    /// No wrap inside the batch.
    Append,
    /// Exactly one wrap; points before `split` finish the current sweep.
    Swap { split: usize },
    /// More than one wrap; the batch cannot be drawn incrementally.
    Reset { sweeps: usize },
}

/// Number of times the batch falls behind the cursor after having been at or
/// ahead of it. Each such edge is one completed sweep.
pub fn count_sweeps(points: &[WrappedPoint], prev_pos_x: f64) -> usize {
    let mut sweeps = 0;
    let mut behind_prev = false;
    for p in points {
        let behind = p.x < prev_pos_x;
        if behind && !behind_prev {
            sweeps += 1;
        }
        behind_prev = behind;
    }
    sweeps
}

/// First index at or behind the cursor.
pub fn split_index(points: &[WrappedPoint], prev_pos_x: f64) -> Option<usize> {
    points.iter().position(|p| p.x <= prev_pos_x)
}

pub fn detect(points: &[WrappedPoint], prev_pos_x: f64) -> SweepSignal {
    match count_sweeps(points, prev_pos_x) {
        0 => SweepSignal::Append,
        1 => match split_index(points, prev_pos_x) {
            Some(split) => SweepSignal::Swap { split },
            // A counted edge implies a point strictly behind the cursor.
            None => SweepSignal::Append,
        },
        sweeps => SweepSignal::Reset { sweeps },
    }
}
