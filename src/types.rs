// src/types.rs
use serde::{Deserialize, Serialize};

/// One timestamped reading as delivered by acquisition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Monotonic time in milliseconds.
    pub timestamp: f64,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: f64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// A sample projected onto the sweep axis. Recomputed every batch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WrappedPoint {
    pub x: f64,
    pub y: f64,
}

impl WrappedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Static vertical range of a channel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct YRange {
    pub min: f64,
    pub max: f64,
}

impl YRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl Default for YRange {
    fn default() -> Self {
        Self {
            min: -2500.0,
            max: 2500.0,
        }
    }
}

/// Samples accumulated since the previous tick, one ordered run per channel.
#[derive(Clone, Debug, Default)]
pub struct SweepBatch {
    pub channels: Vec<Vec<Sample>>,
}

impl SweepBatch {
    pub fn new(channels: Vec<Vec<Sample>>) -> Self {
        Self { channels }
    }

    /// Streams the same samples into `channel_count` channels.
    pub fn broadcast(samples: Vec<Sample>, channel_count: usize) -> Self {
        Self {
            channels: vec![samples; channel_count],
        }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn total_samples(&self) -> usize {
        self.channels.iter().map(|c| c.len()).sum()
    }
}
