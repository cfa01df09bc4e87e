//! Sweeping ("oscilloscope-style") multi-channel ECG chart.
//!
//! New samples are drawn on a fixed-width time axis that wraps around instead
//! of scrolling. Each channel owns two traces: the one being drawn and the one
//! left over from the previous sweep, with a mask hiding stale pixels just
//! ahead of the draw head.
//!
//! - `sweep`: wrap mapping, sweep detection, per-channel state, dispatch
//! - `config`: JSON configuration
//! - `types`: samples and batches
pub mod config;
pub mod sweep;
pub mod types;
pub use config::{ChannelSpec, SweepConfig};
pub use types::{Sample, SweepBatch, WrappedPoint, YRange};
