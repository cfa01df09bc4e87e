// src/config.rs
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::sweep::SweepError;
use crate::types::YRange;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelSpec {
    pub name: String,
    pub y_min: f64,
    pub y_max: f64,
}

impl ChannelSpec {
    pub fn new(name: impl Into<String>, y_min: f64, y_max: f64) -> Self {
        Self {
            name: name.into(),
            y_min,
            y_max,
        }
    }
    pub fn y_range(&self) -> YRange {
        YRange::new(self.y_min, self.y_max)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Length of the sweep axis in milliseconds.
    pub sweep_width: f64,
    /// How far the stale-data mask leads the draw head, as a fraction of the sweep width.
    pub overlay_margin: f64,
    pub sample_rate_hz: f64,
    /// Reject batches with non-finite or backwards samples instead of drawing them.
    pub validate_samples: bool,
    pub channels: Vec<ChannelSpec>,
    /// JSON array of values replayed by the simulator instead of the built-in beat.
    pub ecg_data_path: Option<PathBuf>,
    /// Amplitude of uniform noise added by the simulator.
    pub noise: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        let range = YRange::default();
        Self {
            sweep_width: 15_000.0,
            overlay_margin: 0.03,
            sample_rate_hz: 1000.0,
            validate_samples: true,
            channels: (1..=6)
                .map(|i| ChannelSpec::new(format!("ECG-{i}"), range.min, range.max))
                .collect(),
            ecg_data_path: None,
            noise: 0.0,
        }
    }
}

impl SweepConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: SweepConfig = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SweepError> {
        if !self.sweep_width.is_finite() || self.sweep_width <= 0.0 {
            return Err(SweepError::InvalidSweepWidth(self.sweep_width));
        }
        if !(0.0..=1.0).contains(&self.overlay_margin) {
            return Err(SweepError::InvalidMargin(self.overlay_margin));
        }
        if !self.sample_rate_hz.is_finite() || self.sample_rate_hz <= 0.0 {
            return Err(SweepError::InvalidSampleRate(self.sample_rate_hz));
        }
        // The simulator draws from -noise..noise, so the span must fit as well.
        if !(self.noise * 2.0).is_finite() {
            return Err(SweepError::InvalidNoise(self.noise));
        }
        if self.channels.is_empty() {
            return Err(SweepError::NoChannels);
        }
        Ok(())
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
