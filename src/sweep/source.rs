use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::SweepConfig;
use crate::sweep::SweepError;
use crate::types::{Sample, SweepBatch};

/// Something that can yield the samples accumulated since the last tick.
pub trait SampleSource {
    fn next_batch(&mut self) -> Result<Option<SweepBatch>, SweepError>;
}

/// In-memory source useful for tests and deterministic playback.
pub struct ManualSource {
    queue: VecDeque<SweepBatch>,
}

impl ManualSource {
    pub fn new(batches: impl IntoIterator<Item = SweepBatch>) -> Self {
        Self {
            queue: batches.into_iter().collect(),
        }
    }
}

impl SampleSource for ManualSource {
    fn next_batch(&mut self) -> Result<Option<SweepBatch>, SweepError> {
        Ok(self.queue.pop_front())
    }
}

/// Streams an ECG trace at a stable data rate, the same trace into every channel.
pub struct EcgSimulator {
    sample_rate_hz: f64,
    channel_count: usize,
    template: Vec<f64>,
    noise: f64,
    rng: StdRng,
    pushed: u64,
    started_at: Instant,
}

impl EcgSimulator {
    pub fn new(config: &SweepConfig, template: Vec<f64>) -> Result<Self, SweepError> {
        config.validate()?;
        let template = if template.is_empty() {
            synthetic_beat(config.sample_rate_hz)
        } else {
            template
        };
        Ok(Self {
            sample_rate_hz: config.sample_rate_hz,
            channel_count: config.channel_count(),
            template,
            noise: config.noise.abs(),
            rng: StdRng::seed_from_u64(0x5eed),
            pushed: 0,
            started_at: Instant::now(),
        })
    }

    pub fn pushed(&self) -> u64 {
        self.pushed
    }

    /// Everything due `elapsed` after start that has not been emitted yet.
    pub fn poll(&mut self, elapsed: Duration) -> Option<SweepBatch> {
        let due = (self.sample_rate_hz * elapsed.as_secs_f64()).floor() as u64;
        if due <= self.pushed {
            return None;
        }
        let step_ms = 1000.0 / self.sample_rate_hz;
        let samples: Vec<Sample> = (self.pushed..due)
            .map(|i| {
                let mut value = self.template[(i % self.template.len() as u64) as usize];
                if self.noise > 0.0 {
                    value += self.rng.gen_range(-self.noise..self.noise);
                }
                Sample::new(i as f64 * step_ms, value)
            })
            .collect();
        self.pushed = due;
        Some(SweepBatch::broadcast(samples, self.channel_count))
    }
}

impl SampleSource for EcgSimulator {
    fn next_batch(&mut self) -> Result<Option<SweepBatch>, SweepError> {
        let elapsed = self.started_at.elapsed();
        Ok(self.poll(elapsed))
    }
}

/// One second of a synthetic PQRST complex, sampled at `sample_rate_hz`.
pub fn synthetic_beat(sample_rate_hz: f64) -> Vec<f64> {
    // (center s, amplitude, width s)
    const WAVES: [(f64, f64, f64); 5] = [
        (0.20, 150.0, 0.025),
        (0.37, -150.0, 0.010),
        (0.40, 1800.0, 0.012),
        (0.43, -400.0, 0.010),
        (0.65, 350.0, 0.040),
    ];
    let len = sample_rate_hz.round().max(1.0) as usize;
    (0..len)
        .map(|i| {
            let t = i as f64 / sample_rate_hz;
            WAVES
                .iter()
                .map(|&(c, a, w)| a * (-((t - c) / w).powi(2) / 2.0).exp())
                .sum()
        })
        .collect()
}

/// Reads a JSON array of samples such as a recorded lead.
pub fn load_ecg_template(path: &Path) -> anyhow::Result<Vec<f64>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read ECG data {}", path.display()))?;
    let values: Vec<f64> = serde_json::from_str(&text)
        .with_context(|| format!("ECG data {} is not a JSON array of numbers", path.display()))?;
    if values.is_empty() {
        bail!("ECG data {} is empty", path.display());
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    fn config(channels: usize) -> SweepConfig {
        let mut config = SweepConfig::default();
        config.channels.truncate(channels);
        config
    }
    #[test]
    fn manual_source_drains_in_order() {
        let mut source = ManualSource::new(vec![
            SweepBatch::new(vec![vec![Sample::new(1.0, 0.0)]]),
            SweepBatch::new(vec![vec![Sample::new(2.0, 0.0)]]),
        ]);
        assert_eq!(source.next_batch().unwrap().unwrap().channels[0][0].timestamp, 1.0);
        assert_eq!(source.next_batch().unwrap().unwrap().channels[0][0].timestamp, 2.0);
        assert!(source.next_batch().unwrap().is_none());
    }
    #[test]
    fn simulator_emits_due_samples_once() {
        let mut sim = EcgSimulator::new(&config(2), vec![1.0, 2.0, 3.0]).unwrap();
        assert!(sim.poll(Duration::from_micros(500)).is_none());
        let batch = sim.poll(Duration::from_millis(5)).unwrap();
        assert_eq!(batch.num_channels(), 2);
        let ts: Vec<f64> = batch.channels[0].iter().map(|s| s.timestamp).collect();
        assert_eq!(ts, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        let values: Vec<f64> = batch.channels[1].iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 1.0, 2.0]);
        assert!(sim.poll(Duration::from_millis(5)).is_none());
        let next = sim.poll(Duration::from_millis(7)).unwrap();
        assert_eq!(next.channels[0][0].timestamp, 5.0);
        assert_eq!(sim.pushed(), 7);
    }
    #[test]
    fn simulator_noise_stays_bounded() {
        let mut cfg = config(1);
        cfg.noise = 5.0;
        let mut sim = EcgSimulator::new(&cfg, vec![100.0]).unwrap();
        let batch = sim.poll(Duration::from_millis(200)).unwrap();
        assert!(batch.channels[0].iter().all(|s| (s.value - 100.0).abs() <= 5.0));
    }
    #[test]
    fn simulator_rejects_bad_rate() {
        let mut cfg = config(1);
        cfg.sample_rate_hz = 0.0;
        assert!(matches!(
            EcgSimulator::new(&cfg, Vec::new()),
            Err(SweepError::InvalidSampleRate(_))
        ));
    }
    #[test]
    fn simulator_rejects_unbounded_noise() {
        let mut cfg = config(1);
        cfg.noise = 1e308;
        assert!(matches!(
            EcgSimulator::new(&cfg, Vec::new()),
            Err(SweepError::InvalidNoise(_))
        ));
    }
    #[test]
    fn synthetic_beat_peaks_at_r_wave() {
        let beat = synthetic_beat(1000.0);
        assert_eq!(beat.len(), 1000);
        let (peak_idx, peak) = beat
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc });
        assert_eq!(peak_idx, 400);
        assert!(peak > 1500.0 && peak < 2500.0);
    }
}
