// src/main.rs
mod gui;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use eframe::egui;
use log::info;
use ecg_sweep::config::SweepConfig;
use ecg_sweep::sweep::{
    load_ecg_template, render_sweep_png, EcgSimulator, PlotStyle, SurfaceStore, SweepPipeline,
};
/// Frame rate used to slice simulated time in snapshot mode.
const SNAPSHOT_FPS: f64 = 60.0;
#[derive(Parser, Debug)]
#[command(name = "ecg-sweep", about = "Sweeping multi-channel ECG monitor")]
struct Cli {
    /// JSON configuration file; built-in defaults when omitted.
    config: Option<PathBuf>,
    /// Simulate headlessly and write a PNG of the chart instead of opening a window.
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,
    /// Seconds of data to simulate in snapshot mode.
    #[arg(long, default_value_t = 20.0)]
    seconds: f64,
}
fn load_config(path: Option<&Path>) -> Result<SweepConfig> {
    match path {
        Some(path) => SweepConfig::load(path),
        None => Ok(SweepConfig::default()),
    }
}
fn load_template(config: &SweepConfig) -> Result<Vec<f64>> {
    match &config.ecg_data_path {
        Some(path) => load_ecg_template(path),
        None => Ok(Vec::new()),
    }
}
fn run_snapshot(config: &SweepConfig, template: Vec<f64>, out: &Path, seconds: f64) -> Result<()> {
    if !seconds.is_finite() || seconds <= 0.0 {
        bail!("--seconds must be a positive number, got {seconds}");
    }
    let mut store = SurfaceStore::new();
    let simulator = EcgSimulator::new(config, template)?;
    let mut pipeline = SweepPipeline::new(simulator, config, &mut store)?;
    let frames = (seconds * SNAPSHOT_FPS).ceil() as u64;
    for frame in 1..=frames {
        let elapsed = Duration::from_secs_f64(frame as f64 / SNAPSHOT_FPS);
        if let Some(batch) = pipeline.source_mut().poll(elapsed) {
            pipeline.dispatcher_mut().process_batch(&batch, &mut store)?;
        }
    }
    let png = render_sweep_png(&store, pipeline.dispatcher(), PlotStyle::default())?;
    fs::write(out, png).with_context(|| format!("failed to write {}", out.display()))?;
    info!(
        "wrote {} ({} frames, cursor at {:.1} ms)",
        out.display(),
        frames,
        pipeline.dispatcher().cursor()
    );
    Ok(())
}
fn run_window(config: &SweepConfig, template: Vec<f64>) -> Result<()> {
    let mut store = SurfaceStore::new();
    let simulator = EcgSimulator::new(config, template)?;
    let pipeline = SweepPipeline::new(simulator, config, &mut store)?;
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1280.0, 900.0])
        .with_min_inner_size([640.0, 480.0])
        .with_title("ECG sweep");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "ecg-sweep",
        options,
        Box::new(move |_cc| Box::new(gui::SweepApp::new(pipeline, store))),
    )
    .map_err(|e| anyhow!("failed to run window: {e}"))
}
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let template = load_template(&config)?;
    info!(
        "{} channels, sweep {:.0} ms, {:.0} Hz",
        config.channel_count(),
        config.sweep_width,
        config.sample_rate_hz
    );
    match &cli.snapshot {
        Some(out) => run_snapshot(&config, template, out, cli.seconds),
        None => run_window(&config, template),
    }
}
