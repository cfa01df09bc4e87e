// src/gui.rs
use eframe::egui;
use egui::{Color32, Stroke};
use egui_plot::{Line, MarkerShape, Plot, PlotPoints, Points, Polygon};
use log::error;

use ecg_sweep::sweep::plot::layers;
use ecg_sweep::sweep::{
    DrawHandle, EcgSimulator, SurfaceRole, SurfaceStore, SweepError, SweepPipeline,
};

const TRACE_COLORS: [Color32; 6] = [
    Color32::from_rgb(0, 255, 128),
    Color32::from_rgb(0, 255, 255),
    Color32::from_rgb(255, 215, 0),
    Color32::from_rgb(255, 0, 255),
    Color32::from_rgb(255, 128, 64),
    Color32::from_rgb(128, 160, 255),
];
const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(255, 255, 255);

pub struct SweepApp {
    pipeline: SweepPipeline<EcgSimulator>,
    store: SurfaceStore,
    hovered: Vec<bool>,
    ticks: u64,
    last_error: Option<String>,
}

impl SweepApp {
    pub fn new(pipeline: SweepPipeline<EcgSimulator>, store: SurfaceStore) -> Self {
        let hovered = vec![false; pipeline.dispatcher().channel_count()];
        Self {
            pipeline,
            store,
            hovered,
            ticks: 0,
            last_error: None,
        }
    }

    fn tick(&mut self) {
        match self.pipeline.pump_once(&mut self.store) {
            Ok(Some(_)) => self.ticks += 1,
            Ok(None) => {}
            Err(e) => {
                error!("tick rejected: {e}");
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn set_hovered(&mut self, channel: usize, hovered: bool) -> Result<(), SweepError> {
        if self.hovered.get(channel).copied() == Some(hovered) {
            return Ok(());
        }
        if let Some(h) = self.hovered.get_mut(channel) {
            *h = hovered;
        }
        let value = if hovered { 1.0 } else { 0.0 };
        self.pipeline
            .dispatcher_mut()
            .request_highlight(channel, SurfaceRole::Incoming, value)
    }
}

impl eframe::App for SweepApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick();

        let mut visuals = egui::Visuals::dark();
        visuals.extreme_bg_color = Color32::BLACK;
        ctx.set_visuals(visuals);

        let mut hover_changes = Vec::new();
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            let dispatcher = self.pipeline.dispatcher();
            ui.horizontal(|ui| {
                ui.monospace(format!(
                    "cursor {:>8.1} / {:.0} ms   ticks {}",
                    dispatcher.cursor(),
                    dispatcher.sweep_width(),
                    self.ticks
                ));
                for ch in dispatcher.channels() {
                    let stats = ch.stats();
                    ui.separator();
                    ui.monospace(format!(
                        "{}: sweeps {} resets {}",
                        ch.name(),
                        stats.sweeps_completed,
                        stats.resets
                    ));
                }
            });
            if let Some(err) = &self.last_error {
                ui.colored_label(Color32::RED, err.as_str());
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let dispatcher = self.pipeline.dispatcher();
            let sweep_width = dispatcher.sweep_width();
            let background = ui.visuals().extreme_bg_color;
            let count = dispatcher.channel_count().max(1);
            let label_height = ui.text_style_height(&egui::TextStyle::Small);
            let row_height =
                (ui.available_height() / count as f32 - label_height - 10.0).max(40.0);
            for channel in dispatcher.channels() {
                let idx = channel.index();
                let color = TRACE_COLORS[idx % TRACE_COLORS.len()];
                ui.small(egui::RichText::new(channel.name()).color(color));
                let y = channel.y_range();
                let store = &self.store;
                let response = Plot::new(format!("sweep-{idx}"))
                    .height(row_height)
                    .allow_drag(false)
                    .allow_zoom(false)
                    .allow_scroll(false)
                    .allow_boxed_zoom(false)
                    .allow_double_click_reset(false)
                    .show_axes([false, false])
                    .show_x(false)
                    .show_y(false)
                    .include_x(0.0)
                    .include_x(sweep_width)
                    .include_y(y.min)
                    .include_y(y.max)
                    .show(ui, |plot_ui| {
                        for layer in layers(store, channel) {
                            match layer {
                                DrawHandle::Surface(id) => {
                                    let Some(surface) = store.surface(id) else {
                                        continue;
                                    };
                                    let points: PlotPoints =
                                        surface.points.iter().map(|p| [p.x, p.y]).collect();
                                    plot_ui.line(
                                        Line::new(points)
                                            .color(color)
                                            .width(2.0)
                                            .highlight(surface.highlight > 0.0)
                                            .name(channel.name()),
                                    );
                                }
                                DrawHandle::Overlay(id) => {
                                    let Some(overlay) = store.overlay(id) else {
                                        continue;
                                    };
                                    let r = overlay.rect;
                                    let x2 = r.x2.min(sweep_width);
                                    if x2 <= r.x1 {
                                        continue;
                                    }
                                    let corners = vec![
                                        [r.x1, r.y1],
                                        [x2, r.y1],
                                        [x2, r.y2],
                                        [r.x1, r.y2],
                                    ];
                                    plot_ui.polygon(
                                        Polygon::new(PlotPoints::new(corners))
                                            .fill_color(background)
                                            .stroke(Stroke::NONE),
                                    );
                                }
                            }
                        }
                        if let Some(p) = store.highlight(channel.highlight()) {
                            plot_ui.points(
                                Points::new(vec![[p.x, p.y]])
                                    .shape(MarkerShape::Circle)
                                    .filled(true)
                                    .radius(5.0)
                                    .color(HIGHLIGHT_COLOR),
                            );
                        }
                    });
                hover_changes.push((idx, response.response.hovered()));
            }
        });

        for (idx, hovered) in hover_changes {
            if let Err(e) = self.set_hovered(idx, hovered) {
                error!("highlight request failed: {e}");
            }
        }

        ctx.request_repaint(); // continuous streaming
    }
}
