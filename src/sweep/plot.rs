use std::io::Cursor;
use std::sync::OnceLock;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use plotters::style::register_font;
use log::warn;
use crate::sweep::channel::SweepChannel;
use crate::sweep::dispatcher::SweepDispatcher;
use crate::sweep::error::SweepError;
use crate::sweep::render::{DrawHandle, SurfaceStore};
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub highlight: RGBColor,
    pub palette: Vec<RGBColor>,
    pub label_size: u32,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 900,
            background: RGBColor(0, 0, 0),
            highlight: RGBColor(255, 200, 0),
            palette: vec![GREEN, CYAN, YELLOW, MAGENTA, RED, BLUE, WHITE],
            label_size: 16,
        }
    }
}
const LABEL_FONT: &[u8] = include_bytes!("../../assets/Hack-Regular.ttf");
const LABEL_FAMILY: &str = "sans-serif";
/// Top-left corner of a channel name, relative to its row.
const LABEL_OFFSET: (i32, i32) = (8, 6);
fn label_font_ready() -> bool {
    static READY: OnceLock<bool> = OnceLock::new();
    *READY.get_or_init(|| {
        let ok = register_font(LABEL_FAMILY, FontStyle::Normal, LABEL_FONT).is_ok();
        if !ok {
            warn!("bundled label font rejected, channel names will not be drawn");
        }
        ok
    })
}
/// Both traces and overlay of a channel, bottom first.
pub fn layers(store: &SurfaceStore, channel: &SweepChannel) -> Vec<DrawHandle> {
    let mut layers = vec![
        DrawHandle::Surface(channel.previous()),
        DrawHandle::Overlay(channel.overlay()),
        DrawHandle::Surface(channel.incoming()),
    ];
    layers.sort_by_key(|h| store.draw_order(*h).unwrap_or(0));
    layers
}
/// Renders the current state of every channel, one row each.
pub fn render_sweep_png(
    store: &SurfaceStore,
    dispatcher: &SweepDispatcher,
    style: PlotStyle,
) -> Result<Vec<u8>, SweepError> {
    if dispatcher.channel_count() == 0 {
        return Err(SweepError::Plot("nothing to render".into()));
    }
    let sweep_width = dispatcher.sweep_width();
    let labels = label_font_ready();
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let rows = root.split_evenly((dispatcher.channel_count(), 1));
        for (idx, (area, channel)) in rows.iter().zip(dispatcher.channels()).enumerate() {
            let color = style
                .palette
                .get(idx % style.palette.len().max(1))
                .copied()
                .unwrap_or(WHITE);
            let y = channel.y_range();
            let mut chart = ChartBuilder::on(area)
                .margin(4)
                .build_cartesian_2d(0f64..sweep_width, y.min..y.max)?;
            for layer in layers(store, channel) {
                match layer {
                    DrawHandle::Surface(id) => {
                        let series = store.points(id).iter().map(|p| (p.x, p.y));
                        chart.draw_series(LineSeries::new(series, &color))?;
                    }
                    DrawHandle::Overlay(id) => {
                        if let Some(overlay) = store.overlay(id) {
                            let r = overlay.rect;
                            // Mask may lead past the axis end.
                            let corners = [(r.x1, r.y1), (r.x2.min(sweep_width), r.y2)];
                            chart.draw_series(std::iter::once(Rectangle::new(
                                corners,
                                style.background.filled(),
                            )))?;
                        }
                    }
                }
            }
            if let Some(p) = store.highlight(channel.highlight()) {
                chart.draw_series(std::iter::once(Circle::new(
                    (p.x, p.y),
                    4,
                    style.highlight.filled(),
                )))?;
            }
            if labels {
                let font = (LABEL_FAMILY, style.label_size).into_font().color(&color);
                area.draw_text(channel.name(), &font, LABEL_OFFSET)?;
            }
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, SweepError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| SweepError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
