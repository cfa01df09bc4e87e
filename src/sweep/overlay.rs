use crate::sweep::render::OverlayRect;
use crate::types::YRange;

/// Mask over the previous sweep from the origin to slightly past the draw head.
/// The lead hides stroke-width and antialiasing leftovers just ahead of the head.
pub fn overlay_rect(pos_x: f64, sweep_width: f64, margin: f64, y_range: YRange) -> OverlayRect {
    OverlayRect {
        x1: 0.0,
        y1: y_range.min,
        x2: pos_x + sweep_width * margin,
        y2: y_range.max,
    }
}
