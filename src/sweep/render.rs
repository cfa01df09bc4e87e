use crate::types::WrappedPoint;

/// Draw order of the frozen trace.
pub const DRAW_ORDER_PREVIOUS: i32 = 0;
/// Draw order of the stale-data mask.
pub const DRAW_ORDER_OVERLAY: i32 = 1;
/// Draw order of the trace receiving new points.
pub const DRAW_ORDER_INCOMING: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OverlayId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HighlightId(pub usize);

/// Anything that takes part in the per-viewport z-ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawHandle {
    Surface(SurfaceId),
    Overlay(OverlayId),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OverlayRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Drawing primitives the sweep logic needs from a chart backend.
pub trait SweepRenderer {
    fn create_surface(&mut self) -> SurfaceId;
    fn create_overlay(&mut self) -> OverlayId;
    fn create_highlight(&mut self) -> HighlightId;
    /// Appends after the existing points, never overwrites.
    fn append_points(&mut self, surface: SurfaceId, points: &[WrappedPoint]);
    fn clear_surface(&mut self, surface: SurfaceId);
    fn set_draw_order(&mut self, handle: DrawHandle, order: i32);
    /// Replaces the mask rectangle.
    fn set_overlay_rect(&mut self, overlay: OverlayId, rect: OverlayRect);
    /// Replaces the single highlighted marker.
    fn set_highlight_point(&mut self, highlight: HighlightId, point: WrappedPoint);
    /// Series emphasis, 0.0 for none.
    fn set_surface_highlight(&mut self, surface: SurfaceId, value: f32);
}

#[derive(Clone, Debug, Default)]
pub struct SurfaceState {
    pub points: Vec<WrappedPoint>,
    pub draw_order: i32,
    pub highlight: f32,
}

#[derive(Clone, Debug, Default)]
pub struct OverlayState {
    pub rect: OverlayRect,
    pub draw_order: i32,
}

/// In-memory backend. Keeps everything a frontend needs to draw the chart.
#[derive(Clone, Debug, Default)]
pub struct SurfaceStore {
    surfaces: Vec<SurfaceState>,
    overlays: Vec<OverlayState>,
    highlights: Vec<Option<WrappedPoint>>,
}

impl SurfaceStore {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn surface(&self, id: SurfaceId) -> Option<&SurfaceState> {
        self.surfaces.get(id.0)
    }
    pub fn points(&self, id: SurfaceId) -> &[WrappedPoint] {
        self.surface(id).map(|s| s.points.as_slice()).unwrap_or(&[])
    }
    pub fn point_count(&self, id: SurfaceId) -> usize {
        self.points(id).len()
    }
    pub fn overlay(&self, id: OverlayId) -> Option<&OverlayState> {
        self.overlays.get(id.0)
    }
    pub fn highlight(&self, id: HighlightId) -> Option<WrappedPoint> {
        self.highlights.get(id.0).copied().flatten()
    }
    pub fn draw_order(&self, handle: DrawHandle) -> Option<i32> {
        match handle {
            DrawHandle::Surface(id) => self.surface(id).map(|s| s.draw_order),
            DrawHandle::Overlay(id) => self.overlay(id).map(|o| o.draw_order),
        }
    }
}

impl SweepRenderer for SurfaceStore {
    fn create_surface(&mut self) -> SurfaceId {
        self.surfaces.push(SurfaceState::default());
        SurfaceId(self.surfaces.len() - 1)
    }
    fn create_overlay(&mut self) -> OverlayId {
        self.overlays.push(OverlayState::default());
        OverlayId(self.overlays.len() - 1)
    }
    fn create_highlight(&mut self) -> HighlightId {
        self.highlights.push(None);
        HighlightId(self.highlights.len() - 1)
    }
    fn append_points(&mut self, surface: SurfaceId, points: &[WrappedPoint]) {
        if let Some(s) = self.surfaces.get_mut(surface.0) {
            s.points.extend_from_slice(points);
        }
    }
    fn clear_surface(&mut self, surface: SurfaceId) {
        if let Some(s) = self.surfaces.get_mut(surface.0) {
            s.points.clear();
        }
    }
    fn set_draw_order(&mut self, handle: DrawHandle, order: i32) {
        match handle {
            DrawHandle::Surface(id) => {
                if let Some(s) = self.surfaces.get_mut(id.0) {
                    s.draw_order = order;
                }
            }
            DrawHandle::Overlay(id) => {
                if let Some(o) = self.overlays.get_mut(id.0) {
                    o.draw_order = order;
                }
            }
        }
    }
    fn set_overlay_rect(&mut self, overlay: OverlayId, rect: OverlayRect) {
        if let Some(o) = self.overlays.get_mut(overlay.0) {
            o.rect = rect;
        }
    }
    fn set_highlight_point(&mut self, highlight: HighlightId, point: WrappedPoint) {
        if let Some(h) = self.highlights.get_mut(highlight.0) {
            *h = Some(point);
        }
    }
    fn set_surface_highlight(&mut self, surface: SurfaceId, value: f32) {
        if let Some(s) = self.surfaces.get_mut(surface.0) {
            s.highlight = value;
        }
    }
}
