use log::{debug, warn};

use crate::config::ChannelSpec;
use crate::sweep::detector::{detect, SweepSignal};
use crate::sweep::render::{
    DrawHandle, HighlightId, OverlayId, SurfaceId, SweepRenderer, DRAW_ORDER_INCOMING,
    DRAW_ORDER_OVERLAY, DRAW_ORDER_PREVIOUS,
};
use crate::types::{WrappedPoint, YRange};

/// Which of a channel's two traces a request refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceRole {
    Incoming,
    Previous,
}

/// Decision for one channel, computed against the cursor of the previous tick.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelPlan {
    pub prev_pos_x: f64,
    pub signal: SweepSignal,
    pub points: Vec<WrappedPoint>,
}

impl ChannelPlan {
    pub fn new(points: Vec<WrappedPoint>, prev_pos_x: f64) -> Self {
        let signal = detect(&points, prev_pos_x);
        Self {
            prev_pos_x,
            signal,
            points,
        }
    }
    pub fn last_x(&self) -> Option<f64> {
        self.points.last().map(|p| p.x)
    }
}

/// What a channel did with its batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Skipped,
    Appended(usize),
    Swapped { split: usize },
    Reset { sweeps: usize, dropped: usize },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelStats {
    pub sweeps_completed: u64,
    pub resets: u64,
    pub dropped_samples: u64,
}

/// Two traces per channel. The roles are relabelled on a swap, never copied.
pub struct SweepChannel {
    index: usize,
    name: String,
    y_range: YRange,
    slot_a: SurfaceId,
    slot_b: SurfaceId,
    incoming_is_a: bool,
    overlay: OverlayId,
    highlight: HighlightId,
    pending_highlight: Option<(SurfaceRole, f32)>,
    stats: ChannelStats,
}

impl SweepChannel {
    pub fn create<R: SweepRenderer>(index: usize, spec: &ChannelSpec, renderer: &mut R) -> Self {
        let slot_a = renderer.create_surface();
        let slot_b = renderer.create_surface();
        let overlay = renderer.create_overlay();
        let highlight = renderer.create_highlight();
        let channel = Self {
            index,
            name: spec.name.clone(),
            y_range: spec.y_range(),
            slot_a,
            slot_b,
            incoming_is_a: true,
            overlay,
            highlight,
            pending_highlight: None,
            stats: ChannelStats::default(),
        };
        channel.apply_draw_order(renderer);
        channel
    }

    pub fn index(&self) -> usize {
        self.index
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn y_range(&self) -> YRange {
        self.y_range
    }
    pub fn overlay(&self) -> OverlayId {
        self.overlay
    }
    pub fn highlight(&self) -> HighlightId {
        self.highlight
    }
    pub fn stats(&self) -> ChannelStats {
        self.stats
    }

    pub fn incoming(&self) -> SurfaceId {
        if self.incoming_is_a {
            self.slot_a
        } else {
            self.slot_b
        }
    }

    pub fn previous(&self) -> SurfaceId {
        if self.incoming_is_a {
            self.slot_b
        } else {
            self.slot_a
        }
    }

    pub fn surface(&self, role: SurfaceRole) -> SurfaceId {
        match role {
            SurfaceRole::Incoming => self.incoming(),
            SurfaceRole::Previous => self.previous(),
        }
    }

    pub fn apply<R: SweepRenderer>(&mut self, plan: &ChannelPlan, renderer: &mut R) -> Transition {
        let Some(&last) = plan.points.last() else {
            return Transition::Skipped;
        };
        let transition = match plan.signal {
            SweepSignal::Reset { sweeps } => {
                // Multi-sweep bursts are not reconstructible; drop the batch.
                renderer.clear_surface(self.previous());
                renderer.clear_surface(self.incoming());
                let dropped = plan.points.len();
                self.stats.resets += 1;
                self.stats.dropped_samples += dropped as u64;
                warn!(
                    "channel {} ({}): {} sweeps in one batch, reset and dropped {} samples",
                    self.index, self.name, sweeps, dropped
                );
                Transition::Reset { sweeps, dropped }
            }
            SweepSignal::Swap { split } => {
                let (tail, head) = plan.points.split_at(split);
                renderer.append_points(self.incoming(), tail);
                self.incoming_is_a = !self.incoming_is_a;
                self.apply_draw_order(renderer);
                renderer.clear_surface(self.incoming());
                renderer.append_points(self.incoming(), head);
                self.stats.sweeps_completed += 1;
                debug!(
                    "channel {} ({}): sweep completed, split at {}",
                    self.index, self.name, split
                );
                Transition::Swapped { split }
            }
            SweepSignal::Append => {
                renderer.append_points(self.incoming(), &plan.points);
                Transition::Appended(plan.points.len())
            }
        };
        renderer.set_highlight_point(self.highlight, last);
        transition
    }

    pub fn request_highlight(&mut self, role: SurfaceRole, value: f32) {
        self.pending_highlight = Some((role, value));
    }

    /// Applies the latest pending request to its surface, then mirrors it to
    /// the sibling. Runs at most once per tick.
    pub fn sync_highlight<R: SweepRenderer>(&mut self, renderer: &mut R) {
        let Some((role, value)) = self.pending_highlight.take() else {
            return;
        };
        let (source, mirror) = match role {
            SurfaceRole::Incoming => (self.incoming(), self.previous()),
            SurfaceRole::Previous => (self.previous(), self.incoming()),
        };
        renderer.set_surface_highlight(source, value);
        renderer.set_surface_highlight(mirror, value);
    }

    fn apply_draw_order<R: SweepRenderer>(&self, renderer: &mut R) {
        renderer.set_draw_order(DrawHandle::Surface(self.previous()), DRAW_ORDER_PREVIOUS);
        renderer.set_draw_order(DrawHandle::Overlay(self.overlay), DRAW_ORDER_OVERLAY);
        renderer.set_draw_order(DrawHandle::Surface(self.incoming()), DRAW_ORDER_INCOMING);
    }
}
