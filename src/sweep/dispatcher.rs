use log::trace;

use crate::config::SweepConfig;
use crate::sweep::channel::{ChannelPlan, SurfaceRole, SweepChannel, Transition};
use crate::sweep::error::SweepError;
use crate::sweep::overlay::overlay_rect;
use crate::sweep::render::SweepRenderer;
use crate::sweep::wrap::wrap_samples;
use crate::types::{Sample, SweepBatch};

/// Output of the compute phase. Nothing has been drawn yet.
#[derive(Clone, Debug, PartialEq)]
pub struct TickPlan {
    pub prev_pos_x: f64,
    /// Candidate cursor: the furthest last position over all channels, if any
    /// channel had samples.
    pub pos_x: Option<f64>,
    pub channels: Vec<ChannelPlan>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub cursor: f64,
    pub transitions: Vec<Transition>,
}

/// Runs one tick per batch over every channel and owns the shared sweep cursor.
pub struct SweepDispatcher {
    sweep_width: f64,
    overlay_margin: f64,
    validate_samples: bool,
    channels: Vec<SweepChannel>,
    prev_pos_x: f64,
}

impl SweepDispatcher {
    pub fn new<R: SweepRenderer>(config: &SweepConfig, renderer: &mut R) -> Result<Self, SweepError> {
        config.validate()?;
        let channels = config
            .channels
            .iter()
            .enumerate()
            .map(|(idx, spec)| SweepChannel::create(idx, spec, renderer))
            .collect();
        Ok(Self {
            sweep_width: config.sweep_width,
            overlay_margin: config.overlay_margin,
            validate_samples: config.validate_samples,
            channels,
            prev_pos_x: 0.0,
        })
    }

    pub fn cursor(&self) -> f64 {
        self.prev_pos_x
    }
    pub fn sweep_width(&self) -> f64 {
        self.sweep_width
    }
    pub fn channels(&self) -> &[SweepChannel] {
        &self.channels
    }
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn request_highlight(
        &mut self,
        channel: usize,
        role: SurfaceRole,
        value: f32,
    ) -> Result<(), SweepError> {
        let ch = self
            .channels
            .get_mut(channel)
            .ok_or(SweepError::UnknownChannel(channel))?;
        ch.request_highlight(role, value);
        Ok(())
    }

    /// Compute phase. Pure: every channel is planned against the same cursor.
    pub fn plan(&self, batch: &SweepBatch) -> Result<TickPlan, SweepError> {
        if batch.num_channels() != self.channels.len() {
            return Err(SweepError::ChannelMismatch {
                expected: self.channels.len(),
                actual: batch.num_channels(),
            });
        }
        let mut pos_x: Option<f64> = None;
        let mut channels = Vec::with_capacity(batch.num_channels());
        for (idx, samples) in batch.channels.iter().enumerate() {
            if self.validate_samples {
                validate_channel(idx, samples)?;
            }
            let plan = ChannelPlan::new(wrap_samples(samples, self.sweep_width), self.prev_pos_x);
            if let Some(x) = plan.last_x() {
                pos_x = Some(pos_x.map_or(x, |p| p.max(x)));
            }
            channels.push(plan);
        }
        Ok(TickPlan {
            prev_pos_x: self.prev_pos_x,
            pos_x,
            channels,
        })
    }

    /// Commit phase: mutates surfaces, moves overlays, then the cursor.
    pub fn commit<R: SweepRenderer>(&mut self, plan: TickPlan, renderer: &mut R) -> TickReport {
        let transitions = self
            .channels
            .iter_mut()
            .zip(&plan.channels)
            .map(|(channel, channel_plan)| channel.apply(channel_plan, renderer))
            .collect();
        let pos_x = plan.pos_x.unwrap_or(self.prev_pos_x);
        for channel in &mut self.channels {
            let rect = overlay_rect(pos_x, self.sweep_width, self.overlay_margin, channel.y_range());
            renderer.set_overlay_rect(channel.overlay(), rect);
            channel.sync_highlight(renderer);
        }
        self.prev_pos_x = pos_x;
        trace!("tick committed, cursor {:.1} -> {pos_x:.1}", plan.prev_pos_x);
        TickReport {
            cursor: pos_x,
            transitions,
        }
    }

    pub fn process_batch<R: SweepRenderer>(
        &mut self,
        batch: &SweepBatch,
        renderer: &mut R,
    ) -> Result<TickReport, SweepError> {
        let plan = self.plan(batch)?;
        trace!(
            "tick planned: {} samples over {} channels",
            batch.total_samples(),
            batch.num_channels()
        );
        Ok(self.commit(plan, renderer))
    }
}

fn validate_channel(channel: usize, samples: &[Sample]) -> Result<(), SweepError> {
    let mut last = f64::NEG_INFINITY;
    for (index, s) in samples.iter().enumerate() {
        if !s.timestamp.is_finite() || !s.value.is_finite() {
            return Err(SweepError::InvalidSample { channel, index });
        }
        if s.timestamp < last {
            return Err(SweepError::NonMonotonic { channel, index });
        }
        last = s.timestamp;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChannelSpec;
    use crate::sweep::detector::SweepSignal;
    use crate::sweep::render::{DrawHandle, SurfaceStore};
    fn config(channels: usize) -> SweepConfig {
        SweepConfig {
            sweep_width: 1000.0,
            channels: (0..channels)
                .map(|i| ChannelSpec::new(format!("C{i}"), -100.0, 100.0))
                .collect(),
            ..SweepConfig::default()
        }
    }
    fn samples(ts: &[f64]) -> Vec<Sample> {
        ts.iter().map(|&t| Sample::new(t, t / 10.0)).collect()
    }
    fn xs(store: &SurfaceStore, id: crate::sweep::render::SurfaceId) -> Vec<f64> {
        store.points(id).iter().map(|p| p.x).collect()
    }
    #[test]
    fn wrap_scenario_swaps_and_moves_cursor() {
        let mut store = SurfaceStore::new();
        let mut dispatcher = SweepDispatcher::new(&config(1), &mut store).unwrap();
        dispatcher
            .process_batch(&SweepBatch::new(vec![samples(&[900.0, 950.0])]), &mut store)
            .unwrap();
        assert_eq!(dispatcher.cursor(), 950.0);
        let report = dispatcher
            .process_batch(
                &SweepBatch::new(vec![samples(&[960.0, 980.0, 1010.0, 1030.0])]),
                &mut store,
            )
            .unwrap();
        assert_eq!(report.transitions, vec![Transition::Swapped { split: 2 }]);
        assert_eq!(report.cursor, 30.0);
        let ch = &dispatcher.channels()[0];
        assert_eq!(xs(&store, ch.previous()), vec![900.0, 950.0, 960.0, 980.0]);
        assert_eq!(xs(&store, ch.incoming()), vec![10.0, 30.0]);
        let rect = store.overlay(ch.overlay()).unwrap().rect;
        assert_eq!(rect.x1, 0.0);
        assert!((rect.x2 - 60.0).abs() < 1e-9);
        assert_eq!((rect.y1, rect.y2), (-100.0, 100.0));
    }
    #[test]
    fn multi_sweep_burst_resets() {
        let mut store = SurfaceStore::new();
        let mut dispatcher = SweepDispatcher::new(&config(1), &mut store).unwrap();
        dispatcher
            .process_batch(&SweepBatch::new(vec![samples(&[50.0, 100.0])]), &mut store)
            .unwrap();
        let report = dispatcher
            .process_batch(&SweepBatch::new(vec![samples(&[1050.0, 1900.0, 2060.0])]), &mut store)
            .unwrap();
        assert_eq!(
            report.transitions,
            vec![Transition::Reset { sweeps: 2, dropped: 3 }]
        );
        let ch = &dispatcher.channels()[0];
        assert_eq!(store.point_count(ch.incoming()), 0);
        assert_eq!(store.point_count(ch.previous()), 0);
        assert_eq!(dispatcher.cursor(), 60.0);
    }
    #[test]
    fn every_channel_sees_the_same_cursor() {
        let mut store = SurfaceStore::new();
        let mut dispatcher = SweepDispatcher::new(&config(2), &mut store).unwrap();
        dispatcher
            .process_batch(&SweepBatch::new(vec![samples(&[500.0]), samples(&[500.0])]), &mut store)
            .unwrap();
        // Channel 0 runs ahead; if its position leaked into channel 1 the
        // latter would look like it had wrapped.
        let batch = SweepBatch::new(vec![samples(&[600.0, 700.0]), samples(&[550.0, 650.0])]);
        let plan = dispatcher.plan(&batch).unwrap();
        assert!(plan.channels.iter().all(|c| c.prev_pos_x == 500.0));
        assert!(plan.channels.iter().all(|c| c.signal == SweepSignal::Append));
        assert_eq!(plan.pos_x, Some(700.0));
        let report = dispatcher.commit(plan, &mut store);
        assert_eq!(report.transitions, vec![Transition::Appended(2), Transition::Appended(2)]);
        assert_eq!(dispatcher.cursor(), 700.0);
    }
    #[test]
    fn empty_channel_is_skipped() {
        let mut store = SurfaceStore::new();
        let mut dispatcher = SweepDispatcher::new(&config(2), &mut store).unwrap();
        dispatcher
            .process_batch(
                &SweepBatch::new(vec![samples(&[900.0, 950.0]), samples(&[900.0, 940.0])]),
                &mut store,
            )
            .unwrap();
        dispatcher
            .process_batch(
                &SweepBatch::new(vec![samples(&[960.0, 1010.0]), samples(&[970.0, 1005.0])]),
                &mut store,
            )
            .unwrap();
        let ch = &dispatcher.channels()[1];
        let incoming = (ch.incoming(), xs(&store, ch.incoming()));
        let previous = (ch.previous(), xs(&store, ch.previous()));
        let orders = (
            store.draw_order(DrawHandle::Surface(ch.incoming())),
            store.draw_order(DrawHandle::Surface(ch.previous())),
        );
        let highlight = store.highlight(ch.highlight());
        assert_eq!(highlight.map(|p| p.x), Some(5.0));

        let report = dispatcher
            .process_batch(&SweepBatch::new(vec![samples(&[1020.0]), Vec::new()]), &mut store)
            .unwrap();
        assert_eq!(report.transitions[1], Transition::Skipped);
        assert_eq!(report.cursor, 20.0);
        let ch = &dispatcher.channels()[1];
        assert_eq!((ch.incoming(), xs(&store, ch.incoming())), incoming);
        assert_eq!((ch.previous(), xs(&store, ch.previous())), previous);
        assert_eq!(
            (
                store.draw_order(DrawHandle::Surface(ch.incoming())),
                store.draw_order(DrawHandle::Surface(ch.previous())),
            ),
            orders
        );
        assert_eq!(store.highlight(ch.highlight()), highlight);
    }
    #[test]
    fn all_empty_batch_keeps_cursor() {
        let mut store = SurfaceStore::new();
        let mut dispatcher = SweepDispatcher::new(&config(1), &mut store).unwrap();
        dispatcher
            .process_batch(&SweepBatch::new(vec![samples(&[400.0])]), &mut store)
            .unwrap();
        let report = dispatcher
            .process_batch(&SweepBatch::new(vec![Vec::new()]), &mut store)
            .unwrap();
        assert_eq!(report.cursor, 400.0);
    }
    #[test]
    fn invalid_sample_rejects_whole_tick() {
        let mut store = SurfaceStore::new();
        let mut dispatcher = SweepDispatcher::new(&config(2), &mut store).unwrap();
        let batch = SweepBatch::new(vec![
            samples(&[10.0, 20.0]),
            vec![Sample::new(10.0, 1.0), Sample::new(f64::NAN, 1.0)],
        ]);
        let err = dispatcher.process_batch(&batch, &mut store).unwrap_err();
        assert!(matches!(err, SweepError::InvalidSample { channel: 1, index: 1 }));
        assert_eq!(store.point_count(dispatcher.channels()[0].incoming()), 0);
        assert_eq!(dispatcher.cursor(), 0.0);
    }
    #[test]
    fn backwards_timestamps_rejected() {
        let mut store = SurfaceStore::new();
        let mut dispatcher = SweepDispatcher::new(&config(1), &mut store).unwrap();
        let err = dispatcher
            .process_batch(&SweepBatch::new(vec![samples(&[30.0, 20.0])]), &mut store)
            .unwrap_err();
        assert!(matches!(err, SweepError::NonMonotonic { channel: 0, index: 1 }));
    }
    #[test]
    fn validation_can_be_disabled() {
        let mut store = SurfaceStore::new();
        let mut cfg = config(1);
        cfg.validate_samples = false;
        let mut dispatcher = SweepDispatcher::new(&cfg, &mut store).unwrap();
        let batch = SweepBatch::new(vec![vec![Sample::new(10.0, f64::INFINITY)]]);
        assert!(dispatcher.process_batch(&batch, &mut store).is_ok());
    }
    #[test]
    fn channel_count_mismatch() {
        let mut store = SurfaceStore::new();
        let mut dispatcher = SweepDispatcher::new(&config(3), &mut store).unwrap();
        let err = dispatcher
            .process_batch(&SweepBatch::new(vec![samples(&[1.0])]), &mut store)
            .unwrap_err();
        assert!(matches!(err, SweepError::ChannelMismatch { expected: 3, actual: 1 }));
    }
    #[test]
    fn highlight_binding_applies_at_tick_end() {
        let mut store = SurfaceStore::new();
        let mut dispatcher = SweepDispatcher::new(&config(1), &mut store).unwrap();
        dispatcher.request_highlight(0, SurfaceRole::Incoming, 1.0).unwrap();
        let ch = &dispatcher.channels()[0];
        assert_eq!(store.surface(ch.previous()).unwrap().highlight, 0.0);
        dispatcher
            .process_batch(&SweepBatch::new(vec![Vec::new()]), &mut store)
            .unwrap();
        let ch = &dispatcher.channels()[0];
        assert_eq!(store.surface(ch.incoming()).unwrap().highlight, 1.0);
        assert_eq!(store.surface(ch.previous()).unwrap().highlight, 1.0);
        assert!(matches!(
            dispatcher.request_highlight(4, SurfaceRole::Previous, 1.0),
            Err(SweepError::UnknownChannel(4))
        ));
    }
    #[test]
    fn initial_draw_order_layers_overlay_between_traces() {
        let mut store = SurfaceStore::new();
        let dispatcher = SweepDispatcher::new(&config(1), &mut store).unwrap();
        let ch = &dispatcher.channels()[0];
        let previous = store.draw_order(DrawHandle::Surface(ch.previous())).unwrap();
        let overlay = store.draw_order(DrawHandle::Overlay(ch.overlay())).unwrap();
        let incoming = store.draw_order(DrawHandle::Surface(ch.incoming())).unwrap();
        assert!(previous < overlay && overlay < incoming);
    }
}
