use crate::config::SweepConfig;
use crate::sweep::dispatcher::{SweepDispatcher, TickReport};
use crate::sweep::error::SweepError;
use crate::sweep::render::SweepRenderer;
use crate::sweep::source::SampleSource;

/// High level pipeline that pulls batches from a source and draws them.
pub struct SweepPipeline<S: SampleSource> {
    source: S,
    dispatcher: SweepDispatcher,
}

impl<S: SampleSource> SweepPipeline<S> {
    pub fn new<R: SweepRenderer>(
        source: S,
        config: &SweepConfig,
        renderer: &mut R,
    ) -> Result<Self, SweepError> {
        Ok(Self {
            source,
            dispatcher: SweepDispatcher::new(config, renderer)?,
        })
    }
    pub fn dispatcher(&self) -> &SweepDispatcher {
        &self.dispatcher
    }
    pub fn dispatcher_mut(&mut self) -> &mut SweepDispatcher {
        &mut self.dispatcher
    }
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
    /// One tick. `None` when the source had nothing new.
    pub fn pump_once<R: SweepRenderer>(
        &mut self,
        renderer: &mut R,
    ) -> Result<Option<TickReport>, SweepError> {
        let Some(batch) = self.source.next_batch()? else {
            return Ok(None);
        };
        let report = self.dispatcher.process_batch(&batch, renderer)?;
        Ok(Some(report))
    }
    /// Pumps until the source runs dry; returns the number of ticks.
    pub fn drain<R: SweepRenderer>(&mut self, renderer: &mut R) -> Result<usize, SweepError> {
        let mut ticks = 0;
        while self.pump_once(renderer)?.is_some() {
            ticks += 1;
        }
        Ok(ticks)
    }
}
