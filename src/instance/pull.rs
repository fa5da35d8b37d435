use super::builtin::{Builtin, InstanceOptions};
use super::{BatchOutcome, Instance, PluginState};
use crate::context::Context;
use crate::error::SourceError;
use crate::event::{EventWriter, EventWriters};

/// The producer function runs on the polling thread and must not block: the
/// batch timeout is only checked between calls.
pub struct PullInstance<F> {
    builtin: Builtin,
    pull: F,
}

impl<F> PullInstance<F>
where
    F: FnMut(&Context, &mut EventWriter<'_>) -> Result<(), SourceError>,
{
    pub fn new(pull: F, options: InstanceOptions) -> Result<Self, SourceError> {
        Ok(Self {
            builtin: Builtin::open(options)?,
            pull,
        })
    }

    #[inline]
    pub fn context(&self) -> &Context {
        &self.builtin.ctx
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.builtin.is_eof()
    }
}

impl<F> Instance for PullInstance<F>
where
    F: FnMut(&Context, &mut EventWriter<'_>) -> Result<(), SourceError>,
{
    fn events(&self) -> &EventWriters {
        self.builtin.base.events()
    }

    fn events_mut(&mut self) -> &mut EventWriters {
        self.builtin.base.events_mut()
    }

    fn set_events(&mut self, events: EventWriters) {
        self.builtin.base.set_events(events);
    }

    fn next_batch(&mut self, _state: &dyn PluginState, evts: &mut EventWriters) -> BatchOutcome {
        if self.builtin.is_eof() {
            return BatchOutcome::eof(0);
        }

        self.builtin.ticker.reset();

        let mut n = 0;
        while n < evts.len() {
            // checked before every pull so an expired batch does no more work
            if self.builtin.ticker.fired() {
                return BatchOutcome::timeout(n);
            }
            if self.builtin.ctx.is_done() {
                self.builtin.latch_eof();
                return BatchOutcome::eof(n);
            }

            let mut evt = evts.get_mut(n);
            evt.reset();
            if let Err(err) = (self.pull)(&self.builtin.ctx, &mut evt) {
                if !err.is_timeout() {
                    self.builtin.latch_eof();
                }
                return BatchOutcome::failed(n, err);
            }
            n += 1;
        }

        BatchOutcome::full(n)
    }

    fn close(&mut self) {
        self.builtin.close();
    }

    fn progress(&self, _state: &dyn PluginState) -> (f64, String) {
        self.builtin.progress()
    }
}
