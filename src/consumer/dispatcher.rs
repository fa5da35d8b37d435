use super::EventConsumer;
use crate::error::SourceError;
use crate::event::EventWriters;
use crate::instance::{BatchOutcome, Instance, PluginState};
use log::{debug, trace};

pub struct EventDispatcher {
    consumers: Vec<Box<dyn EventConsumer>>,
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            consumers: Vec::new(),
        }
    }

    pub fn add_consumer<C: EventConsumer + 'static>(&mut self, consumer: C) {
        self.consumers.push(Box::new(consumer));
    }

    pub fn dispatch(&mut self, evts: &EventWriters, count: usize) -> DrainStats {
        let mut stats = DrainStats::default();
        for event in evts.filled(count) {
            stats.events_read += 1;
            for consumer in &mut self.consumers {
                if consumer.consume(&event) {
                    stats.events_delivered += 1;
                } else {
                    stats.events_failed += 1;
                }
            }
        }
        for consumer in &mut self.consumers {
            consumer.flush();
        }
        stats
    }

    pub fn poll<I>(
        &mut self,
        instance: &mut I,
        state: &dyn PluginState,
    ) -> (BatchOutcome, DrainStats)
    where
        I: Instance + ?Sized,
    {
        let mut evts = instance.take_events();
        let outcome = instance.next_batch(state, &mut evts);
        let mut stats = self.dispatch(&evts, outcome.count);
        instance.set_events(evts);

        stats.batches = 1;
        if outcome.is_timeout() {
            stats.timeouts = 1;
        }
        trace!("polled batch: count={} status={:?}", outcome.count, outcome.status);
        (outcome, stats)
    }

    /// Polls until the stream ends, then closes the instance.
    pub fn run<I>(
        &mut self,
        instance: &mut I,
        state: &dyn PluginState,
    ) -> Result<DrainStats, SourceError>
    where
        I: Instance + ?Sized,
    {
        let mut total = DrainStats::default();
        loop {
            let (outcome, stats) = self.poll(instance, state);
            total.merge(&stats);

            match outcome.status {
                Ok(()) | Err(SourceError::Timeout) => continue,
                Err(SourceError::Eof) => {
                    debug!("event stream finished after {} events", total.events_read);
                    instance.close();
                    return Ok(total);
                }
                Err(err) => {
                    instance.close();
                    return Err(err);
                }
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DrainStats {
    pub batches: u64,
    pub timeouts: u64,
    pub events_read: u64,
    pub events_delivered: u64,
    pub events_failed: u64,
}

impl DrainStats {
    #[inline]
    pub fn success_rate(&self) -> f64 {
        let total = self.events_delivered + self.events_failed;
        if total == 0 {
            1.0
        } else {
            self.events_delivered as f64 / total as f64
        }
    }

    pub fn merge(&mut self, other: &DrainStats) {
        self.batches += other.batches;
        self.timeouts += other.timeouts;
        self.events_read += other.events_read;
        self.events_delivered += other.events_delivered;
        self.events_failed += other.events_failed;
    }
}
