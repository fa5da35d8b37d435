use super::builtin::{Builtin, InstanceOptions};
use super::{BatchOutcome, Instance, PluginState};
use crate::context::Context;
use crate::error::SourceError;
use crate::event::{EventWriter, EventWriters, TIMESTAMP_UNSET};
use crossbeam_channel::{Receiver, select};
use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug)]
pub struct PushEvent {
    pub payload: Result<Vec<u8>, SourceError>,
    pub timestamp: Option<SystemTime>,
}

impl PushEvent {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: Ok(data.into()),
            timestamp: None,
        }
    }

    pub fn error(err: SourceError) -> Self {
        Self {
            payload: Err(err),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Event source filled from a channel fed by an independent producer.
pub struct PushInstance {
    builtin: Builtin,
    events_rx: Receiver<PushEvent>,
}

impl PushInstance {
    pub fn new(
        events_rx: Receiver<PushEvent>,
        options: InstanceOptions,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            builtin: Builtin::open(options)?,
            events_rx,
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

impl Instance for PushInstance {
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

        let events_rx = self.events_rx.clone();
        let done = self.builtin.ctx.done().clone();

        let mut n = 0;
        while n < evts.len() {
            let deadline = self.builtin.ticker.channel();
            select! {
                recv(events_rx) -> msg => {
                    // a disconnected channel is the producer saying it is done
                    let evt = msg.unwrap_or_else(|_| PushEvent::error(SourceError::Eof));
                    if let Err(err) = write_event(&mut evts.get_mut(n), evt) {
                        if !err.is_timeout() {
                            self.builtin.latch_eof();
                        }
                        return BatchOutcome::failed(n, err);
                    }
                    n += 1;
                }
                recv(deadline) -> _ => {
                    self.builtin.ticker.tick();
                    return BatchOutcome::timeout(n);
                }
                recv(done) -> _ => {
                    self.builtin.latch_eof();
                    return BatchOutcome::eof(n);
                }
            }
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

fn write_event(evt: &mut EventWriter<'_>, msg: PushEvent) -> Result<(), SourceError> {
    let data = msg.payload?;

    let written = evt.writer().write(&data)?;
    if written < data.len() {
        return Err(SourceError::ShortWrite {
            written,
            expected: data.len(),
        });
    }

    evt.set_timestamp(match msg.timestamp {
        Some(timestamp) => unix_nanos(timestamp),
        None => TIMESTAMP_UNSET,
    });
    Ok(())
}

/// Nanoseconds since the Unix epoch. Times before the epoch clamp to zero and
/// times too far out to fit clamp just below the unset sentinel.
fn unix_nanos(timestamp: SystemTime) -> u64 {
    timestamp
        .duration_since(UNIX_EPOCH)
        .map(|d| {
            u64::try_from(d.as_nanos())
                .map_or(TIMESTAMP_UNSET - 1, |ns| ns.min(TIMESTAMP_UNSET - 1))
        })
        .unwrap_or(0)
}
