//! Opened event streams and the batch contract hosts poll them through.

pub mod builtin;
pub mod pull;
pub mod push;

pub use builtin::InstanceOptions;
pub use pull::PullInstance;
pub use push::{PushEvent, PushInstance};

use crate::error::SourceError;
use crate::event::EventWriters;

pub trait PluginState {}

impl<T: ?Sized> PluginState for T {}

/// Result of one [`Instance::next_batch`] call.
///
/// `count` slots at the front of the batch hold events regardless of
/// `status`: a timeout or a failure still hands back what was filled before it.
#[derive(Debug)]
pub struct BatchOutcome {
    pub count: usize,
    pub status: Result<(), SourceError>,
}

impl BatchOutcome {
    #[inline]
    pub fn full(count: usize) -> Self {
        Self {
            count,
            status: Ok(()),
        }
    }

    #[inline]
    pub fn timeout(count: usize) -> Self {
        Self::failed(count, SourceError::Timeout)
    }

    #[inline]
    pub fn eof(count: usize) -> Self {
        Self::failed(count, SourceError::Eof)
    }

    #[inline]
    pub fn failed(count: usize, err: SourceError) -> Self {
        Self {
            count,
            status: Err(err),
        }
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    #[inline]
    pub fn is_timeout(&self) -> bool {
        matches!(&self.status, Err(err) if err.is_timeout())
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(&self.status, Err(err) if err.is_eof())
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(&self.status, Err(err) if !err.is_timeout())
    }
}

pub trait Instance {
    fn events(&self) -> &EventWriters;

    fn events_mut(&mut self) -> &mut EventWriters;

    fn set_events(&mut self, events: EventWriters);

    fn take_events(&mut self) -> EventWriters {
        std::mem::take(self.events_mut())
    }

    /// Fills `evts` from the front and reports how far it got.
    fn next_batch(&mut self, state: &dyn PluginState, evts: &mut EventWriters) -> BatchOutcome;

    fn close(&mut self) {}

    fn progress(&self, _state: &dyn PluginState) -> (f64, String) {
        (0.0, String::new())
    }
}

#[derive(Debug, Default)]
pub struct BaseInstance {
    events: EventWriters,
}

impl BaseInstance {
    pub fn new(events: EventWriters) -> Self {
        Self { events }
    }

    #[inline]
    pub fn events(&self) -> &EventWriters {
        &self.events
    }

    #[inline]
    pub fn events_mut(&mut self) -> &mut EventWriters {
        &mut self.events
    }

    pub fn set_events(&mut self, events: EventWriters) {
        self.events = events;
    }
}
