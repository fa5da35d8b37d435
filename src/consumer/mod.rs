use crate::event::EventView;
pub mod dispatcher;

/// Receives the events of every batch a host polls.
pub trait EventConsumer: Send {
    /// Returns false if the event could not be handled.
    fn consume(&mut self, event: &EventView<'_>) -> bool;

    fn flush(&mut self) {}

    fn name(&self) -> &str;
}
