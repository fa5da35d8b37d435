//! Pre-allocated event batches filled by instances and read back by hosts.

pub mod view;
pub mod writer;

pub use view::EventView;
pub use writer::{EventWriter, EventWriters, PayloadWriter};

pub const DEFAULT_BATCH_SIZE: u32 = 128;

pub const DEFAULT_EVENT_SIZE: u32 = 256 * 1024;

/// Timestamp sentinel: the producer did not say when the event happened.
pub const TIMESTAMP_UNSET: u64 = u64::MAX;
