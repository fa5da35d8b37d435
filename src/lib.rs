//! Batch-producing event sources.
//!
//! An event source is opened either from a function that produces one event
//! at a time ([`PullInstance`]) or from a channel fed by an independent
//! producer ([`PushInstance`]). Hosts poll it through [`Instance::next_batch`],
//! which fills a pre-allocated batch until it is full, its timeout expires,
//! or the stream ends.

pub mod config;
pub mod consumer;
pub mod context;
pub mod error;
pub mod event;
pub mod instance;
pub mod timer;

pub use context::{CancelHandle, Context};
pub use error::SourceError;
pub use event::{EventView, EventWriter, EventWriters};
pub use instance::{BatchOutcome, Instance, InstanceOptions, PullInstance, PushEvent, PushInstance};
