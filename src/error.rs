use std::io;

/// Errors surfaced by event source instances.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The batch deadline expired. Transient: flush what was filled and call again.
    #[error("timeout")]
    Timeout,

    /// The stream ended. Permanent for the instance that returned it.
    #[error("end of stream")]
    Eof,

    #[error("short write: {written} of {expected} bytes accepted")]
    ShortWrite { written: usize, expected: usize },

    #[error("invalid batch size {0}: must be positive")]
    InvalidBatchSize(u32),

    #[error("invalid event size {0}: must be positive")]
    InvalidEventSize(u32),

    #[error("event batch too large: {batch_size} events of {event_size} bytes")]
    BufferTooLarge { batch_size: u32, event_size: u32 },

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("producer error: {0}")]
    Producer(Box<dyn std::error::Error + Send + Sync>),
}

impl SourceError {
    /// Wraps any producer-side failure.
    pub fn producer<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Producer(err.into())
    }

    #[inline]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}
