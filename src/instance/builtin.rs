use super::BaseInstance;
use crate::context::{CancelHandle, Context};
use crate::error::SourceError;
use crate::event::{DEFAULT_BATCH_SIZE, DEFAULT_EVENT_SIZE, EventWriters};
use crate::timer::Ticker;
use log::debug;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30);

type CloseFn = Box<dyn FnOnce() + Send>;
type ProgressFn = Box<dyn Fn() -> (f64, String) + Send>;

pub struct InstanceOptions {
    context: Context,
    timeout: Duration,
    batch_size: u32,
    event_size: u32,
    on_close: Option<CloseFn>,
    progress: Option<ProgressFn>,
}

impl Default for InstanceOptions {
    fn default() -> Self {
        Self {
            context: Context::background(),
            timeout: DEFAULT_TIMEOUT,
            batch_size: DEFAULT_BATCH_SIZE,
            event_size: DEFAULT_EVENT_SIZE,
            on_close: None,
            progress: None,
        }
    }
}

impl InstanceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_close<F>(mut self, on_close: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_close = Some(Box::new(on_close));
        self
    }

    pub fn with_batch_size(mut self, size: u32) -> Self {
        self.batch_size = size;
        self
    }

    pub fn with_event_size(mut self, size: u32) -> Self {
        self.event_size = size;
        self
    }

    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: Fn() -> (f64, String) + Send + 'static,
    {
        self.progress = Some(Box::new(progress));
        self
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[inline]
    pub fn batch_size(&self) -> u32 {
        self.batch_size
    }

    #[inline]
    pub fn event_size(&self) -> u32 {
        self.event_size
    }
}

impl fmt::Debug for InstanceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceOptions")
            .field("context", &self.context)
            .field("timeout", &self.timeout)
            .field("batch_size", &self.batch_size)
            .field("event_size", &self.event_size)
            .field("on_close", &self.on_close.is_some())
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

pub(crate) struct Builtin {
    pub(crate) base: BaseInstance,
    pub(crate) ctx: Context,
    pub(crate) ticker: Ticker,
    cancel: CancelHandle,
    on_close: Option<CloseFn>,
    progress: Option<ProgressFn>,
    eof: bool,
    closed: bool,
}

impl Builtin {
    pub(crate) fn open(options: InstanceOptions) -> Result<Self, SourceError> {
        let events = EventWriters::new(options.batch_size, options.event_size)?;

        // the instance always owns a cancellation of its own, so closing it
        // stops producers even when the caller's context lives on
        let (ctx, cancel) = options.context.with_cancel();

        debug!(
            "opened event source: batch_size={} event_size={} timeout={:?}",
            options.batch_size, options.event_size, options.timeout
        );

        Ok(Self {
            base: BaseInstance::new(events),
            ctx,
            ticker: Ticker::new(options.timeout),
            cancel,
            on_close: options.on_close,
            progress: options.progress,
            eof: false,
            closed: false,
        })
    }

    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.eof
    }

    pub(crate) fn latch_eof(&mut self) {
        if !self.eof {
            debug!("event source reached end of stream");
            self.eof = true;
        }
    }

    pub(crate) fn close(&mut self) {
        self.cancel.cancel();
        if let Some(on_close) = self.on_close.take() {
            on_close();
        }
        self.ticker.stop();

        if !self.closed {
            self.closed = true;
            debug!("closed event source");
        }
    }

    pub(crate) fn progress(&self) -> (f64, String) {
        match &self.progress {
            Some(progress) => progress(),
            None => (0.0, String::new()),
        }
    }
}

impl Drop for Builtin {
    fn drop(&mut self) {
        self.close();
    }
}
