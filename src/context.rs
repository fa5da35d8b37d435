//! Cancellable lifetime contexts.
//!
//! A [`Context`] exposes its cancellation as a crossbeam receiver so it can
//! take part in `select!` next to other channels. The receiver never yields a
//! value; it disconnects when the context is cancelled, which makes every
//! pending and future `recv` on it return immediately.
//!
//! Contexts form a tree. Cancelling a context cancels every context derived
//! from it, never its parent.

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

/// Cancels the [`Context`] it was created with. Cloneable and idempotent.
#[derive(Clone)]
pub struct CancelHandle {
    inner: Arc<Inner>,
}

struct Inner {
    done: Receiver<()>,
    state: Mutex<State>,
    // keeps ancestors alive so their cancellation still reaches us
    _parent: Option<Arc<Inner>>,
}

struct State {
    // dropping it disconnects `done`
    trigger: Option<Sender<()>>,
    children: Vec<Weak<Inner>>,
}

impl Context {
    /// A context that is never cancelled.
    pub fn background() -> Self {
        Self {
            inner: Inner::new(None),
        }
    }

    /// Derives a child context plus the handle that cancels it.
    ///
    /// If `self` is already cancelled the child starts out cancelled.
    pub fn with_cancel(&self) -> (Context, CancelHandle) {
        let child = Inner::new(Some(self.inner.clone()));

        let mut state = self.inner.lock();
        if state.trigger.is_some() {
            state.children.retain(|c| c.strong_count() > 0);
            state.children.push(Arc::downgrade(&child));
            drop(state);
        } else {
            drop(state);
            child.cancel();
        }

        (
            Context {
                inner: child.clone(),
            },
            CancelHandle { inner: child },
        )
    }

    /// Receiver that becomes ready (disconnected) once the context is cancelled.
    #[inline]
    pub fn done(&self) -> &Receiver<()> {
        &self.inner.done
    }

    pub fn is_done(&self) -> bool {
        matches!(self.inner.done.try_recv(), Err(TryRecvError::Disconnected))
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("done", &self.is_done())
            .finish()
    }
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.inner.cancel();
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelHandle").finish_non_exhaustive()
    }
}

impl Inner {
    fn new(parent: Option<Arc<Inner>>) -> Arc<Self> {
        let (trigger, done) = crossbeam_channel::bounded(0);
        Arc::new(Self {
            done,
            state: Mutex::new(State {
                trigger: Some(trigger),
                children: Vec::new(),
            }),
            _parent: parent,
        })
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cancel(&self) {
        let (trigger, children) = {
            let mut state = self.lock();
            (state.trigger.take(), std::mem::take(&mut state.children))
        };

        // already cancelled
        if trigger.is_none() {
            return;
        }
        drop(trigger);

        for child in children.iter().filter_map(Weak::upgrade) {
            child.cancel();
        }
    }
}
