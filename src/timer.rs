use crossbeam_channel::Receiver;
use std::time::{Duration, Instant};

/// Recurring, resettable deadline.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    deadline: Option<Instant>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: Some(Instant::now() + period),
        }
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn reset(&mut self) {
        self.deadline = Some(Instant::now() + self.period);
    }

    pub fn stop(&mut self) {
        self.deadline = None;
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.deadline.is_none()
    }

    /// Non-blocking check. Returns true once per elapsed period.
    pub fn fired(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.tick();
                true
            }
            _ => false,
        }
    }

    /// Receiver that delivers once the current deadline passes.
    pub fn channel(&self) -> Receiver<Instant> {
        match self.deadline {
            Some(deadline) => crossbeam_channel::at(deadline),
            None => crossbeam_channel::never(),
        }
    }

    pub fn tick(&mut self) {
        let Some(deadline) = self.deadline else {
            return;
        };

        let now = Instant::now();
        let next = deadline + self.period;
        // missed periods are dropped rather than queued
        self.deadline = Some(if next > now { next } else { now + self.period });
    }
}
