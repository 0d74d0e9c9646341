//! Trailing debounce over a [`Scheduler`] timer.

use std::time::Duration;

use crate::scheduler::{Scheduler, TimerHandle};

/// Coalesces bursts of events into one delayed delivery of the latest value.
///
/// At most one timer is pending. Each [`trigger`](Self::trigger) clears it and
/// arms a fresh one, so the value is only released after `delay` passes with
/// no further triggers.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(TimerHandle, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record `value` and restart the quiet period.
    pub fn trigger<H: Scheduler + ?Sized>(&mut self, scheduler: &mut H, value: T) {
        if let Some((handle, _)) = self.pending.take() {
            scheduler.clear_timeout(handle);
        }
        let handle = scheduler.set_timeout(self.delay);
        self.pending = Some((handle, value));
    }

    /// Claim the value if `handle` is the armed timer.
    ///
    /// Returns `None` for stale or foreign handles.
    pub fn fire(&mut self, handle: TimerHandle) -> Option<T> {
        match self.pending.take() {
            Some((armed, value)) if armed == handle => Some(value),
            other => {
                self.pending = other;
                None
            }
        }
    }

    /// Drop the pending value and clear its timer.
    pub fn cancel<H: Scheduler + ?Sized>(&mut self, scheduler: &mut H) {
        if let Some((handle, _)) = self.pending.take() {
            scheduler.clear_timeout(handle);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_timer(&self) -> Option<TimerHandle> {
        self.pending.as_ref().map(|(handle, _)| *handle)
    }
}
