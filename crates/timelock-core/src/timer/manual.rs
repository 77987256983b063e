//! Manually advanced timer implementation.

use std::sync::{Arc, Mutex, PoisonError};

use super::{TimerError, TimerService, Timestamp, WakeHandler, WakeupId};

struct PendingWakeup {
    id: WakeupId,
    at: Timestamp,
    handler: Arc<dyn WakeHandler>,
}

struct TimerInner {
    now: Timestamp,
    pending: Vec<PendingWakeup>,
}

/// A [`TimerService`] whose timeline advances only on explicit request.
///
/// Due wakeups are removed from the pending set before their handler runs,
/// so each wakeup fires at most once even if an advance is repeated.
/// Handlers are invoked outside the timer's internal lock and may schedule
/// further wakeups; newly due ones are drained in the same advance.
pub struct ManualTimer {
    inner: Arc<Mutex<TimerInner>>,
}

impl ManualTimer {
    /// Creates a timer whose timeline starts at `start`.
    #[must_use]
    pub fn new(start: Timestamp) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TimerInner {
                now: start,
                pending: Vec::new(),
            })),
        }
    }

    /// Moves the timeline to `to` and fires every wakeup due at or before
    /// it, in timestamp order.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::AdvanceBackwards`] if `to` is before the
    /// current time. Advancing to the current time is a no-op that still
    /// fires any past-due wakeups.
    pub fn advance_to(&self, to: Timestamp) -> Result<(), TimerError> {
        {
            let mut inner = self.lock();
            if to < inner.now {
                return Err(TimerError::AdvanceBackwards {
                    current: inner.now,
                    requested: to,
                });
            }
            inner.now = to;
        }
        self.fire_due();
        Ok(())
    }

    /// Moves the timeline forward by `ticks`.
    ///
    /// # Errors
    ///
    /// Currently infallible in practice; shares the signature of
    /// [`ManualTimer::advance_to`].
    pub fn advance(&self, ticks: u64) -> Result<(), TimerError> {
        let to = self.lock().now.saturating_add(ticks);
        self.advance_to(to)
    }

    /// Returns the number of wakeups not yet fired.
    #[must_use]
    pub fn pending_wakeups(&self) -> usize {
        self.lock().pending.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TimerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drains and fires due wakeups until none remain. Handlers run outside
    /// the lock; a handler that schedules another already-due wakeup gets it
    /// fired in the same pass.
    fn fire_due(&self) {
        loop {
            let due = {
                let mut inner = self.lock();
                let now = inner.now;
                let mut due: Vec<PendingWakeup> = Vec::new();
                let mut remaining = Vec::with_capacity(inner.pending.len());
                for wakeup in inner.pending.drain(..) {
                    if wakeup.at <= now {
                        due.push(wakeup);
                    } else {
                        remaining.push(wakeup);
                    }
                }
                inner.pending = remaining;
                due.sort_by_key(|w| w.at);
                due
            };
            if due.is_empty() {
                return;
            }
            let now = self.current();
            for wakeup in due {
                tracing::debug!(wakeup_id = %wakeup.id, scheduled_for = %wakeup.at, fired_at = %now, "firing wakeup");
                wakeup.handler.wake(now);
            }
        }
    }
}

impl Default for ManualTimer {
    fn default() -> Self {
        Self::new(Timestamp::default())
    }
}

impl TimerService for ManualTimer {
    fn current(&self) -> Timestamp {
        self.lock().now
    }

    fn schedule_wakeup(
        &self,
        at: Timestamp,
        handler: Arc<dyn WakeHandler>,
    ) -> Result<WakeupId, TimerError> {
        let id = WakeupId::fresh();
        let mut inner = self.lock();
        tracing::debug!(wakeup_id = %id, at = %at, now = %inner.now, "wakeup scheduled");
        inner.pending.push(PendingWakeup { id, at, handler });
        Ok(id)
    }
}
