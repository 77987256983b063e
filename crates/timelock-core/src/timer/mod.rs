//! Logical time service and one-shot wakeups.
//!
//! The escrow controller never reads a wall clock. All time authority comes
//! from a [`TimerService`]: a monotonic logical timeline on which one-shot
//! callbacks ([`WakeHandler`]) can be scheduled for a future [`Timestamp`].
//!
//! # Contract
//!
//! - A scheduled wakeup fires **at most once**.
//! - A wakeup fires **at or after** its requested timestamp, never before.
//! - The timeline never moves backwards.
//!
//! [`ManualTimer`] is the in-process implementation: time advances only when
//! the holder calls [`ManualTimer::advance_to`] or [`ManualTimer::advance`],
//! which makes expiration scenarios deterministic in tests.

mod error;
mod manual;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use error::TimerError;
pub use manual::ManualTimer;

/// A point on a timer service's logical timeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Creates a timestamp from a raw tick value.
    #[must_use]
    pub const fn new(ticks: u64) -> Self {
        Self(ticks)
    }

    /// Returns the raw tick value.
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Returns this timestamp advanced by `ticks`, saturating at the
    /// timeline's end.
    #[must_use]
    pub const fn saturating_add(self, ticks: u64) -> Self {
        Self(self.0.saturating_add(ticks))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t={}", self.0)
    }
}

/// Identity of a scheduled wakeup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WakeupId(Uuid);

impl WakeupId {
    pub(crate) fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for WakeupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A one-shot callback invoked when its scheduled timestamp is reached.
///
/// `wake` receives the time at which the timer actually fired, which is
/// guaranteed to be at or after the scheduled timestamp.
pub trait WakeHandler: Send + Sync {
    /// Invoked once when the wakeup fires.
    fn wake(&self, fired_at: Timestamp);
}

/// A service that tracks logical time and schedules one-shot wakeups.
pub trait TimerService: Send + Sync {
    /// Returns the current time on this service's timeline.
    fn current(&self) -> Timestamp;

    /// Registers `handler` to fire once, at or after `at`.
    ///
    /// Wakeups scheduled at or before the current time are not invoked
    /// inline; they fire on the next timeline advance. This keeps handler
    /// invocation out of the scheduling call stack so handlers may take
    /// locks held by their scheduler.
    ///
    /// # Errors
    ///
    /// Implementations may reject registrations, e.g. when shut down.
    fn schedule_wakeup(
        &self,
        at: Timestamp,
        handler: Arc<dyn WakeHandler>,
    ) -> Result<WakeupId, TimerError>;
}
