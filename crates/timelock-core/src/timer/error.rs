//! Timer-specific error types.

use thiserror::Error;

use super::Timestamp;

/// Errors from timer operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TimerError {
    /// An advance would move the timeline backwards.
    #[error("cannot advance timer backwards: current {current}, requested {requested}")]
    AdvanceBackwards {
        /// The timer's current time.
        current: Timestamp,
        /// The requested (earlier) time.
        requested: Timestamp,
    },
}
