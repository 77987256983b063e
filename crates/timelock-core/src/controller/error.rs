//! Controller-specific error types.

use thiserror::Error;

use super::SessionId;
use crate::amount::{Amount, AmountError};
use crate::ledger::LedgerError;
use crate::timer::{TimerError, Timestamp};

/// Errors from starting the controller or locking collateral.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ControllerError {
    /// The configured expiration is not after the timer's current time.
    #[error("expiration {expiration} is not after the current time {now}")]
    ExpirationInPast {
        /// The configured expiration time.
        expiration: Timestamp,
        /// The timer's current time at start.
        now: Timestamp,
    },

    /// The controller has shut down; no further operations are accepted.
    #[error("controller has shut down: {reason}")]
    ControllerShutdown {
        /// Human-readable shutdown reason.
        reason: String,
    },

    /// A lock is already outstanding on this controller instance.
    #[error("collateral is already locked under session {session}")]
    CollateralAlreadyLocked {
        /// The outstanding session.
        session: SessionId,
    },

    /// The proposal declared more collateral than its seat holds.
    #[error("proposal declares {declared} but the seat holds {available}")]
    UnbackedProposal {
        /// Amount the proposal declared under give.
        declared: Amount,
        /// Amount actually allocated on the seat.
        available: Amount,
    },

    /// Amount arithmetic failed (asset-kind mismatch or overflow).
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// The ledger rejected a transfer; nothing moved.
    #[error("transfer failed: {0}")]
    Transfer(#[from] LedgerError),

    /// The time service rejected the wakeup registration.
    #[error("wakeup registration failed: {0}")]
    Timer(#[from] TimerError),
}
