//! Ledger-specific error types.

use thiserror::Error;

use super::SeatId;
use crate::amount::AmountError;

/// Errors from seat and transfer operations.
///
/// Any of these reported from a transfer means nothing moved: transfers are
/// validated in full before the first write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LedgerError {
    /// The seat is not registered with this ledger.
    #[error("seat not found: {seat}")]
    SeatNotFound {
        /// The unknown seat.
        seat: SeatId,
    },

    /// The seat has already exited and can no longer participate in
    /// transfers.
    #[error("seat {seat} has already exited")]
    SeatExited {
        /// The exited seat.
        seat: SeatId,
    },

    /// A transfer requested more than the source seat has allocated.
    #[error(
        "insufficient allocation on seat {seat} under {designation}: needed {needed}, available {available}"
    )]
    InsufficientAllocation {
        /// The source seat.
        seat: SeatId,
        /// The designation being drawn from.
        designation: String,
        /// The value the transfer required.
        needed: u128,
        /// The value actually allocated.
        available: u128,
    },

    /// Source and destination of a transfer are the same seat.
    #[error("transfer source and destination are the same seat: {seat}")]
    SelfTransfer {
        /// The offending seat.
        seat: SeatId,
    },

    /// A designation keyword failed validation.
    #[error("invalid designation keyword: {keyword:?}")]
    InvalidDesignation {
        /// The rejected keyword.
        keyword: String,
    },

    /// Amount arithmetic failed (kind mismatch or overflow).
    #[error(transparent)]
    Amount(#[from] AmountError),
}
