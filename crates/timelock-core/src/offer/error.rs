//! Offer-layer error types.

use thiserror::Error;

use crate::amount::{Amount, AmountError};

/// A proposal failed to match an invitation's shape.
///
/// Raised before any transfer; the counterparty's seat is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SchemaViolation {
    /// A required give designation is absent.
    #[error("proposal is missing required give designation {designation}")]
    MissingGive {
        /// The absent designation.
        designation: String,
    },

    /// The proposal gives under a designation the shape does not allow.
    #[error("proposal gives under unexpected designation {designation}")]
    UnexpectedGive {
        /// The unexpected designation.
        designation: String,
    },

    /// A given amount is below the shape's minimum.
    #[error("give under {designation} is below the minimum: required {required}, given {given}")]
    GiveBelowMinimum {
        /// The constrained designation.
        designation: String,
        /// The minimum the shape requires.
        required: Amount,
        /// The amount actually given.
        given: Amount,
    },

    /// The shape requires an empty want, but the proposal wants something.
    #[error("proposal must want nothing, but wants {count} designation(s)")]
    WantNotEmpty {
        /// Number of want entries present.
        count: usize,
    },

    /// Amount comparison failed, typically an asset-kind mismatch.
    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// Outcome of redeeming an invitation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RedeemError<E>
where
    E: std::error::Error + 'static,
{
    /// The proposal did not match the invitation's shape; nothing ran.
    #[error("proposal rejected: {0}")]
    Schema(#[from] SchemaViolation),

    /// The shape matched but the offer handler reported a failure.
    #[error("offer handler failed: {0}")]
    Handler(#[source] E),
}
