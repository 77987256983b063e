//! Amount-specific error types.

use thiserror::Error;

/// Errors from amount arithmetic and comparison.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AmountError {
    /// Two amounts of different asset kinds were combined or compared.
    #[error("asset kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        /// Label of the expected kind.
        expected: String,
        /// Label of the kind actually supplied.
        found: String,
    },

    /// Addition overflowed `u128`.
    #[error("amount overflow: {lhs} + {rhs}")]
    Overflow {
        /// Left operand value.
        lhs: u128,
        /// Right operand value.
        rhs: u128,
    },

    /// Subtraction would produce a negative amount.
    #[error("amount underflow: {lhs} - {rhs}")]
    Underflow {
        /// Left operand value.
        lhs: u128,
        /// Right operand value.
        rhs: u128,
    },
}
