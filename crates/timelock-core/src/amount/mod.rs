//! Fungible asset amounts with brand identity.
//!
//! An [`Amount`] pairs an [`AssetKind`] with a `u128` value. Asset kinds are
//! identity objects: two kinds are equal only if they originate from the
//! same [`AssetKind::new`] call, so amounts of distinct issues can never be
//! confused even when their labels collide.
//!
//! All arithmetic is checked. Cross-kind operations fail with
//! [`AmountError::KindMismatch`] instead of silently mixing assets.

mod error;


use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use error::AmountError;

/// Identity of a fungible asset issue.
///
/// Equality is by identity (`id`), not by label. The label exists for
/// display and diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetKind {
    id: Uuid,
    label: String,
}

impl AssetKind {
    /// Creates a new asset kind with a fresh identity.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
        }
    }

    /// Returns the display label of this kind.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// A quantity of one asset kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    kind: AssetKind,
    value: u128,
}

impl Amount {
    /// Creates an amount of `value` units of `kind`.
    #[must_use]
    pub const fn new(kind: AssetKind, value: u128) -> Self {
        Self { kind, value }
    }

    /// The zero amount of `kind`.
    #[must_use]
    pub const fn zero(kind: AssetKind) -> Self {
        Self { kind, value: 0 }
    }

    /// Returns the asset kind of this amount.
    #[must_use]
    pub const fn kind(&self) -> &AssetKind {
        &self.kind
    }

    /// Returns the raw value of this amount.
    #[must_use]
    pub const fn value(&self) -> u128 {
        self.value
    }

    /// Returns `true` if the value is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Checked addition of two amounts of the same kind.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::KindMismatch`] if the kinds differ, or
    /// [`AmountError::Overflow`] if the sum exceeds `u128::MAX`.
    pub fn checked_add(&self, other: &Self) -> Result<Self, AmountError> {
        self.require_same_kind(other)?;
        let value = self
            .value
            .checked_add(other.value)
            .ok_or(AmountError::Overflow {
                lhs: self.value,
                rhs: other.value,
            })?;
        Ok(Self::new(self.kind.clone(), value))
    }

    /// Checked subtraction of two amounts of the same kind.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::KindMismatch`] if the kinds differ, or
    /// [`AmountError::Underflow`] if `other` exceeds `self`.
    pub fn checked_sub(&self, other: &Self) -> Result<Self, AmountError> {
        self.require_same_kind(other)?;
        let value = self
            .value
            .checked_sub(other.value)
            .ok_or(AmountError::Underflow {
                lhs: self.value,
                rhs: other.value,
            })?;
        Ok(Self::new(self.kind.clone(), value))
    }

    /// Returns `true` if `self >= other`, comparing values of the same kind.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::KindMismatch`] if the kinds differ.
    pub fn gte(&self, other: &Self) -> Result<bool, AmountError> {
        self.require_same_kind(other)?;
        Ok(self.value >= other.value)
    }

    fn require_same_kind(&self, other: &Self) -> Result<(), AmountError> {
        if self.kind == other.kind {
            Ok(())
        } else {
            Err(AmountError::KindMismatch {
                expected: self.kind.label().to_string(),
                found: other.kind.label().to_string(),
            })
        }
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.value, self.kind)
    }
}
