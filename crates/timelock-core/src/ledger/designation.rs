//! Allocation designations (keywords).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::LedgerError;
use crate::amount::Amount;

/// A map of designation to amount, as used in proposals, transfers, and
/// payouts.
pub type AllocationMap = BTreeMap<Designation, Amount>;

/// A keyword naming one allocation slot on a seat.
///
/// Designations follow the keyword convention of the offer layer: ASCII,
/// starting with an uppercase letter, alphanumeric thereafter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Designation(String);

impl Designation {
    /// Creates a designation after validating the keyword format.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidDesignation`] if `keyword` is empty,
    /// does not start with an ASCII uppercase letter, or contains
    /// non-alphanumeric characters.
    pub fn new(keyword: impl Into<String>) -> Result<Self, LedgerError> {
        let keyword = keyword.into();
        let mut chars = keyword.chars();
        let valid = match chars.next() {
            Some(first) => {
                first.is_ascii_uppercase() && chars.all(|c| c.is_ascii_alphanumeric())
            }
            None => false,
        };
        if valid {
            Ok(Self(keyword))
        } else {
            Err(LedgerError::InvalidDesignation { keyword })
        }
    }

    /// The conventional designation for escrowed collateral.
    #[must_use]
    pub fn collateral() -> Self {
        Self("Collateral".to_string())
    }

    /// Returns the keyword string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Designation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
