//! Counterparty proposals.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::ledger::{AllocationMap, Designation};
use crate::timer::Timestamp;

/// How a counterparty may leave its seat before the contract settles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ExitRule {
    /// The counterparty may exit at any time.
    OnDemand,
    /// The counterparty waives its right to exit on its own.
    Waived,
    /// The counterparty may exit only once `deadline` has passed.
    AfterDeadline {
        /// Earliest self-exit time.
        deadline: Timestamp,
    },
}

/// A counterparty's declared intent when redeeming an invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Amounts the counterparty offers, by designation.
    pub give: AllocationMap,
    /// Amounts the counterparty demands in return, by designation.
    pub want: AllocationMap,
    /// The counterparty's exit condition.
    pub exit: ExitRule,
}

impl Proposal {
    /// A proposal that gives a single amount, wants nothing, and exits on
    /// demand.
    #[must_use]
    pub fn giving(designation: Designation, amount: Amount) -> Self {
        Self {
            give: AllocationMap::from([(designation, amount)]),
            ..Self::default()
        }
    }
}

impl Default for Proposal {
    fn default() -> Self {
        Self {
            give: AllocationMap::new(),
            want: AllocationMap::new(),
            exit: ExitRule::OnDemand,
        }
    }
}
