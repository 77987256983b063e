//! Controller instantiation terms.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::timer::Timestamp;

/// Immutable terms fixed at controller start.
///
/// The timer service itself is passed separately to [`super::start`]; these
/// are the pure-data terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terms {
    /// Minimum amount (and asset kind) a lock proposal must give.
    pub collateral_amount: Amount,
    /// The time at which locked collateral becomes claimable.
    pub expiration_time: Timestamp,
}
