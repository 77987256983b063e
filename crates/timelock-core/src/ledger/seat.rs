//! Seat handles: holdings, exit, and payout resolution.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

use super::designation::{AllocationMap, Designation};
use super::error::LedgerError;
use super::storage::LedgerShared;
use crate::amount::{Amount, AssetKind};

/// Identity of a seat within its ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatId(Uuid);

impl SeatId {
    pub(super) fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SeatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to one custodial position on the ledger.
///
/// Holding a `Seat` is the capability to read its allocations, exit it, and
/// collect its payouts. Clones refer to the same underlying seat.
#[derive(Debug, Clone)]
pub struct Seat {
    shared: Arc<LedgerShared>,
    id: SeatId,
    settled_rx: watch::Receiver<bool>,
}

impl Seat {
    pub(super) fn new(
        shared: Arc<LedgerShared>,
        id: SeatId,
        settled_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            shared,
            id,
            settled_rx,
        }
    }

    /// Returns this seat's identity.
    #[must_use]
    pub fn id(&self) -> SeatId {
        self.id
    }

    /// Returns the amount currently allocated under `designation`.
    ///
    /// A live read: the result reflects the allocation at this instant, not
    /// any earlier snapshot. Returns the zero amount of `kind` when no
    /// allocation exists under `designation`.
    #[must_use]
    pub fn amount_allocated(&self, designation: &Designation, kind: &AssetKind) -> Amount {
        self.shared
            .seats()
            .get(&self.id)
            .and_then(|record| record.allocations.get(designation).cloned())
            .unwrap_or_else(|| Amount::zero(kind.clone()))
    }

    /// Returns `true` once this seat has exited.
    #[must_use]
    pub fn is_exited(&self) -> bool {
        self.shared
            .seats()
            .get(&self.id)
            .is_some_and(|record| record.exited)
    }

    /// Exits this seat, freezing its current allocations as its payouts and
    /// waking any payout waiter.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::SeatExited`] if the seat already exited, or
    /// [`LedgerError::SeatNotFound`] if it is unknown to the ledger.
    pub fn exit(&self) -> Result<(), LedgerError> {
        let mut seats = self.shared.seats();
        let record = seats
            .get_mut(&self.id)
            .ok_or(LedgerError::SeatNotFound { seat: self.id })?;
        if record.exited {
            return Err(LedgerError::SeatExited { seat: self.id });
        }
        record.exited = true;
        record.payouts = std::mem::take(&mut record.allocations);
        record.settled_tx.send_replace(true);
        tracing::debug!(seat = %self.id, "seat exited");
        Ok(())
    }

    /// Returns the payouts if this seat has exited, `None` otherwise.
    #[must_use]
    pub fn try_payouts(&self) -> Option<AllocationMap> {
        let seats = self.shared.seats();
        let record = seats.get(&self.id)?;
        record.exited.then(|| record.payouts.clone())
    }

    /// Resolves with the payouts once this seat exits.
    ///
    /// Does not block past settlement: if the seat already exited, the
    /// payouts are returned immediately.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::SeatNotFound`] if the seat's backing record
    /// disappeared, which cannot happen while any handle to it is live.
    pub async fn payouts(&self) -> Result<AllocationMap, LedgerError> {
        let mut settled = self.settled_rx.clone();
        settled
            .wait_for(|done| *done)
            .await
            .map_err(|_| LedgerError::SeatNotFound { seat: self.id })?;
        Ok(self.try_payouts().unwrap_or_default())
    }

    /// Resolves with the payout under `designation` once this seat exits,
    /// zero of `kind` when the payout contains no such designation.
    ///
    /// # Errors
    ///
    /// Propagates [`Seat::payouts`] failures.
    pub async fn payout(
        &self,
        designation: &Designation,
        kind: &AssetKind,
    ) -> Result<Amount, LedgerError> {
        let payouts = self.payouts().await?;
        Ok(payouts
            .get(designation)
            .cloned()
            .unwrap_or_else(|| Amount::zero(kind.clone())))
    }
}
