//! Ledger state and the atomic transfer primitive.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use super::designation::{AllocationMap, Designation};
use super::error::LedgerError;
use super::seat::{Seat, SeatId};
use crate::amount::Amount;

/// Backing record for one seat.
#[derive(Debug)]
pub(super) struct SeatRecord {
    pub(super) allocations: AllocationMap,
    pub(super) exited: bool,
    pub(super) payouts: AllocationMap,
    pub(super) settled_tx: watch::Sender<bool>,
}

/// State shared between the ledger handle and every seat handle.
#[derive(Debug, Default)]
pub(super) struct LedgerShared {
    seats: Mutex<HashMap<SeatId, SeatRecord>>,
}

impl LedgerShared {
    pub(super) fn seats(&self) -> MutexGuard<'_, HashMap<SeatId, SeatRecord>> {
        self.seats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to an in-memory asset ledger.
///
/// Cheap to clone; all clones share the same seat registry.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    shared: Arc<LedgerShared>,
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a fresh seat with no allocations.
    #[must_use]
    pub fn open_seat(&self) -> Seat {
        let (settled_tx, settled_rx) = watch::channel(false);
        let id = SeatId::fresh();
        self.shared.seats().insert(
            id,
            SeatRecord {
                allocations: AllocationMap::new(),
                exited: false,
                payouts: AllocationMap::new(),
                settled_tx,
            },
        );
        tracing::debug!(seat = %id, "seat opened");
        Seat::new(Arc::clone(&self.shared), id, settled_rx)
    }

    /// Issues `amount` onto `seat` under `designation`.
    ///
    /// This is the issuance surface tests and administrators use to fund a
    /// seat before locking; there is no corresponding burn.
    ///
    /// # Errors
    ///
    /// Fails if the seat is unknown or exited, or if the existing allocation
    /// under `designation` is of a different asset kind.
    pub fn mint(
        &self,
        seat: &Seat,
        designation: &Designation,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let mut seats = self.shared.seats();
        let record = seats
            .get_mut(&seat.id())
            .ok_or(LedgerError::SeatNotFound { seat: seat.id() })?;
        if record.exited {
            return Err(LedgerError::SeatExited { seat: seat.id() });
        }
        let updated = match record.allocations.get(designation) {
            Some(existing) => existing.checked_add(&amount)?,
            None => amount,
        };
        record.allocations.insert(designation.clone(), updated);
        Ok(())
    }

    /// Moves `allocations` from `from` to `to`, all-or-nothing.
    ///
    /// Every movement is validated against the current allocations of both
    /// seats before the first write, so a failed transfer has no effect.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::SelfTransfer`] if both handles name one seat
    /// - [`LedgerError::SeatNotFound`] / [`LedgerError::SeatExited`] for
    ///   either endpoint
    /// - [`LedgerError::InsufficientAllocation`] if the source does not
    ///   cover a requested amount
    /// - [`LedgerError::Amount`] on asset-kind mismatch or overflow
    pub fn atomic_transfer(
        &self,
        from: &Seat,
        to: &Seat,
        allocations: &AllocationMap,
    ) -> Result<(), LedgerError> {
        if from.id() == to.id() {
            return Err(LedgerError::SelfTransfer { seat: from.id() });
        }
        let mut seats = self.shared.seats();

        let from_record = seats
            .get(&from.id())
            .ok_or(LedgerError::SeatNotFound { seat: from.id() })?;
        if from_record.exited {
            return Err(LedgerError::SeatExited { seat: from.id() });
        }
        let to_record = seats
            .get(&to.id())
            .ok_or(LedgerError::SeatNotFound { seat: to.id() })?;
        if to_record.exited {
            return Err(LedgerError::SeatExited { seat: to.id() });
        }

        // Stage every updated allocation first; nothing is written until all
        // movements validate.
        let mut staged_from: Vec<(Designation, Amount)> = Vec::with_capacity(allocations.len());
        let mut staged_to: Vec<(Designation, Amount)> = Vec::with_capacity(allocations.len());
        for (designation, amount) in allocations {
            let available = from_record
                .allocations
                .get(designation)
                .cloned()
                .unwrap_or_else(|| Amount::zero(amount.kind().clone()));
            if !available.gte(amount)? {
                return Err(LedgerError::InsufficientAllocation {
                    seat: from.id(),
                    designation: designation.to_string(),
                    needed: amount.value(),
                    available: available.value(),
                });
            }
            let receiving = to_record
                .allocations
                .get(designation)
                .cloned()
                .unwrap_or_else(|| Amount::zero(amount.kind().clone()));
            staged_from.push((designation.clone(), available.checked_sub(amount)?));
            staged_to.push((designation.clone(), receiving.checked_add(amount)?));
        }

        if let Some(record) = seats.get_mut(&from.id()) {
            for (designation, amount) in staged_from {
                record.allocations.insert(designation, amount);
            }
        }
        if let Some(record) = seats.get_mut(&to.id()) {
            for (designation, amount) in staged_to {
                record.allocations.insert(designation, amount);
            }
        }
        tracing::debug!(from = %from.id(), to = %to.id(), "transfer applied");
        Ok(())
    }
}
