//! The escrow controller: lock, wait, release.
//!
//! One controller instance owns one custodial seat. The administrator mints
//! single-use lock invitations against it; a counterparty redeems one with a
//! shape-matching proposal, its collateral moves atomically into custody,
//! and an unlock wakeup is scheduled for the configured expiration time.
//! When the wakeup fires, the entire custodial holding moves back to the
//! depositor's seat, that seat exits, and the controller shuts down.
//!
//! # Session State Machine
//!
//! ```text
//! (invitation redeemed) --> Locked
//! Locked --wakeup fires, transfer out--> Released (controller shuts down)
//! Locked --counterparty exits its seat--> ExitedEarly (zero payout;
//!          the later wakeup is a logged no-op)
//! ```
//!
//! # Serialization
//!
//! All session transitions run under one mutex, so a lock action, a wakeup,
//! and an early exit never interleave their holding mutations. The release
//! reads the custodial allocation at fire time (a live read, not a lock-time
//! snapshot); this is safe because at most one depositor session may be
//! outstanding per controller instance — a second lock attempt while one is
//! outstanding is rejected.

mod error;
mod facets;
mod terms;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use error::ControllerError;
pub use facets::{CreatorFacet, DepositorFacet, PublicFacet};
pub use terms::Terms;

use crate::amount::Amount;
use crate::ledger::{AllocationMap, Designation, Ledger, Seat};
use crate::offer::{
    AmountBound, ExitConstraint, Invitation, KeywordConstraint, OfferHandler, Proposal,
    ProposalShape,
};
use crate::timer::{TimerService, Timestamp, WakeHandler};

/// Shutdown reason recorded once a session's collateral has been released.
const RELEASED_SHUTDOWN_REASON: &str = "Escrowed Collateral is now claimable.";

/// Identity of a depositor session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Phase of a depositor session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Collateral is in custody awaiting expiration.
    Locked,
    /// The wakeup fired and the payout transferred. Terminal.
    Released,
    /// The counterparty exited before expiration with zero payout. Terminal.
    ExitedEarly,
}

/// One successful lock action, tracked until settlement.
struct DepositorSession {
    id: SessionId,
    seat: Seat,
    phase: SessionPhase,
}

#[derive(Default)]
struct ControllerState {
    session: Option<DepositorSession>,
    shutdown_reason: Option<String>,
}

/// State shared between the facets, the lock handler, and the wakeup.
struct ControllerInner {
    terms: Terms,
    ledger: Ledger,
    timer: Arc<dyn TimerService>,
    custodial_seat: Seat,
    state: Mutex<ControllerState>,
}

impl ControllerInner {
    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Live read of the custodial Collateral allocation.
    fn custodial_collateral(&self) -> Amount {
        self.custodial_seat
            .amount_allocated(&Designation::collateral(), self.terms.collateral_amount.kind())
    }
}

/// Custom details published with each lock invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockDetails {
    /// The time at which the locked collateral becomes claimable.
    pub expiration_time: Timestamp,
}

/// Starts an escrow controller and returns its capability facets.
///
/// Opens the custodial seat and validates the terms against the timer's
/// current time. No invitation exists until the creator mints one.
///
/// # Errors
///
/// Returns [`ControllerError::ExpirationInPast`] if `terms.expiration_time`
/// is not strictly after the timer's current time.
pub fn start(
    terms: Terms,
    ledger: &Ledger,
    timer: Arc<dyn TimerService>,
) -> Result<(CreatorFacet, PublicFacet), ControllerError> {
    let now = timer.current();
    if terms.expiration_time <= now {
        return Err(ControllerError::ExpirationInPast {
            expiration: terms.expiration_time,
            now,
        });
    }
    let custodial_seat = ledger.open_seat();
    tracing::info!(
        collateral = %terms.collateral_amount,
        expiration = %terms.expiration_time,
        custodial_seat = %custodial_seat.id(),
        "escrow controller started"
    );
    let inner = Arc::new(ControllerInner {
        terms,
        ledger: ledger.clone(),
        timer,
        custodial_seat,
        state: Mutex::new(ControllerState::default()),
    });
    Ok((CreatorFacet::new(inner), PublicFacet))
}

/// Offer handler behind every lock invitation.
///
/// Not constructible outside the controller; counterparties only ever hold
/// it inside an [`Invitation`].
pub struct LockCollateralHandler {
    inner: Arc<ControllerInner>,
}

impl LockCollateralHandler {
    fn shape(&self) -> ProposalShape {
        ProposalShape {
            give: BTreeMap::from([(
                Designation::collateral(),
                AmountBound::Gte(self.inner.terms.collateral_amount.clone()),
            )]),
            want: KeywordConstraint::Empty,
            exit: ExitConstraint::Any,
        }
    }
}

impl OfferHandler for LockCollateralHandler {
    type Output = DepositorFacet;
    type Error = ControllerError;

    fn handle(&self, proposal: Proposal, seat: &Seat) -> Result<DepositorFacet, ControllerError> {
        let inner = &self.inner;
        let mut state = inner.lock_state();
        if let Some(reason) = &state.shutdown_reason {
            return Err(ControllerError::ControllerShutdown {
                reason: reason.clone(),
            });
        }
        if let Some(session) = &state.session {
            if session.phase == SessionPhase::Locked {
                return Err(ControllerError::CollateralAlreadyLocked {
                    session: session.id,
                });
            }
        }

        let collateral = Designation::collateral();
        let kind = inner.terms.collateral_amount.kind();
        // The shape already vetted the proposal; the seat must actually back
        // what the proposal declared.
        let declared = proposal
            .give
            .get(&collateral)
            .cloned()
            .unwrap_or_else(|| Amount::zero(kind.clone()));
        let available = seat.amount_allocated(&collateral, kind);
        if !available.gte(&declared)? {
            return Err(ControllerError::UnbackedProposal {
                declared,
                available,
            });
        }

        // Register the wakeup before moving funds: a wakeup for a lock that
        // then fails to transfer is a harmless stale fire, whereas locked
        // funds without a wakeup would be unreleasable.
        let session_id = SessionId::fresh();
        let waker = Arc::new(UnlockWaker {
            inner: Arc::downgrade(inner),
            session: session_id,
        });
        inner
            .timer
            .schedule_wakeup(inner.terms.expiration_time, waker)?;

        inner.ledger.atomic_transfer(
            seat,
            &inner.custodial_seat,
            &AllocationMap::from([(collateral, available.clone())]),
        )?;

        state.session = Some(DepositorSession {
            id: session_id,
            seat: seat.clone(),
            phase: SessionPhase::Locked,
        });
        tracing::info!(
            session = %session_id,
            amount = %available,
            expiration = %inner.terms.expiration_time,
            "collateral locked"
        );
        Ok(DepositorFacet::new(Arc::clone(inner)))
    }
}

/// Releases the custodial holding to its depositor when expiration passes.
struct UnlockWaker {
    inner: Weak<ControllerInner>,
    session: SessionId,
}

impl WakeHandler for UnlockWaker {
    fn wake(&self, fired_at: Timestamp) {
        let Some(inner) = self.inner.upgrade() else {
            tracing::warn!(session = %self.session, "wakeup fired after controller was dropped; ignoring");
            return;
        };
        let mut state = inner.lock_state();
        let Some(session) = state.session.as_mut() else {
            tracing::warn!(session = %self.session, "wakeup fired with no session on record; ignoring");
            return;
        };
        if session.id != self.session {
            tracing::warn!(
                session = %self.session,
                current = %session.id,
                "wakeup fired for a different session; ignoring"
            );
            return;
        }
        match session.phase {
            SessionPhase::Locked => {}
            SessionPhase::Released | SessionPhase::ExitedEarly => {
                tracing::warn!(session = %session.id, phase = ?session.phase, "duplicate wakeup for settled session; ignoring");
                return;
            }
        }

        // Live read: release whatever Collateral custody holds right now.
        let payout = inner.custodial_collateral();
        let transfer = inner.ledger.atomic_transfer(
            &inner.custodial_seat,
            &session.seat,
            &AllocationMap::from([(Designation::collateral(), payout.clone())]),
        );
        if let Err(error) = transfer {
            // The depositor exited early; the custodial holding stays put.
            tracing::warn!(session = %session.id, %error, "stale session event: release transfer rejected; treating as no-op");
            session.phase = SessionPhase::ExitedEarly;
            return;
        }
        if let Err(error) = session.seat.exit() {
            tracing::warn!(session = %session.id, %error, "depositor seat exited between payout and close");
        }
        session.phase = SessionPhase::Released;
        state.shutdown_reason = Some(RELEASED_SHUTDOWN_REASON.to_string());
        tracing::info!(
            session = %self.session,
            amount = %payout,
            fired_at = %fired_at,
            "collateral released; controller shut down"
        );
    }
}

impl CreatorFacet {
    /// Mints a fresh single-use invitation to lock collateral.
    ///
    /// Each call mints an independent invitation; every invitation shares
    /// the one custodial seat, and at most one lock may be outstanding at a
    /// time.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::ControllerShutdown`] once a session has
    /// settled and the controller shut down.
    pub fn make_lock_invitation(
        &self,
    ) -> Result<Invitation<LockCollateralHandler, LockDetails>, ControllerError> {
        let inner = self.inner();
        {
            let state = inner.lock_state();
            if let Some(reason) = &state.shutdown_reason {
                return Err(ControllerError::ControllerShutdown {
                    reason: reason.clone(),
                });
            }
        }
        let handler = Arc::new(LockCollateralHandler {
            inner: Arc::clone(inner),
        });
        let shape = handler.shape();
        let invitation = Invitation::new(
            handler,
            "lock collateral",
            LockDetails {
                expiration_time: inner.terms.expiration_time,
            },
            shape,
        );
        tracing::debug!(invitation = %invitation.id(), "lock invitation minted");
        Ok(invitation)
    }
}
