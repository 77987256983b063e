//! End-to-end escrow lifecycle: lock, wait, release, and the early paths.
//!
//! Exercises the controller through its public capability surfaces only,
//! the way a host environment would: the administrator holds a
//! `CreatorFacet`, the counterparty holds a funded `Seat` and an
//! `Invitation`.

use std::sync::Arc;

use proptest::prelude::*;
use timelock_core::amount::{Amount, AssetKind};
use timelock_core::controller::{self, ControllerError, CreatorFacet, Terms};
use timelock_core::ledger::{Designation, Ledger, Seat};
use timelock_core::offer::{Proposal, RedeemError};
use timelock_core::timer::{ManualTimer, Timestamp};

const EXPIRATION: Timestamp = Timestamp::new(5);

struct Harness {
    ledger: Ledger,
    moolah: AssetKind,
    timer: Arc<ManualTimer>,
    creator: CreatorFacet,
}

fn harness(collateral: u128) -> Harness {
    let ledger = Ledger::new();
    let moolah = AssetKind::new("Moolah");
    let timer = Arc::new(ManualTimer::default());
    let terms = Terms {
        collateral_amount: Amount::new(moolah.clone(), collateral),
        expiration_time: EXPIRATION,
    };
    let (creator, _public) =
        controller::start(terms, &ledger, timer.clone()).expect("terms are valid");
    Harness {
        ledger,
        moolah,
        timer,
        creator,
    }
}

impl Harness {
    fn funded_seat(&self, value: u128) -> Seat {
        let seat = self.ledger.open_seat();
        self.ledger
            .mint(
                &seat,
                &Designation::collateral(),
                Amount::new(self.moolah.clone(), value),
            )
            .expect("minting onto a fresh seat succeeds");
        seat
    }

    fn proposal(&self, give: u128) -> Proposal {
        Proposal::giving(
            Designation::collateral(),
            Amount::new(self.moolah.clone(), give),
        )
    }

    fn moolah(&self, value: u128) -> Amount {
        Amount::new(self.moolah.clone(), value)
    }
}

#[tokio::test]
async fn lock_and_claim_after_expiration() {
    let h = harness(1_000);
    let seat = h.funded_seat(1_000);

    let invitation = h.creator.make_lock_invitation().unwrap();
    let facet = invitation.redeem(h.proposal(1_000), &seat).unwrap();

    // Immediately after locking, custody holds the full deposit.
    assert_eq!(facet.locked_amount(), h.moolah(1_000));
    assert!(
        seat.amount_allocated(&Designation::collateral(), &h.moolah)
            .is_zero()
    );

    h.timer.advance_to(EXPIRATION).unwrap();

    let paid = seat
        .payout(&Designation::collateral(), &h.moolah)
        .await
        .unwrap();
    assert_eq!(paid, h.moolah(1_000));
    assert!(facet.locked_amount().is_zero());
}

#[tokio::test]
async fn claim_before_expiration_yields_zero() {
    let h = harness(1_000);
    let seat = h.funded_seat(1_000);

    let invitation = h.creator.make_lock_invitation().unwrap();
    let facet = invitation.redeem(h.proposal(1_000), &seat).unwrap();

    // One tick short of expiration: nothing has been released.
    h.timer.advance_to(Timestamp::new(4)).unwrap();
    assert_eq!(facet.locked_amount(), h.moolah(1_000));

    // The counterparty gives up and exits; the payout resolves as zero
    // rather than blocking until expiration.
    seat.exit().unwrap();
    let paid = seat
        .payout(&Designation::collateral(), &h.moolah)
        .await
        .unwrap();
    assert!(paid.is_zero());
}

#[tokio::test]
async fn early_exit_then_wakeup_is_a_benign_no_op() {
    let h = harness(1_000);
    let seat = h.funded_seat(1_000);

    let invitation = h.creator.make_lock_invitation().unwrap();
    let facet = invitation.redeem(h.proposal(1_000), &seat).unwrap();

    h.timer.advance_to(Timestamp::new(4)).unwrap();
    seat.exit().unwrap();

    // The wakeup fires against the settled session and must not panic,
    // double-pay, or drain custody.
    h.timer.advance_to(EXPIRATION).unwrap();

    let paid = seat
        .payout(&Designation::collateral(), &h.moolah)
        .await
        .unwrap();
    assert!(paid.is_zero());
    assert_eq!(facet.locked_amount(), h.moolah(1_000));
}

#[test]
fn schema_rejection_happens_before_any_transfer() {
    let h = harness(1_000);
    let seat = h.funded_seat(999);

    let invitation = h.creator.make_lock_invitation().unwrap();
    let err = invitation.redeem(h.proposal(999), &seat).unwrap_err();
    assert!(matches!(err, RedeemError::Schema(_)));

    // The counterparty's seat is untouched.
    assert_eq!(
        seat.amount_allocated(&Designation::collateral(), &h.moolah),
        h.moolah(999)
    );
}

#[tokio::test]
async fn wakeup_triggers_at_most_one_release() {
    let h = harness(1_000);
    let seat = h.funded_seat(1_000);

    let invitation = h.creator.make_lock_invitation().unwrap();
    invitation.redeem(h.proposal(1_000), &seat).unwrap();

    // Repeated advances past expiration must not produce a second payout.
    h.timer.advance_to(EXPIRATION).unwrap();
    h.timer.advance_to(Timestamp::new(20)).unwrap();
    h.timer.advance(100).unwrap();

    let paid = seat
        .payout(&Designation::collateral(), &h.moolah)
        .await
        .unwrap();
    assert_eq!(paid, h.moolah(1_000));
    assert_eq!(h.timer.pending_wakeups(), 0);
}

#[test]
fn give_above_minimum_locks_the_full_deposit() {
    let h = harness(1_000);
    let seat = h.funded_seat(2_500);

    let invitation = h.creator.make_lock_invitation().unwrap();
    let facet = invitation.redeem(h.proposal(2_500), &seat).unwrap();
    assert_eq!(facet.locked_amount(), h.moolah(2_500));
}

#[test]
fn redeem_after_settlement_is_rejected() {
    let h = harness(1_000);
    let seat = h.funded_seat(1_000);

    let invitation = h.creator.make_lock_invitation().unwrap();
    // Minted before settlement, redeemed after: the controller is gone.
    let late_invitation = h.creator.make_lock_invitation().unwrap();

    invitation.redeem(h.proposal(1_000), &seat).unwrap();
    h.timer.advance_to(EXPIRATION).unwrap();

    let second_seat = h.funded_seat(1_000);
    let err = late_invitation
        .redeem(h.proposal(1_000), &second_seat)
        .unwrap_err();
    assert!(matches!(
        err,
        RedeemError::Handler(ControllerError::ControllerShutdown { .. })
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: the custodial balance equals locked minus released at every
    /// observable point, for any deposit meeting the minimum.
    #[test]
    fn prop_custody_equals_locked_minus_released(give in 1_000u128..1_000_000_000u128) {
        let h = harness(1_000);
        let seat = h.funded_seat(give);

        let invitation = h.creator.make_lock_invitation().unwrap();
        let facet = invitation.redeem(h.proposal(give), &seat).unwrap();

        // After locking: custody == locked sum.
        prop_assert_eq!(facet.locked_amount(), h.moolah(give));

        h.timer.advance_to(EXPIRATION).unwrap();

        // After release: custody == locked - released == 0, and the payout
        // is exactly what was locked.
        prop_assert!(facet.locked_amount().is_zero());
        let payouts = seat.try_payouts().expect("seat settled by release");
        prop_assert_eq!(
            payouts.get(&Designation::collateral()),
            Some(&h.moolah(give))
        );
    }
}
