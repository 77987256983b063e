//! Unit tests for controller policy and edge behavior.

use std::sync::Arc;

use super::{ControllerError, Terms, start};
use crate::amount::{Amount, AssetKind};
use crate::ledger::{Designation, Ledger, Seat};
use crate::offer::{Proposal, RedeemError};
use crate::timer::{ManualTimer, Timestamp};

struct Setup {
    ledger: Ledger,
    kind: AssetKind,
    timer: Arc<ManualTimer>,
    creator: super::CreatorFacet,
}

fn setup() -> Setup {
    let ledger = Ledger::new();
    let kind = AssetKind::new("Moolah");
    let timer = Arc::new(ManualTimer::default());
    let terms = Terms {
        collateral_amount: Amount::new(kind.clone(), 1_000),
        expiration_time: Timestamp::new(5),
    };
    let (creator, _public) = start(terms, &ledger, timer.clone()).expect("valid terms");
    Setup {
        ledger,
        kind,
        timer,
        creator,
    }
}

fn funded_seat(s: &Setup, value: u128) -> Seat {
    let seat = s.ledger.open_seat();
    s.ledger
        .mint(
            &seat,
            &Designation::collateral(),
            Amount::new(s.kind.clone(), value),
        )
        .unwrap();
    seat
}

fn lock_proposal(s: &Setup, value: u128) -> Proposal {
    Proposal::giving(Designation::collateral(), Amount::new(s.kind.clone(), value))
}

#[test]
fn start_rejects_expiration_at_or_before_now() {
    let ledger = Ledger::new();
    let kind = AssetKind::new("Moolah");
    let timer = Arc::new(ManualTimer::default());
    timer.advance_to(Timestamp::new(5)).unwrap();

    let err = start(
        Terms {
            collateral_amount: Amount::new(kind, 1_000),
            expiration_time: Timestamp::new(5),
        },
        &ledger,
        timer,
    )
    .unwrap_err();
    assert!(matches!(err, ControllerError::ExpirationInPast { .. }));
}

#[test]
fn invitation_details_publish_expiration() {
    let s = setup();
    let invitation = s.creator.make_lock_invitation().unwrap();
    assert_eq!(invitation.details().expiration_time, Timestamp::new(5));
    assert_eq!(invitation.description(), "lock collateral");
}

#[test]
fn each_call_mints_an_independent_invitation() {
    let s = setup();
    let a = s.creator.make_lock_invitation().unwrap();
    let b = s.creator.make_lock_invitation().unwrap();
    assert_ne!(a.id(), b.id());
}

#[test]
fn second_lock_while_one_is_outstanding_is_rejected() {
    let s = setup();
    let first_seat = funded_seat(&s, 1_000);
    let second_seat = funded_seat(&s, 1_000);

    let first = s.creator.make_lock_invitation().unwrap();
    first.redeem(lock_proposal(&s, 1_000), &first_seat).unwrap();

    let second = s.creator.make_lock_invitation().unwrap();
    let err = second
        .redeem(lock_proposal(&s, 1_000), &second_seat)
        .unwrap_err();
    assert!(matches!(
        err,
        RedeemError::Handler(ControllerError::CollateralAlreadyLocked { .. })
    ));

    // The second counterparty's seat is untouched.
    assert_eq!(
        second_seat.amount_allocated(&Designation::collateral(), &s.kind),
        Amount::new(s.kind.clone(), 1_000)
    );
}

#[test]
fn proposal_unbacked_by_the_seat_is_rejected() {
    let s = setup();
    let seat = funded_seat(&s, 500);
    let invitation = s.creator.make_lock_invitation().unwrap();

    // The proposal passes the shape, but the seat cannot back it.
    let err = invitation
        .redeem(lock_proposal(&s, 1_000), &seat)
        .unwrap_err();
    assert!(matches!(
        err,
        RedeemError::Handler(ControllerError::UnbackedProposal { .. })
    ));
    assert_eq!(
        seat.amount_allocated(&Designation::collateral(), &s.kind),
        Amount::new(s.kind.clone(), 500)
    );
}

#[test]
fn operations_after_shutdown_are_rejected() {
    let s = setup();
    let seat = funded_seat(&s, 1_000);
    let invitation = s.creator.make_lock_invitation().unwrap();
    invitation.redeem(lock_proposal(&s, 1_000), &seat).unwrap();

    s.timer.advance_to(Timestamp::new(5)).unwrap();

    let err = s.creator.make_lock_invitation().unwrap_err();
    match err {
        ControllerError::ControllerShutdown { reason } => {
            assert_eq!(reason, "Escrowed Collateral is now claimable.");
        }
        other => panic!("expected shutdown, got {other:?}"),
    }
}

#[test]
fn locked_amount_is_a_live_read() {
    let s = setup();
    let seat = funded_seat(&s, 1_000);
    let invitation = s.creator.make_lock_invitation().unwrap();
    let facet = invitation.redeem(lock_proposal(&s, 1_000), &seat).unwrap();

    assert_eq!(facet.locked_amount(), Amount::new(s.kind.clone(), 1_000));

    s.timer.advance_to(Timestamp::new(5)).unwrap();
    // After release the custodial seat is empty; the facet reads zero.
    assert!(facet.locked_amount().is_zero());
}
