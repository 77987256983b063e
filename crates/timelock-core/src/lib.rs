//! Time-locked collateral escrow kernel.
//!
//! This crate implements a single-purpose escrow: a depositor locks a
//! quantity of a fungible asset in a custodial seat, and that asset becomes
//! claimable by the depositor (and only the depositor) once a configured
//! expiration time passes on the time service's clock. Until then the
//! holding is frozen.
//!
//! # Architecture
//!
//! ```text
//! CreatorFacet --mints--> Invitation --redeem(proposal, seat)-->
//!     EscrowController --atomic transfer--> custodial Seat
//!           |
//!      schedule_wakeup(expiration)
//!           |
//!      UnlockWakeup --atomic transfer--> depositor Seat --exit--> payout
//! ```
//!
//! # Components
//!
//! - [`amount`]: fungible asset values with brand identity and checked
//!   arithmetic
//! - [`ledger`]: custodial seats, designation-keyed allocations, and the
//!   all-or-nothing transfer primitive
//! - [`timer`]: the logical time service and its manually advanced test
//!   implementation
//! - [`offer`]: proposals, machine-checkable proposal shapes, and single-use
//!   invitations
//! - [`controller`]: the escrow state machine and its capability facets
//!
//! # Access Model
//!
//! All authority is carried by typed capability objects. The administrator
//! holds a [`controller::CreatorFacet`] and can mint invitations; a
//! counterparty holds an [`offer::Invitation`] and a [`ledger::Seat`]; after
//! locking it holds a read-only [`controller::DepositorFacet`]. No operation
//! is reachable without the corresponding capability.

pub mod amount;
pub mod controller;
pub mod ledger;
pub mod offer;
pub mod timer;
