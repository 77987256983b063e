//! Proposals, proposal shapes, and single-use invitations.
//!
//! A counterparty never calls a contract directly. It holds an
//! [`Invitation`], presents a [`Proposal`] (what it gives, what it wants,
//! how it may exit) together with its funded [`crate::ledger::Seat`], and
//! the invitation validates the proposal against its [`ProposalShape`]
//! before any handler code or transfer runs.
//!
//! # Single Use
//!
//! [`Invitation::redeem`] consumes the invitation by value. There is no way
//! to clone one, so a credential authorizes at most one redemption attempt —
//! a rejected proposal burns the invitation and a fresh one must be minted.

mod error;
mod invitation;
mod proposal;
mod shape;


pub use error::{RedeemError, SchemaViolation};
pub use invitation::{Invitation, InvitationId, OfferHandler};
pub use proposal::{ExitRule, Proposal};
pub use shape::{AmountBound, ExitConstraint, KeywordConstraint, ProposalShape};
