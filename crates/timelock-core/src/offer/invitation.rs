//! Single-use invitation credentials.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::RedeemError;
use super::proposal::Proposal;
use super::shape::ProposalShape;
use crate::ledger::Seat;

/// Identity of a minted invitation, for diagnostics and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvitationId(Uuid);

impl InvitationId {
    pub(crate) fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for InvitationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Contract-side handler behind an invitation.
///
/// Runs only after the proposal has matched the invitation's shape. The
/// handler performs the contract's transfers against `seat` and produces the
/// capability returned to the redeeming counterparty.
pub trait OfferHandler: Send + Sync {
    /// Capability returned on a successful redemption.
    type Output;
    /// Handler failure type.
    type Error: std::error::Error + 'static;

    /// Executes the contract action for a shape-validated proposal.
    ///
    /// # Errors
    ///
    /// Handler-specific; a failure must leave `seat` untouched.
    fn handle(&self, proposal: Proposal, seat: &Seat) -> Result<Self::Output, Self::Error>;
}

/// A single-use credential authorizing one contract action.
///
/// Not cloneable: redemption consumes the invitation, so each minted
/// credential is honored at most once.
pub struct Invitation<H: OfferHandler, D = ()> {
    id: InvitationId,
    description: String,
    details: D,
    shape: ProposalShape,
    handler: Arc<H>,
}

impl<H: OfferHandler, D> Invitation<H, D> {
    pub(crate) fn new(
        handler: Arc<H>,
        description: impl Into<String>,
        details: D,
        shape: ProposalShape,
    ) -> Self {
        Self {
            id: InvitationId::fresh(),
            description: description.into(),
            details,
            shape,
            handler,
        }
    }

    /// Returns this invitation's identity.
    #[must_use]
    pub fn id(&self) -> InvitationId {
        self.id
    }

    /// Returns the human-readable description of the authorized action.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the custom details published with this invitation.
    #[must_use]
    pub fn details(&self) -> &D {
        &self.details
    }

    /// Returns the shape proposals must match.
    #[must_use]
    pub fn shape(&self) -> &ProposalShape {
        &self.shape
    }

    /// Redeems this invitation with `proposal`, drawing from and paying to
    /// `seat`.
    ///
    /// The invitation is consumed whether or not redemption succeeds.
    ///
    /// # Errors
    ///
    /// [`RedeemError::Schema`] if the proposal does not match the shape
    /// (nothing has run); [`RedeemError::Handler`] if the contract handler
    /// rejects the offer.
    pub fn redeem(
        self,
        proposal: Proposal,
        seat: &Seat,
    ) -> Result<H::Output, RedeemError<H::Error>> {
        self.shape.validate(&proposal)?;
        tracing::debug!(invitation = %self.id, description = %self.description, "invitation redeemed");
        self.handler
            .handle(proposal, seat)
            .map_err(RedeemError::Handler)
    }
}

impl<H: OfferHandler, D: std::fmt::Debug> std::fmt::Debug for Invitation<H, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invitation")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("details", &self.details)
            .finish_non_exhaustive()
    }
}
