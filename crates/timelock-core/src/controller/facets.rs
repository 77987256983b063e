//! Capability facets returned by the controller.

use std::sync::Arc;

use super::ControllerInner;
use crate::amount::Amount;

/// Administrator capability: mints lock invitations.
///
/// See [`CreatorFacet::make_lock_invitation`] in the module root.
pub struct CreatorFacet {
    inner: Arc<ControllerInner>,
}

impl CreatorFacet {
    pub(super) fn new(inner: Arc<ControllerInner>) -> Self {
        Self { inner }
    }

    pub(super) fn inner(&self) -> &Arc<ControllerInner> {
        &self.inner
    }
}

impl std::fmt::Debug for CreatorFacet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreatorFacet").finish_non_exhaustive()
    }
}

/// Depositor capability returned from a successful lock.
///
/// Read-only: it grants no control over timing or release.
pub struct DepositorFacet {
    inner: Arc<ControllerInner>,
}

impl DepositorFacet {
    pub(super) fn new(inner: Arc<ControllerInner>) -> Self {
        Self { inner }
    }

    /// Returns the amount currently held in custody under `Collateral`.
    ///
    /// A live read of the custodial seat, not a value cached at lock time;
    /// after release it reads zero.
    #[must_use]
    pub fn locked_amount(&self) -> Amount {
        self.inner.custodial_collateral()
    }
}

impl std::fmt::Debug for DepositorFacet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DepositorFacet").finish_non_exhaustive()
    }
}

/// The controller's public surface: an empty marker by design.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublicFacet;
