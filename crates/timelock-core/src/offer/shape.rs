//! Machine-checkable proposal shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::SchemaViolation;
use super::proposal::Proposal;
use crate::amount::Amount;
use crate::ledger::Designation;

/// Constraint on a single give entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AmountBound {
    /// The given amount must be at least this amount, of the same kind.
    Gte(Amount),
    /// Any amount is acceptable.
    Any,
}

/// Constraint on a whole keyword record (the want side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum KeywordConstraint {
    /// The record must be empty.
    Empty,
    /// Any record is acceptable.
    Any,
}

/// Constraint on the proposal's exit rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ExitConstraint {
    /// Any exit rule is acceptable.
    Any,
}

/// The schema a proposal must match before an invitation's handler runs.
///
/// Give entries are matched exactly: every constrained designation must be
/// present (unless its bound is [`AmountBound::Any`]) and no designation
/// outside the shape may appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalShape {
    /// Per-designation bounds on the give side.
    pub give: BTreeMap<Designation, AmountBound>,
    /// Constraint on the want side.
    pub want: KeywordConstraint,
    /// Constraint on the exit rule.
    pub exit: ExitConstraint,
}

impl ProposalShape {
    /// Checks `proposal` against this shape.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaViolation`] found; validation performs no
    /// transfers and has no side effects.
    pub fn validate(&self, proposal: &Proposal) -> Result<(), SchemaViolation> {
        for (designation, bound) in &self.give {
            match (bound, proposal.give.get(designation)) {
                (AmountBound::Any, _) => {}
                (AmountBound::Gte(_), None) => {
                    return Err(SchemaViolation::MissingGive {
                        designation: designation.to_string(),
                    });
                }
                (AmountBound::Gte(minimum), Some(given)) => {
                    if !given.gte(minimum)? {
                        return Err(SchemaViolation::GiveBelowMinimum {
                            designation: designation.to_string(),
                            required: minimum.clone(),
                            given: given.clone(),
                        });
                    }
                }
            }
        }
        if let Some(designation) = proposal
            .give
            .keys()
            .find(|designation| !self.give.contains_key(*designation))
        {
            return Err(SchemaViolation::UnexpectedGive {
                designation: designation.to_string(),
            });
        }
        match self.want {
            KeywordConstraint::Empty if !proposal.want.is_empty() => {
                return Err(SchemaViolation::WantNotEmpty {
                    count: proposal.want.len(),
                });
            }
            KeywordConstraint::Empty | KeywordConstraint::Any => {}
        }
        match self.exit {
            ExitConstraint::Any => {}
        }
        Ok(())
    }
}
