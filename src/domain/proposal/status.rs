//! ProposalStatus enum for tracking the countersignature lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a shared proposal.
///
/// The transition is monotonic: once a proposal is `Signed`
/// it never reverts to `Sent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    #[default]
    Sent,
    Signed,
}

impl ProposalStatus {
    /// Returns true if the proposal can still be countersigned.
    pub fn is_mutable(&self) -> bool {
        matches!(self, ProposalStatus::Sent)
    }

    /// Validates a transition from this status to another.
    ///
    /// Valid transitions:
    /// - Sent -> Signed
    pub fn can_transition_to(&self, target: &ProposalStatus) -> bool {
        use ProposalStatus::*;
        matches!((self, target), (Sent, Signed))
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProposalStatus::Sent => "Sent",
            ProposalStatus::Signed => "Signed",
        };
        write!(f, "{}", s)
    }
}
