//! Proposal store port.
//!
//! Defines the contract for reading and countersigning the proposal
//! record. Proposal creation belongs to the editing flow and is not part
//! of this contract.

use crate::domain::foundation::{DomainError, ProposalId};
use crate::domain::proposal::Proposal;
use async_trait::async_trait;

/// Store port for the proposal record.
///
/// Implementations must make `update` a single atomic write: the
/// snapshot, signature reference, status, and signing time land together
/// or not at all, and only while the stored row is still unsigned. That
/// write is the one linearization point of the countersignature flow.
#[async_trait]
pub trait ProposalStore: Send + Sync {
    /// Find a proposal by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &ProposalId) -> Result<Option<Proposal>, DomainError>;

    /// Persist a countersigned proposal.
    ///
    /// # Errors
    ///
    /// - `AlreadySigned` if the stored row was signed concurrently
    /// - `ProposalNotFound` if the proposal no longer exists
    /// - `DatabaseError` on persistence failure
    async fn update(&self, proposal: &Proposal) -> Result<(), DomainError>;
}
