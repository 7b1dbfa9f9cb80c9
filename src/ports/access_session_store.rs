//! Access session store port.
//!
//! Sessions are keyed by (proposal, email). `put` replaces, so at most
//! one code is live per pair and older codes stop verifying the moment
//! a new one is issued.

use crate::domain::access::AccessSession;
use crate::domain::foundation::{DomainError, EmailAddress, ProposalId};
use async_trait::async_trait;

/// Store port for ephemeral access sessions.
#[async_trait]
pub trait AccessSessionStore: Send + Sync {
    /// Store a session, replacing any existing one for the same pair.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn put(&self, session: &AccessSession) -> Result<(), DomainError>;

    /// Find the session for a (proposal, email) pair.
    ///
    /// Returns `None` if absent. Expiry is judged by the caller, not
    /// filtered here.
    async fn find(
        &self,
        proposal_id: &ProposalId,
        email: &EmailAddress,
    ) -> Result<Option<AccessSession>, DomainError>;

    /// Delete the session for a (proposal, email) pair.
    ///
    /// Deleting an absent session is not an error.
    async fn delete(
        &self,
        proposal_id: &ProposalId,
        email: &EmailAddress,
    ) -> Result<(), DomainError>;
}
