//! Access session aggregate.
//!
//! An access session is the ephemeral server-side record created when a
//! code is issued for a (proposal, email) pair. It is replaced whenever
//! a new code is requested, deleted on successful verification, and
//! treated as absent once expired. Expiry is enforced here, server-side,
//! never from client-supplied claims.

use crate::domain::foundation::{EmailAddress, ProposalId, Timestamp};

use super::one_time_code::CodeDigest;

/// Ephemeral verification record for one (proposal, email) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessSession {
    /// Proposal this session unlocks.
    proposal_id: ProposalId,

    /// Address the code was mailed to.
    email: EmailAddress,

    /// Keyed digest of the issued code. The raw code is never stored.
    code_digest: CodeDigest,

    /// When the code was issued.
    issued_at: Timestamp,

    /// When the code stops verifying.
    expires_at: Timestamp,

    /// Failed verification attempts against this session.
    attempts: u32,
}

impl AccessSession {
    /// Issue a new session valid for `ttl_secs` from now.
    pub fn issue(
        proposal_id: ProposalId,
        email: EmailAddress,
        code_digest: CodeDigest,
        ttl_secs: u64,
    ) -> Self {
        let issued_at = Timestamp::now();
        Self {
            proposal_id,
            email,
            code_digest,
            issued_at,
            expires_at: issued_at.plus_secs(ttl_secs),
            attempts: 0,
        }
    }

    /// Reconstitute a session from persistence.
    pub fn reconstitute(
        proposal_id: ProposalId,
        email: EmailAddress,
        code_digest: CodeDigest,
        issued_at: Timestamp,
        expires_at: Timestamp,
        attempts: u32,
    ) -> Self {
        Self {
            proposal_id,
            email,
            code_digest,
            issued_at,
            expires_at,
            attempts,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the proposal ID.
    pub fn proposal_id(&self) -> &ProposalId {
        &self.proposal_id
    }

    /// Returns the verified address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the stored code digest.
    pub fn code_digest(&self) -> &CodeDigest {
        &self.code_digest
    }

    /// Returns when the code was issued.
    pub fn issued_at(&self) -> &Timestamp {
        &self.issued_at
    }

    /// Returns when the code expires.
    pub fn expires_at(&self) -> &Timestamp {
        &self.expires_at
    }

    /// Returns the failed attempt count.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verification support
    // ─────────────────────────────────────────────────────────────────────────

    /// Checks whether the session has expired at the given instant.
    pub fn is_expired(&self, now: &Timestamp) -> bool {
        now.is_after(&self.expires_at)
    }

    /// Checks a candidate digest against the stored one in constant time.
    pub fn digest_matches(&self, candidate: &CodeDigest) -> bool {
        self.code_digest.matches(candidate)
    }

    /// Records a failed verification attempt, returning the new count.
    pub fn record_failed_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }

    /// Checks whether the failed-attempt budget is used up.
    pub fn attempts_exhausted(&self, max_attempts: u32) -> bool {
        self.attempts >= max_attempts
    }
}
