//! VerifyAccessCodeHandler - exchanges a mailed code for the unlocked proposal.

use std::sync::Arc;

use secrecy::ExposeSecret;

use crate::application::asset_urls::AssetUrlService;
use crate::domain::access::{AccessError, CodeDigest, OneTimeCode};
use crate::domain::foundation::{EmailAddress, ProposalId, Timestamp};
use crate::domain::proposal::{Proposal, ProposalSnapshot, ProposalStatus};
use crate::ports::{AccessSessionStore, ProposalStore};

use super::AccessPolicy;

/// Command to verify a one-time access code.
#[derive(Debug, Clone)]
pub struct VerifyAccessCodeCommand {
    pub proposal_id: ProposalId,
    pub email: String,
    pub code: String,
}

/// A proposal prepared for rendering after successful verification.
///
/// Carries the row metadata the public page shows alongside the content
/// snapshot. Asset references inside `content` are already replaced by
/// display URLs.
#[derive(Debug, Clone)]
pub struct UnlockedProposal {
    pub id: ProposalId,
    pub status: ProposalStatus,
    pub serial_number: Option<i64>,
    pub client_name: Option<String>,
    pub proposal_number: Option<String>,
    pub signed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub content: ProposalSnapshot,
}

/// Handler for the code verification step.
pub struct VerifyAccessCodeHandler {
    proposals: Arc<dyn ProposalStore>,
    sessions: Arc<dyn AccessSessionStore>,
    asset_urls: Arc<AssetUrlService>,
    policy: AccessPolicy,
}

impl VerifyAccessCodeHandler {
    pub fn new(
        proposals: Arc<dyn ProposalStore>,
        sessions: Arc<dyn AccessSessionStore>,
        asset_urls: Arc<AssetUrlService>,
        policy: AccessPolicy,
    ) -> Self {
        Self {
            proposals,
            sessions,
            asset_urls,
            policy,
        }
    }

    pub async fn handle(
        &self,
        cmd: VerifyAccessCodeCommand,
    ) -> Result<UnlockedProposal, AccessError> {
        // 1. Normalize inputs. No session can exist for an unparseable
        //    address, and a malformed code can never match a digest.
        let email =
            EmailAddress::try_new(&cmd.email).map_err(|_| AccessError::code_expired())?;
        let code = OneTimeCode::try_new(&cmd.code, self.policy.code_length)
            .map_err(|_| AccessError::code_mismatch())?;

        // 2. Load the session. Absence and expiry read the same to the
        //    visitor; expired sessions are removed on observation.
        let mut session = self
            .sessions
            .find(&cmd.proposal_id, &email)
            .await?
            .ok_or_else(AccessError::code_expired)?;
        if session.is_expired(&Timestamp::now()) {
            self.sessions.delete(&cmd.proposal_id, &email).await?;
            return Err(AccessError::code_expired());
        }

        // 3. Compare digests. A wrong guess is charged against the
        //    session; exhausting the budget revokes it.
        let submitted = CodeDigest::compute(
            self.policy.code_secret.expose_secret().as_bytes(),
            &cmd.proposal_id,
            &email,
            &code,
        );
        if !session.digest_matches(&submitted) {
            session.record_failed_attempt();
            if session.attempts_exhausted(self.policy.max_attempts) {
                self.sessions.delete(&cmd.proposal_id, &email).await?;
                return Err(AccessError::too_many_attempts());
            }
            self.sessions.put(&session).await?;
            return Err(AccessError::code_mismatch());
        }

        // 4. Consume the session. A code verifies at most once.
        self.sessions.delete(&cmd.proposal_id, &email).await?;

        // 5. Load the proposal and re-check the recipient; a session
        //    issued before a reassignment is stale.
        let proposal = self
            .proposals
            .find_by_id(&cmd.proposal_id)
            .await?
            .ok_or(AccessError::ProposalNotFound(cmd.proposal_id))?;
        if !proposal.is_counterparty(&email) {
            return Err(AccessError::code_expired());
        }

        // 6. Swap asset references for display URLs and hand the full
        //    view back.
        Ok(self.unlock(proposal).await)
    }

    /// Builds the display view: signature and logo references resolved
    /// to fetchable URLs, row metadata lifted alongside the snapshot.
    async fn unlock(&self, proposal: Proposal) -> UnlockedProposal {
        let snapshot = proposal.content();

        let provider = self
            .asset_urls
            .display_url(snapshot.provider_signature_ref())
            .await;
        // Older rows carry the counterparty signature only on the row,
        // not inside the snapshot.
        let counterparty_ref = snapshot
            .counterparty_signature_ref()
            .or(proposal.counterparty_signature_ref());
        let counterparty = self.asset_urls.display_url(counterparty_ref).await;
        let logo = self.asset_urls.display_url(snapshot.logo_ref()).await;

        let content = snapshot.with_display_refs(provider, counterparty, logo);

        UnlockedProposal {
            id: *proposal.id(),
            status: proposal.status(),
            serial_number: proposal.serial_number(),
            client_name: proposal.client_name().map(str::to_string),
            proposal_number: proposal.proposal_number().map(str::to_string),
            signed_at: proposal.signed_at().copied(),
            created_at: *proposal.created_at(),
            content,
        }
    }
}
