//! Recipient access flow.
//!
//! The view model a visitor walks through when opening a secured
//! proposal link: enter the address the proposal was sent to, enter the
//! mailed code, then view and countersign. Verification lives in the
//! session store; this type only tracks where the visitor stands within
//! one browsing session. A new visit starts over at the email screen.

use std::sync::Arc;

use serde::Serialize;

use crate::application::handlers::access::{
    RequestAccessCodeCommand, RequestAccessCodeHandler, RequestCodeOutcome, UnlockedProposal,
    VerifyAccessCodeCommand, VerifyAccessCodeHandler,
};
use crate::application::handlers::signature::{CountersignCommand, CountersignHandler};
use crate::domain::access::AccessError;
use crate::domain::foundation::ProposalId;

/// Where the visitor currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStage {
    AwaitingEmail,
    AwaitingCode,
    Verified,
}

enum FlowState {
    AwaitingEmail,
    AwaitingCode { email: String },
    Verified { email: String, proposal: UnlockedProposal },
}

/// A single visitor's progress through the verification flow.
///
/// Holds no credentials beyond the address the visitor already typed;
/// whether a code is live is always judged server-side against the
/// session store.
pub struct AccessFlow {
    proposal_id: ProposalId,
    state: FlowState,
    request_code: Arc<RequestAccessCodeHandler>,
    verify_code: Arc<VerifyAccessCodeHandler>,
    countersign: Arc<CountersignHandler>,
}

impl AccessFlow {
    /// Opens the flow for one proposal, starting at the email screen.
    pub fn open(
        proposal_id: ProposalId,
        request_code: Arc<RequestAccessCodeHandler>,
        verify_code: Arc<VerifyAccessCodeHandler>,
        countersign: Arc<CountersignHandler>,
    ) -> Self {
        Self {
            proposal_id,
            state: FlowState::AwaitingEmail,
            request_code,
            verify_code,
            countersign,
        }
    }

    pub fn proposal_id(&self) -> &ProposalId {
        &self.proposal_id
    }

    pub fn stage(&self) -> FlowStage {
        match &self.state {
            FlowState::AwaitingEmail => FlowStage::AwaitingEmail,
            FlowState::AwaitingCode { .. } => FlowStage::AwaitingCode,
            FlowState::Verified { .. } => FlowStage::Verified,
        }
    }

    /// The unlocked view, present only once the visitor has verified.
    pub fn proposal(&self) -> Option<&UnlockedProposal> {
        match &self.state {
            FlowState::Verified { proposal, .. } => Some(proposal),
            _ => None,
        }
    }

    /// Submits the visitor's address and requests a one-time code.
    ///
    /// On a granted request the flow moves to the code screen, even
    /// when email delivery failed. A rejected request leaves the flow
    /// where it stands.
    pub async fn submit_email(&mut self, email: &str) -> Result<RequestCodeOutcome, AccessError> {
        let outcome = self
            .request_code
            .handle(RequestAccessCodeCommand {
                proposal_id: self.proposal_id,
                email: email.to_string(),
            })
            .await?;

        if matches!(outcome, RequestCodeOutcome::Granted { .. }) {
            self.state = FlowState::AwaitingCode {
                email: email.to_string(),
            };
        }
        Ok(outcome)
    }

    /// Submits the mailed code.
    ///
    /// On a match the flow is verified and the unlocked proposal is
    /// returned. Any failure leaves the flow on the code screen; the
    /// visitor can retry or go `back` to restart.
    pub async fn submit_code(&mut self, code: &str) -> Result<UnlockedProposal, AccessError> {
        let FlowState::AwaitingCode { email } = &self.state else {
            return Err(AccessError::code_expired());
        };

        let unlocked = self
            .verify_code
            .handle(VerifyAccessCodeCommand {
                proposal_id: self.proposal_id,
                email: email.clone(),
                code: code.to_string(),
            })
            .await?;

        self.state = FlowState::Verified {
            email: email.clone(),
            proposal: unlocked.clone(),
        };
        Ok(unlocked)
    }

    /// Returns to the email screen, dropping everything entered so far.
    pub fn back(&mut self) {
        self.state = FlowState::AwaitingEmail;
    }

    /// Submits the drawn signature for a verified proposal.
    ///
    /// Returns the refreshed confirmation view with the new signature
    /// resolved to a fresh display URL.
    pub async fn submit_signature(
        &mut self,
        image_bytes: Vec<u8>,
    ) -> Result<UnlockedProposal, AccessError> {
        let FlowState::Verified { email, proposal } = &mut self.state else {
            return Err(AccessError::not_verified());
        };

        let result = self
            .countersign
            .handle(CountersignCommand {
                proposal_id: self.proposal_id,
                email: email.clone(),
                image_bytes,
            })
            .await?;

        // Refresh the held view for the confirmation screen. When URL
        // issuance failed, the stored reference stands in.
        let display_ref = result.signature_url.or_else(|| {
            result
                .proposal
                .counterparty_signature_ref()
                .map(str::to_string)
        });
        proposal.status = result.proposal.status();
        proposal.signed_at = result.proposal.signed_at().copied();
        proposal.content = proposal.content.with_display_refs(None, display_ref, None);
        Ok(proposal.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_serializes_snake_case() {
        let json = serde_json::to_string(&FlowStage::AwaitingEmail).unwrap();
        assert_eq!(json, "\"awaiting_email\"");
        let json = serde_json::to_string(&FlowStage::Verified).unwrap();
        assert_eq!(json, "\"verified\"");
    }
}
