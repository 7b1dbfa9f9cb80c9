//! RequestAccessCodeHandler - issues one-time codes for proposal access.

use std::sync::Arc;

use secrecy::ExposeSecret;

use crate::domain::access::{AccessError, AccessSession, CodeDigest, OneTimeCode};
use crate::domain::foundation::{EmailAddress, ProposalId};
use crate::ports::{
    AccessSessionStore, MailSender, ProposalStore, RequestThrottle, ThrottleKey, ThrottleResult,
};

use super::AccessPolicy;

/// Reply for any request that cannot be matched to a recipient.
///
/// Missing proposals and mismatched addresses share one message so the
/// endpoint cannot be probed for which addresses a proposal was sent to.
const NOT_RECOGNIZED: &str = "Email not recognized for this document";

const CODE_EMAIL_SUBJECT: &str = "Your secure access code";

/// Command to request a one-time access code.
#[derive(Debug, Clone)]
pub struct RequestAccessCodeCommand {
    pub proposal_id: ProposalId,
    /// The address the visitor claims the proposal was sent to, as typed.
    pub email: String,
}

/// Outcome of a code request.
///
/// A rejection is a normal outcome, not an error: its message is safe
/// to display and deliberately identical for every unmatchable request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestCodeOutcome {
    /// A code was issued and delivery attempted.
    Granted {
        /// The issued code, present only under a revealing policy
        /// (local development). Production policy keeps this `None`.
        debug_code: Option<String>,
    },
    /// The request was refused with a displayable message.
    Rejected { message: String },
}

impl RequestCodeOutcome {
    fn rejected() -> Self {
        Self::Rejected {
            message: NOT_RECOGNIZED.to_string(),
        }
    }
}

/// Handler for issuing one-time access codes.
pub struct RequestAccessCodeHandler {
    proposals: Arc<dyn ProposalStore>,
    sessions: Arc<dyn AccessSessionStore>,
    mailer: Arc<dyn MailSender>,
    throttle: Arc<dyn RequestThrottle>,
    policy: AccessPolicy,
}

impl RequestAccessCodeHandler {
    pub fn new(
        proposals: Arc<dyn ProposalStore>,
        sessions: Arc<dyn AccessSessionStore>,
        mailer: Arc<dyn MailSender>,
        throttle: Arc<dyn RequestThrottle>,
        policy: AccessPolicy,
    ) -> Self {
        Self {
            proposals,
            sessions,
            mailer,
            throttle,
            policy,
        }
    }

    pub async fn handle(
        &self,
        cmd: RequestAccessCodeCommand,
    ) -> Result<RequestCodeOutcome, AccessError> {
        // 1. Normalize the address. An unparseable one can never match a
        //    recipient, so it gets the standard rejection.
        let email = match EmailAddress::try_new(&cmd.email) {
            Ok(email) => email,
            Err(_) => return Ok(RequestCodeOutcome::rejected()),
        };

        // 2. Throttle before any lookup. Matching and non-matching
        //    addresses are charged the same, so request counts leak
        //    nothing about recipients.
        let key = ThrottleKey::code_request(&cmd.proposal_id, &email);
        if let ThrottleResult::Denied(denied) = self.throttle.check(key).await? {
            return Err(AccessError::throttled(denied.retry_after_secs));
        }

        // 3. Match the address against the proposal. A missing proposal
        //    and a wrong address produce identical outcomes.
        let proposal = match self.proposals.find_by_id(&cmd.proposal_id).await? {
            Some(proposal) => proposal,
            None => return Ok(RequestCodeOutcome::rejected()),
        };
        if !proposal.is_counterparty(&email) {
            return Ok(RequestCodeOutcome::rejected());
        }

        // 4. Issue a fresh code and store its digest, replacing any
        //    earlier session for this proposal and address. Only the
        //    most recent code can ever verify.
        let code = OneTimeCode::generate(self.policy.code_length);
        let digest = CodeDigest::compute(
            self.policy.code_secret.expose_secret().as_bytes(),
            &cmd.proposal_id,
            &email,
            &code,
        );
        let session = AccessSession::issue(
            cmd.proposal_id,
            email.clone(),
            digest,
            self.policy.code_ttl_secs,
        );
        self.sessions.put(&session).await?;

        // 5. Deliver the code. The flow advances even when delivery
        //    fails; the visitor can retry from the code screen.
        let body = code_email_body(code.as_str(), self.policy.code_ttl_secs);
        if let Err(err) = self.mailer.send(&email, CODE_EMAIL_SUBJECT, &body).await {
            tracing::warn!(
                proposal_id = %cmd.proposal_id,
                error = %err,
                "Access code email delivery failed"
            );
        }

        // 6. Hand the code back only under a revealing policy.
        let debug_code = self
            .policy
            .reveal_code
            .then(|| code.as_str().to_string());
        Ok(RequestCodeOutcome::Granted { debug_code })
    }
}

fn code_email_body(code: &str, ttl_secs: u64) -> String {
    let minutes = ttl_secs.div_ceil(60).max(1);
    format!(
        "<div style=\"font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; \
         max-width: 480px; margin: 40px auto; text-align: center;\">\
         <h2 style=\"color: #1a1a1a;\">Secure document access</h2>\
         <p style=\"color: #666;\">You were invited to view a secured proposal.<br>\
         Use this one-time code:</p>\
         <p style=\"font-size: 38px; letter-spacing: 8px; font-family: 'Courier New', monospace; \
         color: #D4AF37; border: 2px solid #D4AF37; border-radius: 12px; \
         display: inline-block; padding: 20px 25px;\">{code}</p>\
         <p style=\"font-size: 13px; color: #999;\">This code is valid for {minutes} minutes.</p>\
         </div>"
    )
}
