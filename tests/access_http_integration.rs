//! Integration tests for the public proposal HTTP endpoints.
//!
//! These tests verify the HTTP layer wiring for the access flow:
//! 1. Request DTOs deserialize correctly
//! 2. Response DTOs serialize correctly
//! 3. Handlers can be created and wired together

use serde_json::json;
use std::sync::Arc;

use signet::adapters::email::MockMailSender;
use signet::adapters::http::access::{
    CountersignRequest, RequestCodeRequest, RequestCodeResponse, UnlockedProposalResponse,
    VerifyCodeRequest,
};
use signet::adapters::http::{access_routes, AccessHandlers};
use signet::adapters::storage::InMemoryObjectStore;
use signet::adapters::throttle::InMemoryRequestThrottle;
use signet::application::{
    AccessPolicy, AssetUrlService, CountersignHandler, RequestAccessCodeHandler,
    RequestCodeOutcome, UnlockedProposal, VerifyAccessCodeHandler,
};
use signet::domain::access::AccessSession;
use signet::domain::foundation::{DomainError, EmailAddress, ProposalId, Timestamp};
use signet::domain::proposal::{Proposal, ProposalSnapshot, ProposalStatus};
use signet::ports::{AccessSessionStore, ProposalStore};

use async_trait::async_trait;
use secrecy::SecretString;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Empty proposal store, enough to construct the handlers.
struct EmptyProposalStore;

#[async_trait]
impl ProposalStore for EmptyProposalStore {
    async fn find_by_id(&self, _id: &ProposalId) -> Result<Option<Proposal>, DomainError> {
        Ok(None)
    }

    async fn update(&self, _proposal: &Proposal) -> Result<(), DomainError> {
        Ok(())
    }
}

/// Empty session store, enough to construct the handlers.
struct EmptySessionStore;

#[async_trait]
impl AccessSessionStore for EmptySessionStore {
    async fn put(&self, _session: &AccessSession) -> Result<(), DomainError> {
        Ok(())
    }

    async fn find(
        &self,
        _proposal_id: &ProposalId,
        _email: &EmailAddress,
    ) -> Result<Option<AccessSession>, DomainError> {
        Ok(None)
    }

    async fn delete(
        &self,
        _proposal_id: &ProposalId,
        _email: &EmailAddress,
    ) -> Result<(), DomainError> {
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn test_handler_wiring() {
    // Verify all handlers can be created and wired into a router
    let proposals = Arc::new(EmptyProposalStore);
    let sessions = Arc::new(EmptySessionStore);
    let mailer = Arc::new(MockMailSender::new());
    let objects = Arc::new(InMemoryObjectStore::new());
    let throttle = Arc::new(InMemoryRequestThrottle::with_defaults());
    let policy = AccessPolicy::new(SecretString::new(
        "wiring-test-secret-0123456789".to_string(),
    ));
    let asset_urls = Arc::new(AssetUrlService::new(objects.clone(), "signatures", 60));

    let request_code_handler = Arc::new(RequestAccessCodeHandler::new(
        proposals.clone(),
        sessions.clone(),
        mailer,
        throttle,
        policy.clone(),
    ));
    let verify_code_handler = Arc::new(VerifyAccessCodeHandler::new(
        proposals.clone(),
        sessions,
        asset_urls.clone(),
        policy,
    ));
    let countersign_handler = Arc::new(CountersignHandler::new(
        proposals,
        objects,
        asset_urls,
        "signatures",
    ));

    let handlers = AccessHandlers::new(
        request_code_handler,
        verify_code_handler,
        countersign_handler,
    );

    let _router = access_routes(handlers);

    // If we get here, the wiring is correct
}

#[test]
fn test_request_code_request_deserializes() {
    let json = json!({
        "email": "dana@client.example"
    });

    let json_str = serde_json::to_string(&json).unwrap();
    let req: RequestCodeRequest = serde_json::from_str(&json_str).unwrap();

    assert_eq!(req.email, "dana@client.example");
}

#[test]
fn test_verify_code_request_deserializes() {
    let json = json!({
        "email": "dana@client.example",
        "code": "481516"
    });

    let json_str = serde_json::to_string(&json).unwrap();
    let req: VerifyCodeRequest = serde_json::from_str(&json_str).unwrap();

    assert_eq!(req.email, "dana@client.example");
    assert_eq!(req.code, "481516");
}

#[test]
fn test_countersign_request_deserializes() {
    let json = json!({
        "email": "dana@client.example",
        "signature": "data:image/png;base64,iVBORw0KGgo="
    });

    let json_str = serde_json::to_string(&json).unwrap();
    let req: CountersignRequest = serde_json::from_str(&json_str).unwrap();

    assert!(req.signature.starts_with("data:image/png"));
}

#[test]
fn test_request_code_response_serializes() {
    let response = RequestCodeResponse::from(RequestCodeOutcome::Granted { debug_code: None });
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["sent"], true);
    // Absent optionals are omitted, not null.
    assert!(json.get("message").is_none());
    assert!(json.get("debug_code").is_none());
}

#[test]
fn test_unlocked_proposal_response_serializes() {
    let email = EmailAddress::try_new("dana@client.example").unwrap();
    let proposal = Proposal::new(
        ProposalId::new(),
        ProposalSnapshot::new(json!({"clientName": "Dana"})),
        email,
    );
    let unlocked = UnlockedProposal {
        id: *proposal.id(),
        status: ProposalStatus::Sent,
        serial_number: Some(42),
        client_name: Some("Dana".to_string()),
        proposal_number: Some("P-2026-042".to_string()),
        signed_at: None,
        created_at: Timestamp::now(),
        content: proposal.content().clone(),
    };

    let response = UnlockedProposalResponse::from(unlocked);
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["status"], "sent");
    assert_eq!(json["serial_number"], 42);
    assert_eq!(json["content"]["clientName"], "Dana");
    assert!(json.get("signed_at").is_none());
}
