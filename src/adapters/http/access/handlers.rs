//! HTTP handlers for public proposal access endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::application::handlers::{
    CountersignCommand, CountersignHandler, RequestAccessCodeCommand, RequestAccessCodeHandler,
    VerifyAccessCodeCommand, VerifyAccessCodeHandler,
};
use crate::domain::access::AccessError;
use crate::domain::foundation::ProposalId;

use super::dto::{
    CountersignRequest, CountersignResponse, ErrorResponse, RequestCodeRequest,
    RequestCodeResponse, UnlockedProposalResponse, VerifyCodeRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AccessHandlers {
    request_code_handler: Arc<RequestAccessCodeHandler>,
    verify_code_handler: Arc<VerifyAccessCodeHandler>,
    countersign_handler: Arc<CountersignHandler>,
}

impl AccessHandlers {
    pub fn new(
        request_code_handler: Arc<RequestAccessCodeHandler>,
        verify_code_handler: Arc<VerifyAccessCodeHandler>,
        countersign_handler: Arc<CountersignHandler>,
    ) -> Self {
        Self {
            request_code_handler,
            verify_code_handler,
            countersign_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/public/proposals/:id/access-code - Request an access code
pub async fn request_code(
    State(handlers): State<AccessHandlers>,
    Path(proposal_id): Path<String>,
    Json(req): Json<RequestCodeRequest>,
) -> Response {
    let proposal_id = match proposal_id.parse::<ProposalId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid proposal ID")),
            )
                .into_response()
        }
    };

    let cmd = RequestAccessCodeCommand {
        proposal_id,
        email: req.email,
    };

    match handlers.request_code_handler.handle(cmd).await {
        Ok(outcome) => {
            let response: RequestCodeResponse = outcome.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_access_error(e),
    }
}

/// POST /api/public/proposals/:id/verify - Verify a code and unlock the proposal
pub async fn verify_code(
    State(handlers): State<AccessHandlers>,
    Path(proposal_id): Path<String>,
    Json(req): Json<VerifyCodeRequest>,
) -> Response {
    let proposal_id = match proposal_id.parse::<ProposalId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid proposal ID")),
            )
                .into_response()
        }
    };

    let cmd = VerifyAccessCodeCommand {
        proposal_id,
        email: req.email,
        code: req.code,
    };

    match handlers.verify_code_handler.handle(cmd).await {
        Ok(unlocked) => {
            let response: UnlockedProposalResponse = unlocked.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_access_error(e),
    }
}

/// POST /api/public/proposals/:id/countersign - Countersign the proposal
pub async fn countersign(
    State(handlers): State<AccessHandlers>,
    Path(proposal_id): Path<String>,
    Json(req): Json<CountersignRequest>,
) -> Response {
    let proposal_id = match proposal_id.parse::<ProposalId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid proposal ID")),
            )
                .into_response()
        }
    };

    let image_bytes = match decode_signature_payload(&req.signature) {
        Ok(bytes) => bytes,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid signature payload")),
            )
                .into_response()
        }
    };

    let cmd = CountersignCommand {
        proposal_id,
        email: req.email,
        image_bytes,
    };

    match handlers.countersign_handler.handle(cmd).await {
        Ok(result) => {
            let response: CountersignResponse = result.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_access_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_access_error(error: AccessError) -> Response {
    // Provider detail is logged here and nowhere closer to the client.
    if let AccessError::Upstream(detail) = &error {
        tracing::error!(error = %detail, "Access flow upstream failure");
    }

    let status = match &error {
        AccessError::ProposalNotFound(_) => StatusCode::NOT_FOUND,
        AccessError::CodeExpired
        | AccessError::CodeMismatch
        | AccessError::TooManyAttempts
        | AccessError::NotVerified => StatusCode::UNAUTHORIZED,
        AccessError::Throttled { .. } => StatusCode::TOO_MANY_REQUESTS,
        AccessError::AlreadySigned => StatusCode::CONFLICT,
        AccessError::InvalidSignature { .. } => StatusCode::BAD_REQUEST,
        AccessError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let retry_after = match &error {
        AccessError::Throttled { retry_after_secs } => Some(*retry_after_secs),
        _ => None,
    };

    let mut response =
        (status, Json(ErrorResponse::from_access_error(&error))).into_response();

    if let Some(secs) = retry_after {
        response.headers_mut().insert(
            "Retry-After",
            HeaderValue::from_str(&secs.to_string()).unwrap(),
        );
    }

    response
}

/// Decode the signature payload, accepting bare base64 or a data URL.
fn decode_signature_payload(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let encoded = match payload.split_once("base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => payload,
    };

    BASE64.decode(encoded.trim())
}
