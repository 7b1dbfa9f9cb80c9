//! HTTP DTOs for public proposal access endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{CountersignResult, RequestCodeOutcome, UnlockedProposal};
use crate::domain::access::AccessError;
use crate::domain::proposal::ProposalStatus;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request for an access code.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestCodeRequest {
    pub email: String,
}

/// Request to verify a submitted access code.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

/// Request to countersign a proposal.
///
/// `signature` carries the captured PNG, either as a bare base64 string
/// or a `data:image/png;base64,...` URL as produced by a canvas export.
#[derive(Debug, Clone, Deserialize)]
pub struct CountersignRequest {
    pub email: String,
    pub signature: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response for a code request.
///
/// Rejections ride in-band so a mismatched address gets the same HTTP
/// status as a granted one.
#[derive(Debug, Clone, Serialize)]
pub struct RequestCodeResponse {
    pub sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_code: Option<String>,
}

impl From<RequestCodeOutcome> for RequestCodeResponse {
    fn from(outcome: RequestCodeOutcome) -> Self {
        match outcome {
            RequestCodeOutcome::Granted { debug_code } => Self {
                sent: true,
                message: None,
                debug_code,
            },
            RequestCodeOutcome::Rejected { message } => Self {
                sent: false,
                message: Some(message),
                debug_code: None,
            },
        }
    }
}

/// Unlocked proposal view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct UnlockedProposalResponse {
    pub id: String,
    pub status: ProposalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposal_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_at: Option<String>,
    pub created_at: String,
    pub content: serde_json::Value,
}

impl From<UnlockedProposal> for UnlockedProposalResponse {
    fn from(unlocked: UnlockedProposal) -> Self {
        Self {
            id: unlocked.id.to_string(),
            status: unlocked.status,
            serial_number: unlocked.serial_number,
            client_name: unlocked.client_name,
            proposal_number: unlocked.proposal_number,
            signed_at: unlocked
                .signed_at
                .map(|t| t.as_datetime().to_rfc3339()),
            created_at: unlocked.created_at.as_datetime().to_rfc3339(),
            content: unlocked.content.into_value(),
        }
    }
}

/// Response for a completed countersignature.
#[derive(Debug, Clone, Serialize)]
pub struct CountersignResponse {
    pub proposal_id: String,
    pub status: ProposalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_url: Option<String>,
}

impl From<CountersignResult> for CountersignResponse {
    fn from(result: CountersignResult) -> Self {
        Self {
            proposal_id: result.proposal.id().to_string(),
            status: result.proposal.status(),
            signed_at: result
                .proposal
                .signed_at()
                .map(|t| t.as_datetime().to_rfc3339()),
            signature_url: result.signature_url,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u32>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            retry_after_secs: None,
        }
    }

    /// Builds the client-facing body for an access error.
    ///
    /// `AccessError::message` is already scrubbed of provider detail, so
    /// this is a straight projection.
    pub fn from_access_error(error: &AccessError) -> Self {
        let retry_after_secs = match error {
            AccessError::Throttled { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        };

        Self {
            code: error.code().to_string(),
            message: error.message(),
            retry_after_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ProposalId, Timestamp};
    use crate::domain::proposal::ProposalSnapshot;
    use serde_json::json;

    #[test]
    fn request_code_request_deserializes() {
        let json = r#"{"email": "dana@example.com"}"#;
        let req: RequestCodeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.email, "dana@example.com");
    }

    #[test]
    fn verify_code_request_deserializes() {
        let json = r#"{"email": "dana@example.com", "code": "483920"}"#;
        let req: VerifyCodeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.email, "dana@example.com");
        assert_eq!(req.code, "483920");
    }

    #[test]
    fn countersign_request_deserializes() {
        let json = r#"{"email": "dana@example.com", "signature": "data:image/png;base64,iVBORw0KGgo="}"#;
        let req: CountersignRequest = serde_json::from_str(json).unwrap();
        assert!(req.signature.starts_with("data:image/png"));
    }

    #[test]
    fn granted_outcome_serializes_as_sent() {
        let response: RequestCodeResponse = RequestCodeOutcome::Granted { debug_code: None }.into();
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["sent"], true);
        assert!(json.get("message").is_none());
        assert!(json.get("debug_code").is_none());
    }

    #[test]
    fn rejected_outcome_carries_the_message() {
        let response: RequestCodeResponse = RequestCodeOutcome::Rejected {
            message: "Email not recognized for this document".to_string(),
        }
        .into();
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["sent"], false);
        assert_eq!(json["message"], "Email not recognized for this document");
    }

    #[test]
    fn unlocked_proposal_response_conversion() {
        let unlocked = UnlockedProposal {
            id: ProposalId::new(),
            status: ProposalStatus::Sent,
            serial_number: Some(41),
            client_name: Some("Acme Corp".to_string()),
            proposal_number: Some("P-2024-041".to_string()),
            signed_at: None,
            created_at: Timestamp::now(),
            content: ProposalSnapshot::new(json!({"title": "Annual retainer"})),
        };

        let response: UnlockedProposalResponse = unlocked.into();
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "sent");
        assert_eq!(json["serial_number"], 41);
        assert_eq!(json["content"]["title"], "Annual retainer");
        assert!(json.get("signed_at").is_none());
    }

    #[test]
    fn error_response_projects_scrubbed_message() {
        let error = AccessError::upstream("connection refused: db.internal:5432");
        let response = ErrorResponse::from_access_error(&error);

        assert_eq!(response.code, "INTERNAL_ERROR");
        assert!(!response.message.contains("db.internal"));
    }

    #[test]
    fn throttled_error_response_carries_retry_hint() {
        let error = AccessError::throttled(120);
        let response = ErrorResponse::from_access_error(&error);

        assert_eq!(response.code, "RATE_LIMITED");
        assert_eq!(response.retry_after_secs, Some(120));
    }
}
