//! Access-flow error types.
//!
//! Every failure the verification and countersignature flows can hit is
//! folded into [`AccessError`] before it reaches a transport layer. Raw
//! provider errors ride along in the `Upstream` variant for logging;
//! [`AccessError::message`] always returns text safe to show the
//! counterparty.

use crate::domain::foundation::{DomainError, ErrorCode, ProposalId};

/// Access and countersignature errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Proposal does not exist.
    ProposalNotFound(ProposalId),
    /// No live code for this proposal and address.
    CodeExpired,
    /// Submitted code did not match the issued one.
    CodeMismatch,
    /// Failed-attempt budget for the session is used up.
    TooManyAttempts,
    /// Caller has not completed code verification.
    NotVerified,
    /// Code requests are arriving too fast.
    Throttled { retry_after_secs: u32 },
    /// Proposal was already countersigned.
    AlreadySigned,
    /// Signature image failed validation.
    InvalidSignature { reason: String },
    /// Store, mail, or signing provider failure.
    Upstream(String),
}

impl AccessError {
    pub fn proposal_not_found(id: ProposalId) -> Self {
        AccessError::ProposalNotFound(id)
    }
    pub fn code_expired() -> Self {
        AccessError::CodeExpired
    }
    pub fn code_mismatch() -> Self {
        AccessError::CodeMismatch
    }
    pub fn too_many_attempts() -> Self {
        AccessError::TooManyAttempts
    }
    pub fn not_verified() -> Self {
        AccessError::NotVerified
    }
    pub fn throttled(retry_after_secs: u32) -> Self {
        AccessError::Throttled { retry_after_secs }
    }
    pub fn already_signed() -> Self {
        AccessError::AlreadySigned
    }
    pub fn invalid_signature(reason: impl Into<String>) -> Self {
        AccessError::InvalidSignature {
            reason: reason.into(),
        }
    }
    pub fn upstream(message: impl Into<String>) -> Self {
        AccessError::Upstream(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            AccessError::ProposalNotFound(_) => ErrorCode::ProposalNotFound,
            AccessError::CodeExpired => ErrorCode::CodeExpired,
            AccessError::CodeMismatch => ErrorCode::CodeMismatch,
            AccessError::TooManyAttempts => ErrorCode::TooManyAttempts,
            AccessError::NotVerified => ErrorCode::NotVerified,
            AccessError::Throttled { .. } => ErrorCode::RateLimited,
            AccessError::AlreadySigned => ErrorCode::AlreadySigned,
            AccessError::InvalidSignature { .. } => ErrorCode::InvalidSignature,
            AccessError::Upstream(_) => ErrorCode::InternalError,
        }
    }
    /// User-facing message. Never exposes provider detail.
    pub fn message(&self) -> String {
        match self {
            AccessError::ProposalNotFound(id) => format!("Proposal not found: {}", id),
            AccessError::CodeExpired => "Code expired or invalid".to_string(),
            AccessError::CodeMismatch => "Incorrect code".to_string(),
            AccessError::TooManyAttempts => {
                "Too many incorrect attempts, request a new code".to_string()
            }
            AccessError::NotVerified => "Verify your email to continue".to_string(),
            AccessError::Throttled { retry_after_secs } => {
                format!("Too many code requests. Retry after {} seconds", retry_after_secs)
            }
            AccessError::AlreadySigned => "Proposal has already been signed".to_string(),
            AccessError::InvalidSignature { reason } => {
                format!("Signature rejected: {}", reason)
            }
            AccessError::Upstream(_) => "Something went wrong, please try again".to_string(),
        }
    }
}

impl std::fmt::Display for AccessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Keep the provider detail visible to log sinks.
            AccessError::Upstream(detail) => write!(f, "Upstream failure: {}", detail),
            other => write!(f, "{}", other.message()),
        }
    }
}

impl std::error::Error for AccessError {}

impl From<DomainError> for AccessError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ProposalNotFound => AccessError::Upstream(err.to_string()),
            ErrorCode::AlreadySigned => AccessError::AlreadySigned,
            ErrorCode::InvalidSignature => AccessError::InvalidSignature {
                reason: err.message,
            },
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => AccessError::CodeMismatch,
            _ => AccessError::Upstream(err.to_string()),
        }
    }
}
