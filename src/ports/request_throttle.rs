//! Request throttle port for the code-request path.
//!
//! Code requests are the one unauthenticated write in the system, and
//! the address-mismatch message makes them probeable. The throttle caps
//! how often a (proposal, email) pair can ask for a code; every request
//! is charged, matching or not, so probing and requesting look the same.

use async_trait::async_trait;
use std::fmt;

use crate::domain::foundation::{DomainError, EmailAddress, ProposalId};

/// Port for throttling code requests.
///
/// Implementations should be thread-safe and use a fixed-window counter.
#[async_trait]
pub trait RequestThrottle: Send + Sync {
    /// Check if a request is allowed, consuming a slot if so.
    async fn check(&self, key: ThrottleKey) -> Result<ThrottleResult, DomainError>;

    /// Clear the window for a key (admin operation).
    ///
    /// Restores the full request budget immediately.
    async fn reset(&self, key: ThrottleKey) -> Result<(), DomainError>;
}

/// Key identifying one throttled requester.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct ThrottleKey(String);

impl ThrottleKey {
    /// Key for code requests against one (proposal, email) pair.
    pub fn code_request(proposal_id: &ProposalId, email: &EmailAddress) -> Self {
        Self(format!("codereq:{}:{}", proposal_id, email))
    }

    /// Returns the cache key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThrottleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of a throttle check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThrottleResult {
    /// Request is allowed.
    Allowed,
    /// Request is denied; includes denial details.
    Denied(ThrottleDenied),
}

impl ThrottleResult {
    /// Returns true if the request was allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, ThrottleResult::Allowed)
    }

    /// Returns true if the request was denied.
    pub fn is_denied(&self) -> bool {
        matches!(self, ThrottleResult::Denied(_))
    }
}

/// Details of a denied throttle check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleDenied {
    /// Requests allowed per window.
    pub limit: u32,
    /// Seconds until the window resets.
    pub retry_after_secs: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn request_throttle_is_object_safe() {
        fn _accepts_dyn(_throttle: &dyn RequestThrottle) {}
    }

    #[test]
    fn code_request_key_includes_both_parts() {
        let proposal_id: ProposalId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        let email = EmailAddress::try_new("dana@example.com").unwrap();
        let key = ThrottleKey::code_request(&proposal_id, &email);

        assert!(key.as_str().contains("550e8400"));
        assert!(key.as_str().contains("dana@example.com"));
    }

    #[test]
    fn same_pair_produces_same_key() {
        let proposal_id = ProposalId::new();
        let email = EmailAddress::try_new("dana@example.com").unwrap();
        assert_eq!(
            ThrottleKey::code_request(&proposal_id, &email),
            ThrottleKey::code_request(&proposal_id, &email)
        );
    }
}
