//! In-memory request throttle for single-server deployments.
//!
//! Uses a fixed-window counter algorithm with an in-memory HashMap.
//! Counters vanish on restart, which for a cap on code requests is an
//! acceptable failure mode.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::{RequestThrottle, ThrottleDenied, ThrottleKey, ThrottleResult};

/// Requests allowed per window when none is configured.
const DEFAULT_LIMIT: u32 = 5;

/// Window length in seconds when none is configured.
const DEFAULT_WINDOW_SECS: u32 = 900;

/// In-memory fixed-window throttle.
///
/// Each key tracks a request count that resets when its window expires.
#[derive(Debug)]
pub struct InMemoryRequestThrottle {
    /// Requests allowed per window.
    limit: u32,
    /// Window duration in seconds.
    window_secs: u32,
    /// Per-key window state.
    windows: Arc<RwLock<HashMap<String, WindowState>>>,
}

/// State for a single throttle window.
#[derive(Debug, Clone)]
struct WindowState {
    /// Number of requests in the current window.
    count: u32,
    /// When the current window started.
    window_start: u64,
}

impl InMemoryRequestThrottle {
    /// Create a throttle allowing `limit` requests per `window_secs`.
    pub fn new(limit: u32, window_secs: u32) -> Self {
        Self {
            limit,
            window_secs,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a throttle with the default limit and window.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_LIMIT, DEFAULT_WINDOW_SECS)
    }

    /// Get current timestamp as unix seconds.
    fn now_secs() -> u64 {
        Timestamp::now().as_unix_secs()
    }
}

#[async_trait]
impl RequestThrottle for InMemoryRequestThrottle {
    async fn check(&self, key: ThrottleKey) -> Result<ThrottleResult, DomainError> {
        let now = Self::now_secs();

        let mut windows = self.windows.write().await;

        // Get or create window state
        let state = windows
            .entry(key.as_str().to_string())
            .or_insert_with(|| WindowState {
                count: 0,
                window_start: now,
            });

        // Check if window has expired
        let window_end = state.window_start + self.window_secs as u64;
        if now >= window_end {
            // Reset window
            state.count = 0;
            state.window_start = now;
        }

        // Check limit
        if state.count >= self.limit {
            let retry_after =
                (state.window_start + self.window_secs as u64).saturating_sub(now) as u32;

            return Ok(ThrottleResult::Denied(ThrottleDenied {
                limit: self.limit,
                retry_after_secs: retry_after.max(1),
            }));
        }

        // Increment counter
        state.count += 1;

        Ok(ThrottleResult::Allowed)
    }

    async fn reset(&self, key: ThrottleKey) -> Result<(), DomainError> {
        let mut windows = self.windows.write().await;
        windows.remove(key.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{EmailAddress, ProposalId};

    fn test_key(email: &str) -> ThrottleKey {
        let proposal_id = ProposalId::new();
        let email = EmailAddress::try_new(email).unwrap();
        ThrottleKey::code_request(&proposal_id, &email)
    }

    #[tokio::test]
    async fn allows_requests_within_limit() {
        let throttle = InMemoryRequestThrottle::with_defaults();
        let key = test_key("dana@example.com");

        for i in 0..5 {
            let result = throttle.check(key.clone()).await.unwrap();
            assert!(result.is_allowed(), "Request {} should be allowed", i + 1);
        }
    }

    #[tokio::test]
    async fn denies_requests_at_limit() {
        let throttle = InMemoryRequestThrottle::new(3, 900);
        let key = test_key("dana@example.com");

        // Use up the limit
        for _ in 0..3 {
            let result = throttle.check(key.clone()).await.unwrap();
            assert!(result.is_allowed());
        }

        // Next request should be denied
        let result = throttle.check(key.clone()).await.unwrap();
        assert!(result.is_denied());

        if let ThrottleResult::Denied(denied) = result {
            assert_eq!(denied.limit, 3);
            assert!(denied.retry_after_secs > 0);
            assert!(denied.retry_after_secs <= 900);
        }
    }

    #[tokio::test]
    async fn expired_window_starts_fresh() {
        // Zero-length window expires immediately, so every check lands
        // in a new window.
        let throttle = InMemoryRequestThrottle::new(1, 0);
        let key = test_key("dana@example.com");

        let first = throttle.check(key.clone()).await.unwrap();
        let second = throttle.check(key.clone()).await.unwrap();

        assert!(first.is_allowed());
        assert!(second.is_allowed());
    }

    #[tokio::test]
    async fn reset_clears_counter() {
        let throttle = InMemoryRequestThrottle::new(2, 900);
        let key = test_key("dana@example.com");

        // Use up the limit
        for _ in 0..2 {
            throttle.check(key.clone()).await.unwrap();
        }

        // Verify denied
        let result = throttle.check(key.clone()).await.unwrap();
        assert!(result.is_denied());

        // Reset
        throttle.reset(key.clone()).await.unwrap();

        // Should be allowed again
        let result = throttle.check(key.clone()).await.unwrap();
        assert!(result.is_allowed());
    }

    #[tokio::test]
    async fn different_pairs_have_independent_limits() {
        let throttle = InMemoryRequestThrottle::new(2, 900);
        let key1 = test_key("dana@example.com");
        let key2 = test_key("maya@example.com");

        // Exhaust limit for key1
        for _ in 0..2 {
            throttle.check(key1.clone()).await.unwrap();
        }
        let result = throttle.check(key1.clone()).await.unwrap();
        assert!(result.is_denied());

        // key2 should still have its full limit
        let result = throttle.check(key2.clone()).await.unwrap();
        assert!(result.is_allowed());
    }
}
