//! Mock mail sender for testing.
//!
//! Provides a configurable mock implementation of `MailSender` for unit
//! and integration tests. Supports:
//! - Recorded sends for assertions
//! - Error injection

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode};
use crate::ports::MailSender;

/// Mock mail sender for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockMailSender::new();
///
/// // Use in tests
/// mailer.send(&email, "subject", "<p>body</p>").await?;
/// assert_eq!(mock.sent_count(), 1);
/// ```
#[derive(Default)]
pub struct MockMailSender {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockMailState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockMailState {
    /// Recorded sends in order.
    sent: Vec<SentMail>,

    /// Error to return on every send.
    fail_with: Option<DomainError>,
}

/// Recorded outgoing mail for assertions.
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: EmailAddress,
    pub subject: String,
    pub html_body: String,
}

impl MockMailSender {
    /// Create a new mock sender that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that fails every send.
    pub fn failing() -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().fail_with = Some(DomainError::new(
            ErrorCode::EmailError,
            "Simulated delivery failure",
        ));
        mock
    }

    /// Set the error returned by subsequent sends.
    pub fn set_error(&self, error: DomainError) {
        self.inner.lock().unwrap().fail_with = Some(error);
    }

    /// All recorded sends in order.
    pub fn sent(&self) -> Vec<SentMail> {
        self.inner.lock().unwrap().sent.clone()
    }

    /// Number of recorded sends.
    pub fn sent_count(&self) -> usize {
        self.inner.lock().unwrap().sent.len()
    }

    /// The most recent send, if any.
    pub fn last(&self) -> Option<SentMail> {
        self.inner.lock().unwrap().sent.last().cloned()
    }

    /// Clear recorded sends.
    pub fn clear(&self) {
        self.inner.lock().unwrap().sent.clear();
    }
}

#[async_trait]
impl MailSender for MockMailSender {
    async fn send(
        &self,
        to: &EmailAddress,
        subject: &str,
        html_body: &str,
    ) -> Result<(), DomainError> {
        let mut state = self.inner.lock().unwrap();

        if let Some(error) = &state.fail_with {
            return Err(error.clone());
        }

        state.sent.push(SentMail {
            to: to.clone(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}
