//! Mail sender port.

use crate::domain::foundation::{DomainError, EmailAddress};
use async_trait::async_trait;

/// Port for outbound email delivery.
///
/// Callers treat delivery failure as non-fatal: the access flow logs it
/// and proceeds, so a mail outage never blocks the state machine.
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Send an HTML email.
    ///
    /// # Errors
    ///
    /// - `EmailError` on delivery failure
    async fn send(
        &self,
        to: &EmailAddress,
        subject: &str,
        html_body: &str,
    ) -> Result<(), DomainError>;
}
