//! Resend mail adapter.
//!
//! Implements the `MailSender` trait against the Resend HTTP API.
//! The service only sends transactional access-code mail, so the
//! surface is a single authenticated POST.
//!
//! # Configuration
//!
//! ```ignore
//! let config = ResendConfig::new(api_key, "proposals@example.com");
//! let mailer = ResendMailer::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode};
use crate::ports::MailSender;

/// Fallback sender address for development projects.
const DEFAULT_FROM_ADDRESS: &str = "onboarding@resend.dev";

/// Resend API configuration.
#[derive(Clone)]
pub struct ResendConfig {
    /// Resend secret API key (re_...).
    api_key: SecretString,

    /// Base URL for the Resend API (default: https://api.resend.com).
    api_base_url: String,

    /// Sender address for outgoing mail.
    from_address: String,
}

impl ResendConfig {
    /// Create a new Resend configuration.
    pub fn new(api_key: impl Into<String>, from_address: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.resend.com".to_string(),
            from_address: from_address.into(),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `RESEND_API_KEY`
    /// - `RESEND_FROM_ADDRESS` (optional, defaults to the Resend sandbox sender)
    pub fn from_env() -> Result<Self, std::env::VarError> {
        let api_key = std::env::var("RESEND_API_KEY")?;
        let from_address = std::env::var("RESEND_FROM_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string());

        Ok(Self::new(api_key, from_address))
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Request body for the send endpoint.
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Resend mail adapter.
///
/// Implements `MailSender` over the Resend REST API.
pub struct ResendMailer {
    config: ResendConfig,
    http_client: reqwest::Client,
}

impl ResendMailer {
    /// Create a new Resend adapter with the given configuration.
    pub fn new(config: ResendConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MailSender for ResendMailer {
    async fn send(
        &self,
        to: &EmailAddress,
        subject: &str,
        html_body: &str,
    ) -> Result<(), DomainError> {
        let url = format!("{}/emails", self.config.api_base_url);

        let body = SendEmailRequest {
            from: &self.config.from_address,
            to: to.as_str(),
            subject,
            html: html_body,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::EmailError,
                    format!("Mail request failed: {}", e),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(%status, error = %error_text, "Resend send failed");
            return Err(DomainError::new(
                ErrorCode::EmailError,
                format!("Mail delivery failed with status {}", status),
            ));
        }

        Ok(())
    }
}
