//! Access flow configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Verification code and throttling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AccessConfig {
    /// HMAC secret for hashing verification codes
    pub code_secret: String,

    /// Verification code lifetime in seconds
    #[serde(default = "default_code_ttl")]
    pub code_ttl_secs: u64,

    /// Number of digits in a verification code
    #[serde(default = "default_code_length")]
    pub code_length: u32,

    /// Wrong guesses allowed before a code is burned
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Code requests allowed per proposal and email within the window
    #[serde(default = "default_request_limit")]
    pub request_limit: u32,

    /// Request throttle window in seconds
    #[serde(default = "default_request_window")]
    pub request_window_secs: u32,

    /// Return the generated code in the response body
    #[serde(default)]
    pub reveal_code: bool,
}

impl AccessConfig {
    /// Validate access configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.code_secret.is_empty() {
            return Err(ValidationError::MissingRequired("ACCESS__CODE_SECRET"));
        }
        if self.code_secret.len() < 16 {
            return Err(ValidationError::WeakCodeSecret);
        }
        if self.code_length < 4 || self.code_length > 8 {
            return Err(ValidationError::InvalidCodeLength);
        }
        if self.max_attempts == 0 || self.max_attempts > 10 {
            return Err(ValidationError::InvalidAttemptLimit);
        }
        if self.request_limit == 0 {
            return Err(ValidationError::InvalidRequestLimit);
        }
        if self.reveal_code && *environment == Environment::Production {
            return Err(ValidationError::CodeRevealInProduction);
        }
        Ok(())
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            code_secret: String::new(),
            code_ttl_secs: default_code_ttl(),
            code_length: default_code_length(),
            max_attempts: default_max_attempts(),
            request_limit: default_request_limit(),
            request_window_secs: default_request_window(),
            reveal_code: false,
        }
    }
}

fn default_code_ttl() -> u64 {
    900
}

fn default_code_length() -> u32 {
    6
}

fn default_max_attempts() -> u32 {
    5
}

fn default_request_limit() -> u32 {
    5
}

fn default_request_window() -> u32 {
    900
}
