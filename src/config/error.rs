//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Host and port do not form a valid bind address")]
    InvalidBindAddress,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Invalid storage URL format")]
    InvalidStorageUrl,

    #[error("Signed URL TTL must be between 1 and 300 seconds")]
    InvalidSignedUrlTtl,

    #[error("Invalid Resend API key format")]
    InvalidResendKey,

    #[error("Invalid from email address")]
    InvalidFromEmail,

    #[error("Code secret must be at least 16 bytes")]
    WeakCodeSecret,

    #[error("Code length must be between 4 and 8 digits")]
    InvalidCodeLength,

    #[error("Attempt limit must be between 1 and 10")]
    InvalidAttemptLimit,

    #[error("Request limit must be at least 1")]
    InvalidRequestLimit,

    #[error("Code reveal must be disabled in production")]
    CodeRevealInProduction,
}
