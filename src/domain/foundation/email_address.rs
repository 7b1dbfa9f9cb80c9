//! Email address value object.
//!
//! Addresses are normalized (trimmed, lowercased) at construction so that
//! equality checks against a stored counterparty address never depend on
//! the casing the visitor typed.

use crate::domain::foundation::ValidationError;
use serde::{Deserialize, Serialize};

/// A validated, normalized email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a new EmailAddress from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if:
    /// - Address is empty after trimming
    /// - Address does not contain exactly one `@`
    /// - Local part or domain is empty
    /// - Address contains whitespace
    pub fn try_new(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }

        if normalized.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_format(
                "email",
                "must not contain whitespace",
            ));
        }

        let parts: Vec<&str> = normalized.split('@').collect();
        if parts.len() != 2 {
            return Err(ValidationError::invalid_format(
                "email",
                "expected exactly one @ symbol",
            ));
        }

        if parts[0].is_empty() || parts[1].is_empty() {
            return Err(ValidationError::invalid_format(
                "email",
                "local part and domain must be non-empty",
            ));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for EmailAddress {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(&value)
    }
}
