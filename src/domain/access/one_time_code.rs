//! One-time access codes and their keyed digests.
//!
//! Codes are short numeric secrets mailed to the counterparty. Only a
//! keyed digest is ever persisted, so a leaked session row cannot be
//! replayed into an unlock. The digest binds the code to its proposal
//! and address: a digest lifted from one session never verifies
//! against another.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use std::fmt;
use subtle::ConstantTimeEq;

use crate::domain::foundation::{EmailAddress, ProposalId, ValidationError};

/// A fixed-length numeric one-time code.
///
/// Leading zeros are significant: a six-digit code space is the full
/// `000000..=999999` range.
#[derive(Clone, PartialEq, Eq)]
pub struct OneTimeCode(String);

impl OneTimeCode {
    /// Generates a random code of the given length.
    pub fn generate(length: usize) -> Self {
        let mut rng = rand::thread_rng();
        let code = (0..length)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        Self(code)
    }

    /// Creates a code from user input, validating shape.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if:
    /// - Code is empty after trimming
    /// - Code length does not match `expected_length`
    /// - Code contains non-digit characters
    pub fn try_new(raw: &str, expected_length: usize) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("code"));
        }

        if trimmed.len() != expected_length {
            return Err(ValidationError::out_of_range(
                "code_length",
                expected_length as i32,
                expected_length as i32,
                trimmed.len() as i32,
            ));
        }

        if !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format("code", "digits only"));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the code digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Codes are secrets; keep them out of debug output.
impl fmt::Debug for OneTimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OneTimeCode(***)")
    }
}

/// Keyed HMAC-SHA256 digest of a one-time code.
///
/// The MAC input covers the proposal id and the normalized address in
/// addition to the code itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeDigest(Vec<u8>);

impl CodeDigest {
    /// Computes the digest for a code in the context of one session.
    pub fn compute(
        key: &[u8],
        proposal_id: &ProposalId,
        email: &EmailAddress,
        code: &OneTimeCode,
    ) -> Self {
        let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key");
        mac.update(proposal_id.as_uuid().as_bytes());
        mac.update(b".");
        mac.update(email.as_str().as_bytes());
        mac.update(b".");
        mac.update(code.as_str().as_bytes());
        Self(mac.finalize().into_bytes().to_vec())
    }

    /// Reconstitutes a digest from persisted bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Compares two digests in constant time.
    pub fn matches(&self, other: &CodeDigest) -> bool {
        if self.0.len() != other.0.len() {
            return false;
        }
        self.0.ct_eq(&other.0).into()
    }
}
