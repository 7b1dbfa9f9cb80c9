//! Shared policy knobs for the access handlers.

use secrecy::SecretString;

/// Tuning shared by code issuance and verification.
///
/// Built from `AccessConfig` at wiring time. The secret keys the code
/// digests, so both handlers must hold the same policy instance.
#[derive(Clone)]
pub struct AccessPolicy {
    /// Key for the keyed code digests.
    pub code_secret: SecretString,
    /// How long an issued code stays valid.
    pub code_ttl_secs: u64,
    /// Digits in a generated code.
    pub code_length: usize,
    /// Wrong guesses tolerated before the session is revoked.
    pub max_attempts: u32,
    /// Whether the issuance outcome may carry the code back to the
    /// caller. Production configurations refuse to enable this.
    pub reveal_code: bool,
}

impl AccessPolicy {
    /// Creates a policy with default limits and the given secret.
    pub fn new(code_secret: SecretString) -> Self {
        Self {
            code_secret,
            code_ttl_secs: 900,
            code_length: 6,
            max_attempts: 5,
            reveal_code: false,
        }
    }
}
