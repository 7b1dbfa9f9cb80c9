//! Proposal content snapshot.
//!
//! The snapshot is the structured blob the editing flow produced when the
//! proposal was shared (business info, counterparty info, line items,
//! terms, branding). This module treats it as opaque except for the two
//! signature-reference keys it knows how to patch and the logo key it
//! reads for display.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Snapshot key holding the provider's signature reference.
pub const PROVIDER_SIGNATURE_KEY: &str = "signature";

/// Snapshot key holding the counterparty's signature reference.
pub const COUNTERPARTY_SIGNATURE_KEY: &str = "clientSignature";

/// Snapshot key holding the business logo reference.
pub const LOGO_KEY: &str = "logo";

/// Immutable-by-convention proposal content.
///
/// Constructed once by the editing flow; the access workflow only ever
/// reads it or derives a patched copy via [`merge_signature`].
///
/// [`merge_signature`]: ProposalSnapshot::merge_signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposalSnapshot(Value);

impl ProposalSnapshot {
    /// Wraps a raw content value.
    pub fn new(content: Value) -> Self {
        Self(content)
    }

    /// Returns an empty snapshot.
    pub fn empty() -> Self {
        Self(json!({}))
    }

    /// Returns the inner JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the snapshot, returning the inner JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Returns the provider signature reference, if present.
    pub fn provider_signature_ref(&self) -> Option<&str> {
        self.string_field(PROVIDER_SIGNATURE_KEY)
    }

    /// Returns the counterparty signature reference, if present.
    pub fn counterparty_signature_ref(&self) -> Option<&str> {
        self.string_field(COUNTERPARTY_SIGNATURE_KEY)
    }

    /// Returns the logo reference, if present.
    pub fn logo_ref(&self) -> Option<&str> {
        self.string_field(LOGO_KEY)
    }

    /// Derives a new snapshot with the counterparty signature reference set.
    ///
    /// Total: a snapshot whose inner value is not an object is replaced by
    /// an object holding only the signature key, so the patch can never be
    /// silently dropped. All other fields are preserved untouched.
    pub fn merge_signature(&self, signature_path: &str) -> ProposalSnapshot {
        let mut content = match &self.0 {
            Value::Object(map) => Value::Object(map.clone()),
            _ => json!({}),
        };
        if let Value::Object(map) = &mut content {
            map.insert(
                COUNTERPARTY_SIGNATURE_KEY.to_string(),
                Value::String(signature_path.to_string()),
            );
        }
        Self(content)
    }

    /// Derives a display copy with asset references swapped for fetchable URLs.
    ///
    /// `None` for a slot leaves the stored reference untouched.
    pub fn with_display_refs(
        &self,
        provider_signature: Option<String>,
        counterparty_signature: Option<String>,
        logo: Option<String>,
    ) -> ProposalSnapshot {
        let mut content = self.0.clone();
        if let Value::Object(map) = &mut content {
            let slots = [
                (PROVIDER_SIGNATURE_KEY, provider_signature),
                (COUNTERPARTY_SIGNATURE_KEY, counterparty_signature),
                (LOGO_KEY, logo),
            ];
            for (key, replacement) in slots {
                if let Some(url) = replacement {
                    map.insert(key.to_string(), Value::String(url));
                }
            }
        }
        Self(content)
    }

    fn string_field(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

impl Default for ProposalSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
