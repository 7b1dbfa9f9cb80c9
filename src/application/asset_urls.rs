//! Display URLs for stored asset references.
//!
//! Proposal content refers to images in three shapes: inline data URIs,
//! full URLs left behind by older records, and bucket-relative store
//! paths. This service resolves each reference once and exchanges store
//! paths for short-lived signed URLs.

use std::sync::Arc;

use crate::domain::asset::{AssetResolver, ResolvedAsset};
use crate::ports::ObjectStore;

/// Issues short-lived read URLs for asset references found in proposal
/// content.
///
/// Resolution never fails the caller: when the store refuses to sign a
/// path, the original stored reference is returned unchanged so the
/// page still renders whatever the record held.
pub struct AssetUrlService {
    object_store: Arc<dyn ObjectStore>,
    resolver: AssetResolver,
    bucket: String,
    url_ttl_secs: u64,
}

impl AssetUrlService {
    /// Creates a service signing against the given private bucket.
    pub fn new(
        object_store: Arc<dyn ObjectStore>,
        private_bucket: impl Into<String>,
        url_ttl_secs: u64,
    ) -> Self {
        let bucket = private_bucket.into();
        Self {
            object_store,
            resolver: AssetResolver::new(bucket.clone()),
            bucket,
            url_ttl_secs,
        }
    }

    /// Exchanges one stored reference for a display URL.
    ///
    /// Inline data passes through untouched and is never signed. Store
    /// paths get a signed URL with a short expiry. A missing or empty
    /// reference yields `None`; a signing failure falls back to the
    /// stored reference itself.
    pub async fn display_url(&self, raw: Option<&str>) -> Option<String> {
        match self.resolver.resolve(raw)? {
            ResolvedAsset::Inline(data) => Some(data),
            ResolvedAsset::StorePath(key) => {
                match self
                    .object_store
                    .create_signed_url(&self.bucket, &key, self.url_ttl_secs)
                    .await
                {
                    Ok(url) => Some(url),
                    Err(err) => {
                        tracing::warn!(
                            key = %key,
                            error = %err,
                            "Signed URL issuance failed, serving the stored reference"
                        );
                        raw.map(str::to_string)
                    }
                }
            }
        }
    }
}
