//! Private object store port.
//!
//! Covers the two storage operations the access flow needs: uploading a
//! signature image and issuing short-lived signed URLs for private
//! objects. Bucket policy (which buckets are private) lives in
//! configuration, not here.

use crate::domain::foundation::DomainError;
use async_trait::async_trait;

/// Port for the external private object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload an object to a bucket under the given key.
    ///
    /// Keys are expected to be fresh; implementations do not overwrite
    /// existing objects.
    ///
    /// # Errors
    ///
    /// - `StorageError` on upload failure
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), DomainError>;

    /// Issue a signed URL granting time-limited read access to a
    /// private object.
    ///
    /// Read-only credential grant; no stored object is mutated.
    ///
    /// # Errors
    ///
    /// - `StorageError` if the object is missing or signing fails
    async fn create_signed_url(
        &self,
        bucket: &str,
        key: &str,
        ttl_secs: u64,
    ) -> Result<String, DomainError>;
}
