//! In-Memory Object Store Adapter
//!
//! Stores uploaded objects in memory and mints deterministic fake
//! signed URLs. Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::ObjectStore;

/// In-memory object store keyed by (bucket, key).
///
/// Mirrors the no-overwrite contract of the real store: uploading to an
/// existing key is an error.
#[derive(Debug, Clone)]
pub struct InMemoryObjectStore {
    objects: Arc<RwLock<HashMap<(String, String), StoredObject>>>,
}

/// A stored object with its content type.
#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

impl InMemoryObjectStore {
    /// Create a new in-memory object store
    pub fn new() -> Self {
        Self {
            objects: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Clear all stored objects (useful for tests)
    pub async fn clear(&self) {
        self.objects.write().await.clear();
    }

    /// Get the number of stored objects
    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Check whether an object exists
    pub async fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .read()
            .await
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    /// Get a stored object's bytes
    pub async fn get(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .map(|obj| obj.bytes.clone())
    }

    /// Get a stored object's content type
    pub async fn content_type_of(&self, bucket: &str, key: &str) -> Option<String> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .map(|obj| obj.content_type.clone())
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), DomainError> {
        let mut objects = self.objects.write().await;
        let entry_key = (bucket.to_string(), key.to_string());

        if objects.contains_key(&entry_key) {
            return Err(DomainError::new(
                ErrorCode::StorageError,
                format!("Object already exists: {}/{}", bucket, key),
            ));
        }

        objects.insert(
            entry_key,
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn create_signed_url(
        &self,
        bucket: &str,
        key: &str,
        ttl_secs: u64,
    ) -> Result<String, DomainError> {
        let objects = self.objects.read().await;

        if !objects.contains_key(&(bucket.to_string(), key.to_string())) {
            return Err(DomainError::new(
                ErrorCode::StorageError,
                format!("Object not found: {}/{}", bucket, key),
            ));
        }

        Ok(format!(
            "https://storage.local/object/sign/{}/{}?ttl={}",
            bucket, key, ttl_secs
        ))
    }
}
