//! Supabase Storage adapter.
//!
//! Implements the `ObjectStore` trait against the Supabase Storage HTTP
//! API. Uploads land in private buckets; reads are granted through
//! short-lived signed URLs minted by the sign endpoint.
//!
//! # Configuration
//!
//! ```ignore
//! let config = SupabaseStorageConfig::new(project_url, service_key);
//! let store = SupabaseObjectStore::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::ObjectStore;

/// Supabase Storage configuration.
#[derive(Clone)]
pub struct SupabaseStorageConfig {
    /// Project base URL (https://<project>.supabase.co).
    project_url: String,

    /// Service-role API key. Grants full bucket access; never reaches
    /// the client.
    service_key: SecretString,
}

impl SupabaseStorageConfig {
    /// Create a new Supabase Storage configuration.
    pub fn new(project_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            project_url: project_url.into(),
            service_key: SecretString::new(service_key.into()),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `SUPABASE_URL`
    /// - `SUPABASE_SERVICE_ROLE_KEY`
    pub fn from_env() -> Result<Self, std::env::VarError> {
        let project_url = std::env::var("SUPABASE_URL")?;
        let service_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")?;

        Ok(Self::new(project_url, service_key))
    }

    /// Storage API root for this project.
    fn storage_url(&self) -> String {
        format!("{}/storage/v1", self.project_url.trim_end_matches('/'))
    }

    /// Turn the relative path returned by the sign endpoint into a full URL.
    fn join_signed_path(&self, signed_path: &str) -> String {
        if signed_path.starts_with('/') {
            format!("{}{}", self.storage_url(), signed_path)
        } else {
            format!("{}/{}", self.storage_url(), signed_path)
        }
    }
}

/// Response from the object sign endpoint.
#[derive(Debug, Deserialize)]
struct SignObjectResponse {
    /// Relative signed path, `/object/sign/<bucket>/<key>?token=...`.
    #[serde(rename = "signedURL", alias = "signedUrl")]
    signed_url: String,
}

/// Supabase Storage adapter.
///
/// Implements `ObjectStore` over the Supabase Storage REST endpoints.
pub struct SupabaseObjectStore {
    config: SupabaseStorageConfig,
    http_client: reqwest::Client,
}

impl SupabaseObjectStore {
    /// Create a new Supabase Storage adapter with the given configuration.
    pub fn new(config: SupabaseStorageConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ObjectStore for SupabaseObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), DomainError> {
        let url = format!("{}/object/{}/{}", self.config.storage_url(), bucket, key);

        // No upsert header: existing objects are never overwritten, so a
        // key collision fails loudly instead of clobbering a signature.
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.service_key.expose_secret())
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::StorageError,
                    format!("Storage upload request failed: {}", e),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                %status,
                %bucket,
                %key,
                error = %error_text,
                "Supabase Storage upload failed"
            );
            return Err(DomainError::new(
                ErrorCode::StorageError,
                format!("Storage upload failed with status {}", status),
            ));
        }

        Ok(())
    }

    async fn create_signed_url(
        &self,
        bucket: &str,
        key: &str,
        ttl_secs: u64,
    ) -> Result<String, DomainError> {
        let url = format!(
            "{}/object/sign/{}/{}",
            self.config.storage_url(),
            bucket,
            key
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.service_key.expose_secret())
            .json(&json!({ "expiresIn": ttl_secs }))
            .send()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::StorageError,
                    format!("Signed URL request failed: {}", e),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                %status,
                %bucket,
                %key,
                error = %error_text,
                "Supabase Storage sign failed"
            );
            return Err(DomainError::new(
                ErrorCode::StorageError,
                format!("Signed URL issuance failed with status {}", status),
            ));
        }

        let signed: SignObjectResponse = response.json().await.map_err(|e| {
            DomainError::new(
                ErrorCode::StorageError,
                format!("Failed to parse sign response: {}", e),
            )
        })?;

        Ok(self.config.join_signed_path(&signed.signed_url))
    }
}
