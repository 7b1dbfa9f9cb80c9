//! Object storage configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Supabase Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Supabase project URL
    pub url: String,

    /// Service role key for storage API calls
    pub service_key: String,

    /// Bucket holding uploaded signature images
    #[serde(default = "default_signatures_bucket")]
    pub signatures_bucket: String,

    /// Lifetime of signed asset URLs in seconds
    #[serde(default = "default_signed_url_ttl")]
    pub signed_url_ttl_secs: u32,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__URL"));
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ValidationError::InvalidStorageUrl);
        }
        if self.service_key.is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__SERVICE_KEY"));
        }
        if self.signatures_bucket.is_empty() {
            return Err(ValidationError::MissingRequired(
                "STORAGE__SIGNATURES_BUCKET",
            ));
        }
        if self.signed_url_ttl_secs == 0 || self.signed_url_ttl_secs > 300 {
            return Err(ValidationError::InvalidSignedUrlTtl);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            service_key: String::new(),
            signatures_bucket: default_signatures_bucket(),
            signed_url_ttl_secs: default_signed_url_ttl(),
        }
    }
}

fn default_signatures_bucket() -> String {
    "signatures".to_string()
}

fn default_signed_url_ttl() -> u32 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> StorageConfig {
        StorageConfig {
            url: "https://abc.supabase.co".to_string(),
            service_key: "service-role-key".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.signatures_bucket, "signatures");
        assert_eq!(config.signed_url_ttl_secs, 60);
    }

    #[test]
    fn test_validation_missing_url() {
        let config = StorageConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_non_http_url() {
        let config = StorageConfig {
            url: "ftp://abc.supabase.co".to_string(),
            ..valid_config()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidStorageUrl)
        ));
    }

    #[test]
    fn test_validation_missing_service_key() {
        let config = StorageConfig {
            service_key: String::new(),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_ttl() {
        let config = StorageConfig {
            signed_url_ttl_secs: 0,
            ..valid_config()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidSignedUrlTtl)
        ));
    }

    #[test]
    fn test_validation_rejects_long_ttl() {
        let config = StorageConfig {
            signed_url_ttl_secs: 3600,
            ..valid_config()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidSignedUrlTtl)
        ));
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid_config().validate().is_ok());
    }
}
