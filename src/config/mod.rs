//! Application configuration
//!
//! Loads configuration from environment variables with the `SIGNET` prefix
//! and `__` as the section separator, e.g. `SIGNET__DATABASE__URL`.

mod access;
mod database;
mod email;
mod error;
mod server;
mod storage;

pub use access::AccessConfig;
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use storage::StorageConfig;

use serde::Deserialize;

/// Complete application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub email: EmailConfig,
    pub access: AccessConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SIGNET")
                    .separator("__"),
            )
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.storage.validate()?;
        self.email.validate()?;
        self.access.validate(&self.server.environment)?;
        Ok(())
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
