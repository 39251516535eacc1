//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the
//! `POLICY_FORGE` prefix and `__` (double underscore) separating nested
//! keys.
//!
//! # Example
//!
//! ```no_run
//! use policy_forge::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Backend at {}", config.backend.base_url);
//! ```

mod backend;
mod error;
mod export;

pub use backend::BackendConfig;
pub use error::{ConfigError, ConfigValidationError};
pub use export::ExportConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Generation backend configuration (URL, timeout, retries).
    pub backend: BackendConfig,

    /// Export configuration (output directory).
    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads `.env` if present (development), then reads variables like
    /// `POLICY_FORGE__BACKEND__BASE_URL=http://localhost:8000` into the
    /// typed sections.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or a
    /// value cannot be parsed into its expected type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("POLICY_FORGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.backend.validate()?;
        self.export.validate()?;
        Ok(())
    }
}
