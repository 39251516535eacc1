//! Generation backend configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ConfigValidationError;

/// Connection settings for the generation backend.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend, e.g. `http://localhost:8000`.
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failures.
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Optional bearer token for gatewayed deployments.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl BackendConfig {
    /// Get timeout as Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate backend configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigValidationError::MissingRequired("BACKEND__BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigValidationError::InvalidValue {
                field: "backend.base_url",
                reason: "must start with http:// or https://".to_string(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "backend.timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn default_timeout() -> u64 {
    120
}

fn default_retries() -> u32 {
    2
}
