//! Export configuration

use serde::Deserialize;

use super::error::ConfigValidationError;

/// Where exported policy bundles are written.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Output directory for the bundle artifacts.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl ExportConfig {
    /// Validate export configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.output_dir.trim().is_empty() {
            return Err(ConfigValidationError::InvalidValue {
                field: "export.output_dir",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    "output".to_string()
}
