//! Configuration error types

use thiserror::Error;

/// Errors while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Errors from semantic validation of loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: POLICY_FORGE__{0}")]
    MissingRequired(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_names_the_variable() {
        let err = ConfigValidationError::MissingRequired("BACKEND__BASE_URL");
        assert_eq!(
            err.to_string(),
            "Missing required configuration: POLICY_FORGE__BACKEND__BASE_URL"
        );
    }
}
