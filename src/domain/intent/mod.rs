//! Moderation intent - the user's description of what to moderate.
//!
//! The form is validated at construction so malformed intents never
//! reach the orchestrator; the enriched intent the backend returns is
//! opaque to the workflow except for the `intent` text it forwards into
//! policy generation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// The six answers describing the platform's moderation intent.
///
/// All fields are required non-empty strings except `additional_context`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentForm {
    pub platform_type: String,
    pub industry: String,
    pub user_behavior: String,
    pub real_world_concerns: String,
    pub moderation_style: String,
    #[serde(default)]
    pub additional_context: String,
}

impl IntentForm {
    /// Validates and constructs the form.
    ///
    /// Returns the first missing required field as a
    /// [`ValidationError::EmptyField`] naming it.
    pub fn new(
        platform_type: impl Into<String>,
        industry: impl Into<String>,
        user_behavior: impl Into<String>,
        real_world_concerns: impl Into<String>,
        moderation_style: impl Into<String>,
        additional_context: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let form = Self {
            platform_type: platform_type.into(),
            industry: industry.into(),
            user_behavior: user_behavior.into(),
            real_world_concerns: real_world_concerns.into(),
            moderation_style: moderation_style.into(),
            additional_context: additional_context.into(),
        };
        form.validate()?;
        Ok(form)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("platform_type", &self.platform_type),
            ("industry", &self.industry),
            ("user_behavior", &self.user_behavior),
            ("real_world_concerns", &self.real_world_concerns),
            ("moderation_style", &self.moderation_style),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::empty_field(name));
            }
        }
        Ok(())
    }
}

/// The backend's enrichment of a submitted intent.
///
/// Only `intent` is interpreted by the workflow (it is forwarded
/// verbatim into initial policy generation); everything else the
/// backend attaches rides along untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedIntent {
    pub intent: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EnrichedIntent {
    /// Wraps plain intent text with no extra payload.
    pub fn from_text(intent: impl Into<String>) -> Self {
        Self {
            intent: intent.into(),
            extra: serde_json::Map::new(),
        }
    }
}
