//! Wire representations for the generation backend's JSON API.
//!
//! The backend exchanges policies as flat objects with one optional
//! property per canonical field. Conversion to the domain picks only
//! the fields meaningful for the target variant; conversion from the
//! domain flattens the field map back out.

use serde::{Deserialize, Serialize};

use crate::domain::example::{ExampleLabel, ExampleRecord, GeneratedExample};
use crate::domain::intent::EnrichedIntent;
use crate::domain::policy::{
    FieldKey, FieldValue, OutputFormat, PolicyDocument, PolicyVariant, Severity,
};
use crate::ports::GenerationFailure;

/// A policy document as the backend sends and receives it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct PolicyDto {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation_examples: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_violation_examples: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faq: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_case_notes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforcement_guidance: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation_criteria: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_case_guidance: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl PolicyDto {
    /// Builds the domain document for `variant`, taking only the fields
    /// that variant carries. Fields outside the variant's table are
    /// ignored rather than rejected; the backend is free to send more.
    pub(crate) fn into_document(
        self,
        variant: PolicyVariant,
    ) -> Result<PolicyDocument, GenerationFailure> {
        let mut document = PolicyDocument::new(variant, self.name.clone())
            .map_err(|err| GenerationFailure::invalid_response(err.to_string()))?;

        for key in variant.field_order() {
            if let Some(value) = self.field_value(*key) {
                document = document
                    .with_field(*key, value)
                    .map_err(|err| GenerationFailure::invalid_response(err.to_string()))?;
            }
        }
        if let Some(format) = self.output_format {
            document = document.with_output_format(format);
        }
        if let Some(severity) = self.severity {
            document = document.with_severity(severity);
        }
        Ok(document)
    }

    /// Flattens a domain document back into the wire shape.
    pub(crate) fn from_document(document: &PolicyDocument) -> Self {
        let mut dto = PolicyDto {
            name: document.name().to_string(),
            output_format: document.output_format().cloned(),
            severity: document.severity(),
            ..PolicyDto::default()
        };
        for (key, value) in document.ordered_fields() {
            match (key, value) {
                (FieldKey::Description, FieldValue::Prose(text)) => {
                    dto.description = Some(text.clone())
                }
                (FieldKey::Summary, FieldValue::Prose(text)) => dto.summary = Some(text.clone()),
                (FieldKey::Rationale, FieldValue::Prose(text)) => {
                    dto.rationale = Some(text.clone())
                }
                (FieldKey::Scope, FieldValue::Prose(text)) => dto.scope = Some(text.clone()),
                (FieldKey::ViolationExamples, FieldValue::Items(items)) => {
                    dto.violation_examples = Some(items.clone())
                }
                (FieldKey::NonViolationExamples, FieldValue::Items(items)) => {
                    dto.non_violation_examples = Some(items.clone())
                }
                (FieldKey::Faq, FieldValue::Items(items)) => dto.faq = Some(items.clone()),
                (FieldKey::EdgeCaseNotes, FieldValue::Items(items)) => {
                    dto.edge_case_notes = Some(items.clone())
                }
                (FieldKey::EnforcementGuidance, FieldValue::Items(items)) => {
                    dto.enforcement_guidance = Some(items.clone())
                }
                (FieldKey::ViolationCriteria, FieldValue::Items(items)) => {
                    dto.violation_criteria = Some(items.clone())
                }
                (FieldKey::EdgeCaseGuidance, FieldValue::Items(items)) => {
                    dto.edge_case_guidance = Some(items.clone())
                }
                // A value whose shape disagrees with its key cannot be
                // constructed through the document API.
                _ => {}
            }
        }
        dto
    }

    fn field_value(&self, key: FieldKey) -> Option<FieldValue> {
        match key {
            FieldKey::Description => self.description.clone().map(FieldValue::Prose),
            FieldKey::Summary => self.summary.clone().map(FieldValue::Prose),
            FieldKey::Rationale => self.rationale.clone().map(FieldValue::Prose),
            FieldKey::Scope => self.scope.clone().map(FieldValue::Prose),
            FieldKey::ViolationExamples => {
                self.violation_examples.clone().map(FieldValue::Items)
            }
            FieldKey::NonViolationExamples => {
                self.non_violation_examples.clone().map(FieldValue::Items)
            }
            FieldKey::Faq => self.faq.clone().map(FieldValue::Items),
            FieldKey::EdgeCaseNotes => self.edge_case_notes.clone().map(FieldValue::Items),
            FieldKey::EnforcementGuidance => {
                self.enforcement_guidance.clone().map(FieldValue::Items)
            }
            FieldKey::ViolationCriteria => {
                self.violation_criteria.clone().map(FieldValue::Items)
            }
            FieldKey::EdgeCaseGuidance => {
                self.edge_case_guidance.clone().map(FieldValue::Items)
            }
        }
    }
}

/// Request body for initial policy generation.
#[derive(Debug, Serialize)]
pub(crate) struct GenerateInitialRequest {
    pub intent: String,
}

/// Response envelope carrying a single machine policy.
#[derive(Debug, Deserialize)]
pub(crate) struct MachinePolicyResponse {
    pub machine: PolicyDto,
}

/// Request body for example generation.
#[derive(Debug, Serialize)]
pub(crate) struct GenerateExamplesRequest {
    pub policy: PolicyDto,
}

/// Response envelope carrying generated examples.
#[derive(Debug, Deserialize)]
pub(crate) struct ExamplesResponse {
    pub examples: Vec<GeneratedExample>,
}

/// One reviewed example as the refine endpoint expects it.
#[derive(Debug, Serialize)]
pub(crate) struct ReviewedExampleDto {
    pub text: String,
    pub label: ExampleLabel,
}

impl From<&ExampleRecord> for ReviewedExampleDto {
    fn from(record: &ExampleRecord) -> Self {
        Self {
            text: record.text().to_string(),
            label: record.label(),
        }
    }
}

/// Request body for policy refinement.
#[derive(Debug, Serialize)]
pub(crate) struct RefineRequest {
    pub machine: PolicyDto,
    pub reviewed_examples: Vec<ReviewedExampleDto>,
}

/// Request body for derived policy generation.
#[derive(Debug, Serialize)]
pub(crate) struct GenerateDerivedRequest {
    pub machine: PolicyDto,
}

/// Response envelope carrying both derived policies.
#[derive(Debug, Deserialize)]
pub(crate) struct DerivedPoliciesResponse {
    pub public: PolicyDto,
    pub moderator: PolicyDto,
}

/// Response envelope for intent submission.
pub(crate) type EnrichedIntentResponse = EnrichedIntent;
