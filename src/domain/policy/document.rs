//! The policy document value object and its edit operations.
//!
//! Documents are immutable values: every edit produces a new document
//! with exactly the targeted field replaced, so the three structurally
//! similar variants can never alias each other's state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::field::{FieldKey, FieldKind, FieldValue};
use super::variant::PolicyVariant;

/// Structured classification hint carried by the machine variant.
///
/// Produced by the generation backend and passed through opaquely; the
/// orchestrator never edits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFormat {
    #[serde(rename = "type")]
    pub output_type: String,
    pub labels: Vec<String>,
    pub confidence_required: bool,
}

/// Enforcement severity carried by the moderator variant.
///
/// Like [`OutputFormat`], a backend-produced hint: not editable through
/// the field table and excluded from the rendered body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

/// Errors from document edit operations.
///
/// Every precondition violation is a typed error rather than a silent
/// no-op, so API misuse surfaces consistently in tests and at the UI
/// boundary alike.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("Document name cannot be empty")]
    EmptyName,

    #[error("Field '{field}' is not meaningful for the {variant} variant")]
    NotApplicable {
        field: FieldKey,
        variant: PolicyVariant,
    },

    #[error("Field '{field}' expects {expected:?} content")]
    KindMismatch { field: FieldKey, expected: FieldKind },

    #[error("Field '{field}' is not present on this document")]
    FieldMissing { field: FieldKey },

    #[error("Index {index} out of range for field '{field}' (len {len})")]
    IndexOutOfRange {
        field: FieldKey,
        index: usize,
        len: usize,
    },

    #[error("Field '{field}' must retain at least one item")]
    LastItem { field: FieldKey },
}

/// One policy document: a variant, an immutable name, and the subset of
/// canonical fields the backend populated (plus any the user added).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    variant: PolicyVariant,
    name: String,
    fields: BTreeMap<FieldKey, FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output_format: Option<OutputFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    severity: Option<Severity>,
}

impl PolicyDocument {
    /// Creates an empty document for the given variant.
    ///
    /// The name is set at creation and immutable for the session.
    pub fn new(
        variant: PolicyVariant,
        name: impl Into<String>,
    ) -> Result<Self, DocumentError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DocumentError::EmptyName);
        }
        Ok(Self {
            variant,
            name,
            fields: BTreeMap::new(),
            output_format: None,
            severity: None,
        })
    }

    /// Builder: sets a field, validating applicability and kind.
    pub fn with_field(
        mut self,
        field: FieldKey,
        value: impl Into<FieldValue>,
    ) -> Result<Self, DocumentError> {
        let value = value.into();
        self.check_assignment(field, &value)?;
        self.fields.insert(field, value);
        Ok(self)
    }

    /// Builder: attaches the machine-variant output format hint.
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    /// Builder: attaches the moderator-variant severity hint.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn variant(&self) -> PolicyVariant {
        self.variant
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current value of a field, if populated.
    pub fn field(&self, field: FieldKey) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    pub fn output_format(&self) -> Option<&OutputFormat> {
        self.output_format.as_ref()
    }

    pub fn severity(&self) -> Option<Severity> {
        self.severity
    }

    /// Populated fields in the variant's canonical rendering order.
    ///
    /// Fields absent from the document are skipped; absence is a valid
    /// state, not an error.
    pub fn ordered_fields(&self) -> impl Iterator<Item = (FieldKey, &FieldValue)> {
        self.variant
            .field_order()
            .iter()
            .filter_map(move |key| self.fields.get(key).map(|value| (*key, value)))
    }

    /// Returns a new document with exactly `field` replaced by `value`.
    ///
    /// Fails if the field is not meaningful for this variant or the
    /// value's shape does not match the field's declared kind. The
    /// receiver is never mutated.
    pub fn update_field(
        &self,
        field: FieldKey,
        value: impl Into<FieldValue>,
    ) -> Result<Self, DocumentError> {
        let value = value.into();
        self.check_assignment(field, &value)?;
        let mut next = self.clone();
        next.fields.insert(field, value);
        Ok(next)
    }

    /// Returns a new document with item `index` of a list field replaced.
    pub fn replace_item(
        &self,
        field: FieldKey,
        index: usize,
        text: impl Into<String>,
    ) -> Result<Self, DocumentError> {
        let items = self.list_items(field)?;
        if index >= items.len() {
            return Err(DocumentError::IndexOutOfRange {
                field,
                index,
                len: items.len(),
            });
        }
        let mut items = items.to_vec();
        items[index] = text.into();
        self.replaced(field, items)
    }

    /// Returns a new document with a (possibly empty) item appended to a
    /// list field. Appending to an absent list field starts it.
    pub fn append_item(
        &self,
        field: FieldKey,
        text: impl Into<String>,
    ) -> Result<Self, DocumentError> {
        if field.kind() != FieldKind::Items {
            return Err(DocumentError::KindMismatch {
                field,
                expected: field.kind(),
            });
        }
        if !self.variant.carries(field) {
            return Err(DocumentError::NotApplicable {
                field,
                variant: self.variant,
            });
        }
        let mut items = match self.fields.get(&field) {
            Some(FieldValue::Items(items)) => items.clone(),
            Some(FieldValue::Prose(_)) => {
                return Err(DocumentError::KindMismatch {
                    field,
                    expected: FieldKind::Items,
                })
            }
            None => Vec::new(),
        };
        items.push(text.into());
        self.replaced(field, items)
    }

    /// Returns a new document with item `index` removed from a list
    /// field. Removing the last remaining item is rejected so a list can
    /// never shrink to empty through the edit API.
    pub fn remove_item(&self, field: FieldKey, index: usize) -> Result<Self, DocumentError> {
        let items = self.list_items(field)?;
        if index >= items.len() {
            return Err(DocumentError::IndexOutOfRange {
                field,
                index,
                len: items.len(),
            });
        }
        if items.len() == 1 {
            return Err(DocumentError::LastItem { field });
        }
        let mut items = items.to_vec();
        items.remove(index);
        self.replaced(field, items)
    }

    fn check_assignment(
        &self,
        field: FieldKey,
        value: &FieldValue,
    ) -> Result<(), DocumentError> {
        if !self.variant.carries(field) {
            return Err(DocumentError::NotApplicable {
                field,
                variant: self.variant,
            });
        }
        if value.kind() != field.kind() {
            return Err(DocumentError::KindMismatch {
                field,
                expected: field.kind(),
            });
        }
        Ok(())
    }

    fn list_items(&self, field: FieldKey) -> Result<&[String], DocumentError> {
        match self.fields.get(&field) {
            Some(FieldValue::Items(items)) => Ok(items),
            Some(FieldValue::Prose(_)) => Err(DocumentError::KindMismatch {
                field,
                expected: FieldKind::Items,
            }),
            None => Err(DocumentError::FieldMissing { field }),
        }
    }

    fn replaced(&self, field: FieldKey, items: Vec<String>) -> Result<Self, DocumentError> {
        let mut next = self.clone();
        next.fields.insert(field, FieldValue::Items(items));
        Ok(next)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
