//! The canonical field vocabulary shared by all policy variants.
//!
//! Field identity determines edit semantics: a field key is either prose
//! (edited as a whole) or an itemized list (edited per item). The mapping
//! is fixed and external to any single document instance.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Keys of the canonical field table.
///
/// Unknown field keys are unrepresentable in the domain; raw strings from
/// the wire are parsed through [`FromStr`] and rejected there.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Summary,
    Rationale,
    Scope,
    Description,
    ViolationExamples,
    NonViolationExamples,
    Faq,
    EdgeCaseNotes,
    EnforcementGuidance,
    ViolationCriteria,
    EdgeCaseGuidance,
}

/// The edit shape a field key admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Opaque formatted text, replaced as a whole.
    Prose,
    /// Ordered list of short text items, edited per item.
    Items,
}

impl FieldKey {
    /// The declared kind of this field. Fixed for the session.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldKey::Summary
            | FieldKey::Rationale
            | FieldKey::Scope
            | FieldKey::Description => FieldKind::Prose,
            FieldKey::ViolationExamples
            | FieldKey::NonViolationExamples
            | FieldKey::Faq
            | FieldKey::EdgeCaseNotes
            | FieldKey::EnforcementGuidance
            | FieldKey::ViolationCriteria
            | FieldKey::EdgeCaseGuidance => FieldKind::Items,
        }
    }

    /// Snake-case key as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Summary => "summary",
            FieldKey::Rationale => "rationale",
            FieldKey::Scope => "scope",
            FieldKey::Description => "description",
            FieldKey::ViolationExamples => "violation_examples",
            FieldKey::NonViolationExamples => "non_violation_examples",
            FieldKey::Faq => "faq",
            FieldKey::EdgeCaseNotes => "edge_case_notes",
            FieldKey::EnforcementGuidance => "enforcement_guidance",
            FieldKey::ViolationCriteria => "violation_criteria",
            FieldKey::EdgeCaseGuidance => "edge_case_guidance",
        }
    }

    /// Humanized heading for rendered documents: the key with underscores
    /// replaced by spaces and the first letter capitalized.
    pub fn display_name(&self) -> String {
        let key = self.as_str().replace('_', " ");
        let mut chars = key.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => key,
        }
    }

    /// All field keys in declaration order.
    pub fn all() -> &'static [FieldKey] {
        &[
            FieldKey::Summary,
            FieldKey::Rationale,
            FieldKey::Scope,
            FieldKey::Description,
            FieldKey::ViolationExamples,
            FieldKey::NonViolationExamples,
            FieldKey::Faq,
            FieldKey::EdgeCaseNotes,
            FieldKey::EnforcementGuidance,
            FieldKey::ViolationCriteria,
            FieldKey::EdgeCaseGuidance,
        ]
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKey::all()
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown policy field: {}", s))
    }
}

/// The value a field currently holds.
///
/// The variant must agree with the owning key's [`FieldKind`]; the
/// document model enforces this at every edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Prose content, rendered verbatim.
    Prose(String),
    /// Ordered list items, rendered one bullet per item.
    Items(Vec<String>),
}

impl FieldValue {
    /// The kind this value satisfies.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Prose(_) => FieldKind::Prose,
            FieldValue::Items(_) => FieldKind::Items,
        }
    }

    /// Returns true for the empty prose string or the empty list.
    ///
    /// Empty fields are omitted from rendered documents.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Prose(text) => text.is_empty(),
            FieldValue::Items(items) => items.is_empty(),
        }
    }

    /// Prose content, if this is a prose value.
    pub fn as_prose(&self) -> Option<&str> {
        match self {
            FieldValue::Prose(text) => Some(text),
            FieldValue::Items(_) => None,
        }
    }

    /// List items, if this is an items value.
    pub fn as_items(&self) -> Option<&[String]> {
        match self {
            FieldValue::Prose(_) => None,
            FieldValue::Items(items) => Some(items),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Prose(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Prose(text)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::Items(items)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        FieldValue::Items(items.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prose_keys_have_prose_kind() {
        for key in [
            FieldKey::Summary,
            FieldKey::Rationale,
            FieldKey::Scope,
            FieldKey::Description,
        ] {
            assert_eq!(key.kind(), FieldKind::Prose);
        }
    }

    #[test]
    fn list_keys_have_items_kind() {
        for key in [
            FieldKey::ViolationExamples,
            FieldKey::NonViolationExamples,
            FieldKey::Faq,
            FieldKey::EdgeCaseNotes,
            FieldKey::EnforcementGuidance,
            FieldKey::ViolationCriteria,
            FieldKey::EdgeCaseGuidance,
        ] {
            assert_eq!(key.kind(), FieldKind::Items);
        }
    }

    #[test]
    fn display_name_humanizes_key() {
        assert_eq!(FieldKey::ViolationExamples.display_name(), "Violation examples");
        assert_eq!(FieldKey::Summary.display_name(), "Summary");
        assert_eq!(FieldKey::Faq.display_name(), "Faq");
    }

    #[test]
    fn parses_every_wire_key() {
        for key in FieldKey::all() {
            assert_eq!(key.as_str().parse::<FieldKey>().unwrap(), *key);
        }
    }

    #[test]
    fn rejects_unknown_wire_key() {
        assert!("severity".parse::<FieldKey>().is_err());
        assert!("".parse::<FieldKey>().is_err());
    }

    #[test]
    fn serde_key_matches_as_str() {
        for key in FieldKey::all() {
            let json = serde_json::to_string(key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
    }

    #[test]
    fn field_value_emptiness() {
        assert!(FieldValue::Prose(String::new()).is_empty());
        assert!(FieldValue::Items(vec![]).is_empty());
        assert!(!FieldValue::from("text").is_empty());
        assert!(!FieldValue::from(vec!["a"]).is_empty());
    }

    #[test]
    fn field_value_untagged_serde() {
        let prose: FieldValue = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(prose, FieldValue::from("hello"));

        let items: FieldValue = serde_json::from_str("[\"a\",\"b\"]").unwrap();
        assert_eq!(items, FieldValue::from(vec!["a", "b"]));
    }
}
