//! The three policy document variants.

use serde::{Deserialize, Serialize};

use super::field::FieldKey;

/// Which rendition of the policy a document is.
///
/// All variants are derived from the same machine policy but address
/// different audiences: end users, enforcement teams, and classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyVariant {
    /// User-facing policy published to the platform's help center.
    Public,
    /// Internal guidance for moderators and trust analysts.
    Moderator,
    /// Machine-readable policy for automated classification.
    Machine,
}

impl PolicyVariant {
    /// All variants in derivation order (machine first, then derived).
    pub fn all() -> [PolicyVariant; 3] {
        [
            PolicyVariant::Machine,
            PolicyVariant::Public,
            PolicyVariant::Moderator,
        ]
    }

    /// The canonical field set for this variant, in rendering order.
    ///
    /// This table is the authority on which fields are meaningful per
    /// variant; a document may omit any of them (absence is a valid
    /// state), but may not carry a field outside its variant's list.
    pub fn field_order(&self) -> &'static [FieldKey] {
        match self {
            PolicyVariant::Public => &[
                FieldKey::Summary,
                FieldKey::Rationale,
                FieldKey::Scope,
                FieldKey::ViolationExamples,
                FieldKey::NonViolationExamples,
                FieldKey::Faq,
            ],
            PolicyVariant::Moderator => &[
                FieldKey::Description,
                FieldKey::Scope,
                FieldKey::Rationale,
                FieldKey::ViolationExamples,
                FieldKey::NonViolationExamples,
                FieldKey::EdgeCaseNotes,
                FieldKey::EnforcementGuidance,
            ],
            PolicyVariant::Machine => &[
                FieldKey::Description,
                FieldKey::Scope,
                FieldKey::ViolationCriteria,
                FieldKey::NonViolationExamples,
                FieldKey::EdgeCaseGuidance,
            ],
        }
    }

    /// Returns true if the field is meaningful for this variant.
    pub fn carries(&self, field: FieldKey) -> bool {
        self.field_order().contains(&field)
    }

    /// Document title used as the top-level heading of the exported
    /// artifact.
    pub fn display_title(&self) -> &'static str {
        match self {
            PolicyVariant::Public => "Public Policy",
            PolicyVariant::Moderator => "Moderator Guidance",
            PolicyVariant::Machine => "Machine Policy",
        }
    }

    /// Filename of this variant's artifact inside the exported bundle.
    pub fn artifact_filename(&self) -> &'static str {
        match self {
            PolicyVariant::Public => "public-policy.md",
            PolicyVariant::Moderator => "moderator-policy.md",
            PolicyVariant::Machine => "machine-policy.md",
        }
    }
}

impl std::fmt::Display for PolicyVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PolicyVariant::Public => "public",
            PolicyVariant::Moderator => "moderator",
            PolicyVariant::Machine => "machine",
        };
        write!(f, "{}", s)
    }
}
