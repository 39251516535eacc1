//! Markdown rendering of policy documents.
//!
//! Stateless projection: a document renders to one markdown artifact
//! with the variant's display title as the top-level heading and one
//! `##` section per populated field, in canonical order. Empty fields
//! produce no heading at all; `name`, `output_format`, and `severity`
//! never appear in the body.

use crate::domain::policy::{FieldValue, PolicyDocument, PolicyVariant};

/// One rendered document, ready to write or download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyArtifact {
    /// Filename inside the bundle (fixed per variant).
    pub filename: String,
    /// Rendered markdown content.
    pub content: String,
}

/// The complete export: one artifact per variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyBundle {
    artifacts: Vec<PolicyArtifact>,
}

impl PolicyBundle {
    /// Projects the three final documents into their artifacts.
    ///
    /// Pure: no state-machine behavior, no side effects. Artifact order
    /// is public, moderator, machine to match the bundle listing users
    /// see.
    pub fn project(
        public: &PolicyDocument,
        moderator: &PolicyDocument,
        machine: &PolicyDocument,
    ) -> Self {
        let artifacts = [public, moderator, machine]
            .into_iter()
            .map(|document| PolicyArtifact {
                filename: document.variant().artifact_filename().to_string(),
                content: render_policy_markdown(document),
            })
            .collect();
        Self { artifacts }
    }

    pub fn artifacts(&self) -> &[PolicyArtifact] {
        &self.artifacts
    }

    /// The artifact for a given variant.
    pub fn artifact(&self, variant: PolicyVariant) -> Option<&PolicyArtifact> {
        self.artifacts
            .iter()
            .find(|artifact| artifact.filename == variant.artifact_filename())
    }
}

/// Renders one document to markdown.
///
/// Prose fields follow their heading after a blank line; list fields
/// render one `- ` bullet per item directly under the heading.
pub fn render_policy_markdown(document: &PolicyDocument) -> String {
    let mut sections = vec![format!("# {}", document.variant().display_title())];

    for (key, value) in document.ordered_fields() {
        if value.is_empty() {
            continue;
        }
        let body = match value {
            FieldValue::Prose(text) => format!("## {}\n\n{}", key.display_name(), text),
            FieldValue::Items(items) => {
                let bullets: Vec<String> =
                    items.iter().map(|item| format!("- {}", item)).collect();
                format!("## {}\n{}", key.display_name(), bullets.join("\n"))
            }
        };
        sections.push(body);
    }

    sections.join("\n\n")
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
