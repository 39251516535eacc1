//! Example records, labels, and the ordered example set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification assigned to a synthetic example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExampleLabel {
    #[serde(rename = "violation")]
    Violation,
    #[serde(rename = "borderline")]
    Borderline,
    #[serde(rename = "non-violation")]
    NonViolation,
}

impl ExampleLabel {
    /// Wire representation of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExampleLabel::Violation => "violation",
            ExampleLabel::Borderline => "borderline",
            ExampleLabel::NonViolation => "non-violation",
        }
    }
}

impl Default for ExampleLabel {
    fn default() -> Self {
        // Unlabeled backend output is treated as undecided.
        ExampleLabel::Borderline
    }
}

impl std::fmt::Display for ExampleLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExampleLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "violation" => Ok(ExampleLabel::Violation),
            "borderline" => Ok(ExampleLabel::Borderline),
            "non-violation" => Ok(ExampleLabel::NonViolation),
            other => Err(format!("Unknown example label: {}", other)),
        }
    }
}

/// A synthetic example as returned by the generation backend, before it
/// enters a set. The label is optional on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedExample {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<ExampleLabel>,
}

/// One synthetic test case: immutable text, user-adjustable label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleRecord {
    text: String,
    label: ExampleLabel,
}

impl ExampleRecord {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn label(&self) -> ExampleLabel {
        self.label
    }
}

/// Errors from example set operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExampleError {
    #[error("Example index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// The ordered set of synthetic examples for one machine-policy
/// revision.
///
/// Order is presentation order: the set never deduplicates or reorders,
/// and relabeling preserves positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleSet {
    records: Vec<ExampleRecord>,
    generated_at: DateTime<Utc>,
}

impl ExampleSet {
    /// Builds a fresh set from backend output, defaulting any missing
    /// label to [`ExampleLabel::Borderline`].
    pub fn from_generated(raw: Vec<GeneratedExample>) -> Self {
        let records = raw
            .into_iter()
            .map(|example| ExampleRecord {
                text: example.text,
                label: example.label.unwrap_or_default(),
            })
            .collect();
        Self {
            records,
            generated_at: Utc::now(),
        }
    }

    /// Returns a new set with only the label at `index` replaced.
    pub fn relabel(&self, index: usize, label: ExampleLabel) -> Result<Self, ExampleError> {
        if index >= self.records.len() {
            return Err(ExampleError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        let mut next = self.clone();
        next.records[index].label = label;
        Ok(next)
    }

    pub fn records(&self) -> &[ExampleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Labels in presentation order. Handy in tests and logs.
    pub fn labels(&self) -> Vec<ExampleLabel> {
        self.records.iter().map(|record| record.label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(text: &str, label: Option<ExampleLabel>) -> GeneratedExample {
        GeneratedExample {
            text: text.to_string(),
            label,
        }
    }

    #[test]
    fn missing_labels_default_to_borderline() {
        let set = ExampleSet::from_generated(vec![
            generated("clear violation", Some(ExampleLabel::Violation)),
            generated("unlabeled", None),
        ]);
        assert_eq!(
            set.labels(),
            vec![ExampleLabel::Violation, ExampleLabel::Borderline]
        );
    }

    #[test]
    fn relabel_changes_exactly_one_record() {
        let set = ExampleSet::from_generated(vec![
            generated("a", Some(ExampleLabel::Violation)),
            generated("b", None),
            generated("c", Some(ExampleLabel::NonViolation)),
        ]);
        let relabeled = set.relabel(1, ExampleLabel::NonViolation).unwrap();

        assert_eq!(
            relabeled.labels(),
            vec![
                ExampleLabel::Violation,
                ExampleLabel::NonViolation,
                ExampleLabel::NonViolation,
            ]
        );
        // Text and order untouched.
        let texts: Vec<&str> = relabeled.records().iter().map(|r| r.text()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        // Original set unchanged.
        assert_eq!(set.records()[1].label(), ExampleLabel::Borderline);
    }

    #[test]
    fn relabel_rejects_out_of_range_index() {
        let set = ExampleSet::from_generated(vec![generated("a", None)]);
        assert_eq!(
            set.relabel(1, ExampleLabel::Violation),
            Err(ExampleError::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn label_wire_names_match_backend_contract() {
        assert_eq!(
            serde_json::to_string(&ExampleLabel::NonViolation).unwrap(),
            "\"non-violation\""
        );
        assert_eq!(
            serde_json::from_str::<ExampleLabel>("\"borderline\"").unwrap(),
            ExampleLabel::Borderline
        );
    }

    #[test]
    fn generated_example_tolerates_absent_label() {
        let parsed: GeneratedExample =
            serde_json::from_str("{\"text\":\"hi\"}").unwrap();
        assert_eq!(parsed.label, None);
    }
}
