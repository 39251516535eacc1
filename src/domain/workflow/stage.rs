//! The six-step pipeline stage enum.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Ordinal position in the authoring pipeline.
///
/// Stages only move forward. Regenerating examples would invalidate
/// prior labels and refining would invalidate derived documents, so
/// there is deliberately no backward transition instead of an
/// invalidation cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Collect the moderation intent.
    DefineIntent,
    /// Review and edit the generated machine policy.
    ReviewMachinePolicy,
    /// Label the synthetic examples.
    LabelExamples,
    /// Review and edit the refined machine policy.
    ReviewRefinedPolicy,
    /// Review and edit all three documents.
    ReviewDerivedPolicies,
    /// Export the bundle. Terminal.
    Download,
}

impl Stage {
    /// Zero-based position in the pipeline.
    pub fn ordinal(&self) -> u8 {
        match self {
            Stage::DefineIntent => 0,
            Stage::ReviewMachinePolicy => 1,
            Stage::LabelExamples => 2,
            Stage::ReviewRefinedPolicy => 3,
            Stage::ReviewDerivedPolicies => 4,
            Stage::Download => 5,
        }
    }

    /// The following stage, if any.
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::DefineIntent => Some(Stage::ReviewMachinePolicy),
            Stage::ReviewMachinePolicy => Some(Stage::LabelExamples),
            Stage::LabelExamples => Some(Stage::ReviewRefinedPolicy),
            Stage::ReviewRefinedPolicy => Some(Stage::ReviewDerivedPolicies),
            Stage::ReviewDerivedPolicies => Some(Stage::Download),
            Stage::Download => None,
        }
    }

    /// Short label for UI steppers and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::DefineIntent => "Define Intent",
            Stage::ReviewMachinePolicy => "Review Machine Policy",
            Stage::LabelExamples => "Label Examples",
            Stage::ReviewRefinedPolicy => "Review Refined Policy",
            Stage::ReviewDerivedPolicies => "Review Derived Policies",
            Stage::Download => "Download",
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Stage::DefineIntent
    }
}

impl StateMachine for Stage {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.next() == Some(*target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        self.next().into_iter().collect()
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Stage; 6] = [
        Stage::DefineIntent,
        Stage::ReviewMachinePolicy,
        Stage::LabelExamples,
        Stage::ReviewRefinedPolicy,
        Stage::ReviewDerivedPolicies,
        Stage::Download,
    ];

    #[test]
    fn ordinals_are_sequential() {
        for (i, stage) in ALL.iter().enumerate() {
            assert_eq!(stage.ordinal() as usize, i);
        }
    }

    #[test]
    fn next_advances_by_exactly_one() {
        for stage in &ALL {
            if let Some(next) = stage.next() {
                assert_eq!(next.ordinal(), stage.ordinal() + 1);
            }
        }
    }

    #[test]
    fn download_is_terminal() {
        assert_eq!(Stage::Download.next(), None);
        assert!(Stage::Download.is_terminal());
    }

    #[test]
    fn transitions_are_forward_only() {
        assert!(Stage::DefineIntent.can_transition_to(&Stage::ReviewMachinePolicy));
        assert!(!Stage::ReviewMachinePolicy.can_transition_to(&Stage::DefineIntent));
        assert!(!Stage::DefineIntent.can_transition_to(&Stage::LabelExamples));
        assert!(!Stage::LabelExamples.can_transition_to(&Stage::LabelExamples));
    }

    #[test]
    fn transition_to_rejects_skipping_stages() {
        assert!(Stage::DefineIntent.transition_to(Stage::Download).is_err());
        assert_eq!(
            Stage::LabelExamples.transition_to(Stage::ReviewRefinedPolicy),
            Ok(Stage::ReviewRefinedPolicy)
        );
    }

    #[test]
    fn serializes_to_snake_case() {
        assert_eq!(
            serde_json::to_string(&Stage::LabelExamples).unwrap(),
            "\"label_examples\""
        );
    }
}
