//! The orchestrator's full mutable state.

use serde::{Deserialize, Serialize};

use crate::domain::example::ExampleSet;
use crate::domain::policy::{PolicyDocument, PolicyVariant};

use super::Stage;

/// Everything the workflow holds between actions.
///
/// Owned exclusively by the orchestrator; presentation components get a
/// read reference. Documents and the example set are `None` until the
/// transition that generates them succeeds. `last_error` carries the
/// failure of the main pipeline transitions, `refine_error` the failure
/// of the labeling → refine transition, so a user can retry either
/// independently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowState {
    stage: Stage,
    machine: Option<PolicyDocument>,
    public: Option<PolicyDocument>,
    moderator: Option<PolicyDocument>,
    examples: Option<ExampleSet>,
    loading: bool,
    last_error: Option<String>,
    refine_error: Option<String>,
}

impl WorkflowState {
    /// Fresh state at the first stage with nothing generated.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn refine_error(&self) -> Option<&str> {
        self.refine_error.as_deref()
    }

    /// The current document for a variant, if generated.
    pub fn document(&self, variant: PolicyVariant) -> Option<&PolicyDocument> {
        match variant {
            PolicyVariant::Machine => self.machine.as_ref(),
            PolicyVariant::Public => self.public.as_ref(),
            PolicyVariant::Moderator => self.moderator.as_ref(),
        }
    }

    pub fn examples(&self) -> Option<&ExampleSet> {
        self.examples.as_ref()
    }

    /// True once all three documents exist.
    pub fn all_documents_present(&self) -> bool {
        self.machine.is_some() && self.public.is_some() && self.moderator.is_some()
    }

    // Mutators below are crate-internal: only orchestrator transitions
    // may change state.

    pub(crate) fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub(crate) fn set_document(&mut self, document: PolicyDocument) {
        match document.variant() {
            PolicyVariant::Machine => self.machine = Some(document),
            PolicyVariant::Public => self.public = Some(document),
            PolicyVariant::Moderator => self.moderator = Some(document),
        }
    }

    /// Replaces the example set wholesale, discarding any prior set.
    pub(crate) fn set_examples(&mut self, examples: ExampleSet) {
        self.examples = Some(examples);
    }

    pub(crate) fn record_pipeline_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub(crate) fn clear_pipeline_error(&mut self) {
        self.last_error = None;
    }

    pub(crate) fn record_refine_error(&mut self, message: impl Into<String>) {
        self.refine_error = Some(message.into());
    }

    pub(crate) fn clear_refine_error(&mut self) {
        self.refine_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::example::{ExampleSet, GeneratedExample};
    use crate::domain::policy::FieldKey;

    fn machine_doc() -> PolicyDocument {
        PolicyDocument::new(PolicyVariant::Machine, "P")
            .unwrap()
            .with_field(FieldKey::Description, "d")
            .unwrap()
    }

    #[test]
    fn fresh_state_is_stage_zero_with_nothing_generated() {
        let state = WorkflowState::new();
        assert_eq!(state.stage(), Stage::DefineIntent);
        assert!(state.document(PolicyVariant::Machine).is_none());
        assert!(state.examples().is_none());
        assert!(!state.loading());
        assert!(state.last_error().is_none());
        assert!(state.refine_error().is_none());
    }

    #[test]
    fn set_document_routes_by_variant() {
        let mut state = WorkflowState::new();
        state.set_document(machine_doc());
        assert!(state.document(PolicyVariant::Machine).is_some());
        assert!(state.document(PolicyVariant::Public).is_none());
        assert!(!state.all_documents_present());
    }

    #[test]
    fn set_examples_replaces_prior_set() {
        let mut state = WorkflowState::new();
        state.set_examples(ExampleSet::from_generated(vec![GeneratedExample {
            text: "old".to_string(),
            label: None,
        }]));
        state.set_examples(ExampleSet::from_generated(vec![
            GeneratedExample {
                text: "new-1".to_string(),
                label: None,
            },
            GeneratedExample {
                text: "new-2".to_string(),
                label: None,
            },
        ]));
        let set = state.examples().unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.records()[0].text(), "new-1");
    }

    #[test]
    fn error_slots_are_independent() {
        let mut state = WorkflowState::new();
        state.record_pipeline_error("pipeline boom");
        state.record_refine_error("refine boom");
        state.clear_pipeline_error();
        assert!(state.last_error().is_none());
        assert_eq!(state.refine_error(), Some("refine boom"));
    }
}
