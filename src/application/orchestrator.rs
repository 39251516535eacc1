//! WorkflowOrchestrator - the stateful pipeline controller.
//!
//! Owns the single [`WorkflowState`] and sequences the pipeline:
//! intent → initial machine policy → example labeling → refinement →
//! derived documents → export. Presentation code holds a reference to
//! one orchestrator instance (constructed explicitly, never looked up
//! from ambient context), reads `state()`, and invokes the action
//! methods below; no other mutator exists.
//!
//! Transition rules:
//! - The stage only moves forward, one step per successful transition.
//! - A failed backend call records a stage-scoped error message and
//!   leaves the stage and all previously generated state untouched.
//! - `loading` is raised for exactly the duration of a backend call and
//!   cleared on every settle path by a scoped guard, including unwind.
//! - Local edits (`update_field`, `relabel_example`, list item edits)
//!   never change the stage and require the owning document or set to
//!   exist; invoking them earlier is a precondition violation reported
//!   as a typed error rather than a crash.
//!
//! An edit applied while a refine/generate response is in flight is not
//! merged: the response replaces the relevant document or set wholesale.
//! Exclusive ownership (`&mut self`) means callers cannot interleave an
//! edit with an in-flight call on one thread, so the replacement
//! semantics hold without extra machinery.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::example::{ExampleError, ExampleLabel, ExampleSet};
use crate::domain::export::PolicyBundle;
use crate::domain::foundation::WorkflowId;
use crate::domain::intent::IntentForm;
use crate::domain::policy::{DocumentError, FieldKey, FieldValue, PolicyVariant};
use crate::domain::workflow::{Stage, WorkflowState};
use crate::ports::{GenerationClient, GenerationFailure};

/// Errors surfaced by orchestrator actions.
///
/// `Generation` failures are also recorded on the state as the
/// stage-scoped error message; the remaining variants are precondition
/// violations (the `StateViolation` family) or invalid edits, which
/// leave the state completely untouched.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A backend call failed; the message is also stored on the state.
    #[error(transparent)]
    Generation(#[from] GenerationFailure),

    /// Action invoked at the wrong pipeline stage.
    #[error("'{action}' requires stage '{required}', but the workflow is at '{current}'")]
    WrongStage {
        action: &'static str,
        required: Stage,
        current: Stage,
    },

    /// Action invoked while a backend request is outstanding.
    #[error("a backend request is already in flight")]
    RequestInFlight,

    /// Edit invoked before the target document was generated.
    #[error("no {variant} document has been generated yet")]
    DocumentMissing { variant: PolicyVariant },

    /// Relabel invoked before any example set was generated.
    #[error("no example set has been generated yet")]
    ExamplesMissing,

    /// Invalid document edit.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Invalid example edit.
    #[error(transparent)]
    Example(#[from] ExampleError),
}

/// Clears the loading flag on every exit path, including unwind.
struct LoadingGuard<'a> {
    state: &'a mut WorkflowState,
}

impl<'a> LoadingGuard<'a> {
    fn begin(state: &'a mut WorkflowState) -> Self {
        state.set_loading(true);
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.set_loading(false);
    }
}

/// The pipeline controller.
pub struct WorkflowOrchestrator {
    id: WorkflowId,
    client: Arc<dyn GenerationClient>,
    state: WorkflowState,
}

impl WorkflowOrchestrator {
    /// Creates an orchestrator at the first stage.
    ///
    /// The generation client is the orchestrator's only collaborator;
    /// requiring it here makes "no client wired up" a construction-time
    /// failure instead of a runtime lookup failure.
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        let id = WorkflowId::new();
        tracing::info!(workflow_id = %id, "workflow created");
        Self {
            id,
            client,
            state: WorkflowState::new(),
        }
    }

    pub fn id(&self) -> WorkflowId {
        self.id
    }

    /// Read access for presentation components.
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    // ───────────────────────────────────────────────────────────────
    // Stage transitions (backend-coupled)
    // ───────────────────────────────────────────────────────────────

    /// Stage 0 → 1: submits the intent and generates the initial
    /// machine policy.
    ///
    /// Two backend calls run back to back under one loading window; a
    /// failure in either records `last_error` and stays at stage 0.
    pub async fn submit_intent(&mut self, form: IntentForm) -> Result<(), WorkflowError> {
        self.ensure_stage(Stage::DefineIntent, "submit_intent")?;
        self.ensure_idle()?;
        self.state.clear_pipeline_error();

        let client = Arc::clone(&self.client);
        let result = {
            let _guard = LoadingGuard::begin(&mut self.state);
            match client.submit_intent(&form).await {
                Ok(enriched) => client.generate_initial_policy(&enriched).await,
                Err(failure) => Err(failure),
            }
        };

        match result {
            Ok(machine) => {
                tracing::info!(workflow_id = %self.id, policy = machine.name(), "initial machine policy generated");
                self.state.set_document(machine);
                self.advance_stage();
                Ok(())
            }
            Err(failure) => Err(self.pipeline_failure("submit_intent", failure)),
        }
    }

    /// Stage 1 → 2: generates a fresh example set against the current
    /// machine policy, replacing any prior set wholesale.
    pub async fn generate_examples(&mut self) -> Result<(), WorkflowError> {
        self.ensure_stage(Stage::ReviewMachinePolicy, "generate_examples")?;
        self.ensure_idle()?;
        let machine = self
            .state
            .document(PolicyVariant::Machine)
            .cloned()
            .ok_or(WorkflowError::DocumentMissing {
                variant: PolicyVariant::Machine,
            })?;
        self.state.clear_pipeline_error();

        let client = Arc::clone(&self.client);
        let result = {
            let _guard = LoadingGuard::begin(&mut self.state);
            client.generate_examples(&machine).await
        };

        match result {
            Ok(raw) => {
                let set = ExampleSet::from_generated(raw);
                tracing::info!(workflow_id = %self.id, count = set.len(), "example set generated");
                self.state.set_examples(set);
                self.advance_stage();
                Ok(())
            }
            Err(failure) => Err(self.pipeline_failure("generate_examples", failure)),
        }
    }

    /// Stage 2 → 3: refines the machine policy against the labeled
    /// examples. The refined document replaces the old one entirely.
    ///
    /// Failures land in `refine_error` rather than `last_error`, so a
    /// retry here and a retry of the main pipeline stay independent.
    pub async fn refine_policy(&mut self) -> Result<(), WorkflowError> {
        self.ensure_stage(Stage::LabelExamples, "refine_policy")?;
        self.ensure_idle()?;
        let machine = self
            .state
            .document(PolicyVariant::Machine)
            .cloned()
            .ok_or(WorkflowError::DocumentMissing {
                variant: PolicyVariant::Machine,
            })?;
        let reviewed = self
            .state
            .examples()
            .cloned()
            .ok_or(WorkflowError::ExamplesMissing)?;
        self.state.clear_refine_error();

        let client = Arc::clone(&self.client);
        let result = {
            let _guard = LoadingGuard::begin(&mut self.state);
            client.refine_policy(&machine, &reviewed).await
        };

        match result {
            Ok(refined) => {
                tracing::info!(workflow_id = %self.id, policy = refined.name(), "machine policy refined");
                self.state.set_document(refined);
                self.advance_stage();
                Ok(())
            }
            Err(failure) => {
                tracing::warn!(workflow_id = %self.id, error = %failure, "refine_policy failed");
                self.state.record_refine_error(failure.to_string());
                Err(WorkflowError::Generation(failure))
            }
        }
    }

    /// Stage 3 → 4: derives the public and moderator documents from the
    /// refined machine policy.
    pub async fn generate_derived_policies(&mut self) -> Result<(), WorkflowError> {
        self.ensure_stage(Stage::ReviewRefinedPolicy, "generate_derived_policies")?;
        self.ensure_idle()?;
        let machine = self
            .state
            .document(PolicyVariant::Machine)
            .cloned()
            .ok_or(WorkflowError::DocumentMissing {
                variant: PolicyVariant::Machine,
            })?;
        self.state.clear_pipeline_error();

        let client = Arc::clone(&self.client);
        let result = {
            let _guard = LoadingGuard::begin(&mut self.state);
            client.generate_derived_policies(&machine).await
        };

        match result {
            Ok(derived) => {
                tracing::info!(workflow_id = %self.id, "derived policies generated");
                self.state.set_document(derived.public);
                self.state.set_document(derived.moderator);
                self.advance_stage();
                Ok(())
            }
            Err(failure) => Err(self.pipeline_failure("generate_derived_policies", failure)),
        }
    }

    /// Stage 4 → 5: local transition with no backend dependency; always
    /// succeeds once all three documents exist.
    pub fn advance(&mut self) -> Result<(), WorkflowError> {
        self.ensure_stage(Stage::ReviewDerivedPolicies, "advance")?;
        self.advance_stage();
        Ok(())
    }

    /// Stage 5: projects the three final documents into the export
    /// bundle. Pure read; the workflow stays at the terminal stage.
    pub fn export(&self) -> Result<PolicyBundle, WorkflowError> {
        self.ensure_stage(Stage::Download, "export")?;
        let public = self.require_document(PolicyVariant::Public)?;
        let moderator = self.require_document(PolicyVariant::Moderator)?;
        let machine = self.require_document(PolicyVariant::Machine)?;
        Ok(PolicyBundle::project(public, moderator, machine))
    }

    // ───────────────────────────────────────────────────────────────
    // Local edits (synchronous, never change the stage)
    // ───────────────────────────────────────────────────────────────

    /// Replaces one field of one document.
    pub fn update_field(
        &mut self,
        variant: PolicyVariant,
        field: FieldKey,
        value: impl Into<FieldValue>,
    ) -> Result<(), WorkflowError> {
        let document = self.require_document(variant)?;
        let updated = document.update_field(field, value)?;
        self.state.set_document(updated);
        Ok(())
    }

    /// Replaces one item of a list field.
    pub fn replace_list_item(
        &mut self,
        variant: PolicyVariant,
        field: FieldKey,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        let document = self.require_document(variant)?;
        let updated = document.replace_item(field, index, text)?;
        self.state.set_document(updated);
        Ok(())
    }

    /// Appends a (possibly empty) item to a list field.
    pub fn append_list_item(
        &mut self,
        variant: PolicyVariant,
        field: FieldKey,
        text: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        let document = self.require_document(variant)?;
        let updated = document.append_item(field, text)?;
        self.state.set_document(updated);
        Ok(())
    }

    /// Removes an item from a list field; the last item stays.
    pub fn remove_list_item(
        &mut self,
        variant: PolicyVariant,
        field: FieldKey,
        index: usize,
    ) -> Result<(), WorkflowError> {
        let document = self.require_document(variant)?;
        let updated = document.remove_item(field, index)?;
        self.state.set_document(updated);
        Ok(())
    }

    /// Changes the label of one example.
    pub fn relabel_example(
        &mut self,
        index: usize,
        label: ExampleLabel,
    ) -> Result<(), WorkflowError> {
        let examples = self.state.examples().ok_or(WorkflowError::ExamplesMissing)?;
        let relabeled = examples.relabel(index, label)?;
        self.state.set_examples(relabeled);
        Ok(())
    }

    // ───────────────────────────────────────────────────────────────
    // Internals
    // ───────────────────────────────────────────────────────────────

    fn ensure_stage(&self, required: Stage, action: &'static str) -> Result<(), WorkflowError> {
        let current = self.state.stage();
        if current != required {
            return Err(WorkflowError::WrongStage {
                action,
                required,
                current,
            });
        }
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), WorkflowError> {
        // Exclusive ownership already prevents overlap; this guard
        // keeps the invariant even if state is ever shared.
        if self.state.loading() {
            return Err(WorkflowError::RequestInFlight);
        }
        Ok(())
    }

    fn require_document(
        &self,
        variant: PolicyVariant,
    ) -> Result<&crate::domain::policy::PolicyDocument, WorkflowError> {
        self.state
            .document(variant)
            .ok_or(WorkflowError::DocumentMissing { variant })
    }

    fn advance_stage(&mut self) {
        if let Some(next) = self.state.stage().next() {
            tracing::info!(
                workflow_id = %self.id,
                from = %self.state.stage(),
                to = %next,
                "stage advanced"
            );
            self.state.set_stage(next);
        }
    }

    fn pipeline_failure(
        &mut self,
        action: &'static str,
        failure: GenerationFailure,
    ) -> WorkflowError {
        tracing::warn!(workflow_id = %self.id, error = %failure, "{} failed", action);
        self.state.record_pipeline_error(failure.to_string());
        WorkflowError::Generation(failure)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
