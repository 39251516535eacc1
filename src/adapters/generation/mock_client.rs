//! Mock Generation Client for testing.
//!
//! Serves scripted responses per operation, injects failures, and
//! records every call with the inputs that matter for assertions, so
//! orchestrator tests run without a backend.
//!
//! # Example
//!
//! ```ignore
//! let client = MockGenerationClient::new()
//!     .with_enriched_intent(EnrichedIntent::from_text("enriched"))
//!     .with_initial_policy(machine_doc());
//!
//! let orchestrator = WorkflowOrchestrator::new(Arc::new(client));
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::example::{ExampleLabel, ExampleSet, GeneratedExample};
use crate::domain::intent::{EnrichedIntent, IntentForm};
use crate::domain::policy::PolicyDocument;
use crate::ports::{DerivedPolicies, GenerationClient, GenerationFailure};

/// A recorded call with the inputs tests care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    SubmitIntent { platform_type: String },
    GenerateInitialPolicy { intent: String },
    GenerateExamples { policy_name: String },
    RefinePolicy {
        policy_name: String,
        labels: Vec<ExampleLabel>,
    },
    GenerateDerivedPolicies { policy_name: String },
}

type Queue<T> = Mutex<VecDeque<Result<T, GenerationFailure>>>;

/// Scripted implementation of the `GenerationClient` port.
///
/// Responses queue per operation and are consumed in order; an
/// exhausted queue fails the call, which keeps a test honest about how
/// many backend round-trips it expects.
#[derive(Default)]
pub struct MockGenerationClient {
    enriched_intents: Queue<EnrichedIntent>,
    initial_policies: Queue<PolicyDocument>,
    example_batches: Queue<Vec<GeneratedExample>>,
    refined_policies: Queue<PolicyDocument>,
    derived_policies: Queue<DerivedPolicies>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockGenerationClient {
    /// Creates a mock with empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful intent enrichment.
    pub fn with_enriched_intent(self, enriched: EnrichedIntent) -> Self {
        self.enriched_intents.lock().unwrap().push_back(Ok(enriched));
        self
    }

    /// Queues a successful initial policy.
    pub fn with_initial_policy(self, policy: PolicyDocument) -> Self {
        self.initial_policies.lock().unwrap().push_back(Ok(policy));
        self
    }

    /// Queues a successful example batch.
    pub fn with_examples(self, examples: Vec<GeneratedExample>) -> Self {
        self.example_batches.lock().unwrap().push_back(Ok(examples));
        self
    }

    /// Queues a successful refined policy.
    pub fn with_refined_policy(self, policy: PolicyDocument) -> Self {
        self.refined_policies.lock().unwrap().push_back(Ok(policy));
        self
    }

    /// Queues a successful derived-policies response.
    pub fn with_derived_policies(
        self,
        public: PolicyDocument,
        moderator: PolicyDocument,
    ) -> Self {
        self.derived_policies
            .lock()
            .unwrap()
            .push_back(Ok(DerivedPolicies { public, moderator }));
        self
    }

    /// Queues a failure for intent submission.
    pub fn with_submit_intent_error(self, failure: GenerationFailure) -> Self {
        self.enriched_intents.lock().unwrap().push_back(Err(failure));
        self
    }

    /// Queues a failure for initial policy generation.
    pub fn with_initial_policy_error(self, failure: GenerationFailure) -> Self {
        self.initial_policies.lock().unwrap().push_back(Err(failure));
        self
    }

    /// Queues a failure for example generation.
    pub fn with_examples_error(self, failure: GenerationFailure) -> Self {
        self.example_batches.lock().unwrap().push_back(Err(failure));
        self
    }

    /// Queues a failure for refinement.
    pub fn with_refine_error(self, failure: GenerationFailure) -> Self {
        self.refined_policies.lock().unwrap().push_back(Err(failure));
        self
    }

    /// Queues a failure for derived policy generation.
    pub fn with_derived_error(self, failure: GenerationFailure) -> Self {
        self.derived_policies.lock().unwrap().push_back(Err(failure));
        self
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn take<T>(queue: &Queue<T>, operation: &str) -> Result<T, GenerationFailure> {
        queue.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(GenerationFailure::invalid_response(format!(
                "no mock response queued for {}",
                operation
            )))
        })
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn submit_intent(
        &self,
        form: &IntentForm,
    ) -> Result<EnrichedIntent, GenerationFailure> {
        self.record(MockCall::SubmitIntent {
            platform_type: form.platform_type.clone(),
        });
        Self::take(&self.enriched_intents, "submit_intent")
    }

    async fn generate_initial_policy(
        &self,
        intent: &EnrichedIntent,
    ) -> Result<PolicyDocument, GenerationFailure> {
        self.record(MockCall::GenerateInitialPolicy {
            intent: intent.intent.clone(),
        });
        Self::take(&self.initial_policies, "generate_initial_policy")
    }

    async fn generate_examples(
        &self,
        policy: &PolicyDocument,
    ) -> Result<Vec<GeneratedExample>, GenerationFailure> {
        self.record(MockCall::GenerateExamples {
            policy_name: policy.name().to_string(),
        });
        Self::take(&self.example_batches, "generate_examples")
    }

    async fn refine_policy(
        &self,
        policy: &PolicyDocument,
        reviewed: &ExampleSet,
    ) -> Result<PolicyDocument, GenerationFailure> {
        self.record(MockCall::RefinePolicy {
            policy_name: policy.name().to_string(),
            labels: reviewed.labels(),
        });
        Self::take(&self.refined_policies, "refine_policy")
    }

    async fn generate_derived_policies(
        &self,
        policy: &PolicyDocument,
    ) -> Result<DerivedPolicies, GenerationFailure> {
        self.record(MockCall::GenerateDerivedPolicies {
            policy_name: policy.name().to_string(),
        });
        Self::take(&self.derived_policies, "generate_derived_policies")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::policy::{FieldKey, PolicyVariant};

    fn machine_doc(name: &str) -> PolicyDocument {
        PolicyDocument::new(PolicyVariant::Machine, name)
            .unwrap()
            .with_field(FieldKey::Description, "d")
            .unwrap()
    }

    fn intent_form() -> IntentForm {
        IntentForm::new("social media", "gaming", "spam", "brand", "strict", "").unwrap()
    }

    #[tokio::test]
    async fn serves_queued_responses_in_order() {
        let client = MockGenerationClient::new()
            .with_initial_policy(machine_doc("first"))
            .with_initial_policy(machine_doc("second"));

        let intent = EnrichedIntent::from_text("i");
        let first = client.generate_initial_policy(&intent).await.unwrap();
        let second = client.generate_initial_policy(&intent).await.unwrap();
        assert_eq!(first.name(), "first");
        assert_eq!(second.name(), "second");
    }

    #[tokio::test]
    async fn exhausted_queue_fails_the_call() {
        let client = MockGenerationClient::new();
        let result = client.submit_intent(&intent_form()).await;
        assert!(matches!(result, Err(GenerationFailure::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn queued_errors_surface() {
        let client = MockGenerationClient::new()
            .with_examples_error(GenerationFailure::backend(503, "overloaded"));
        let result = client.generate_examples(&machine_doc("p")).await;
        assert!(matches!(result, Err(GenerationFailure::Backend { status: 503, .. })));
    }

    #[tokio::test]
    async fn records_calls_with_inputs() {
        let client = MockGenerationClient::new()
            .with_enriched_intent(EnrichedIntent::from_text("enriched"));
        client.submit_intent(&intent_form()).await.unwrap();

        assert_eq!(
            client.calls(),
            vec![MockCall::SubmitIntent {
                platform_type: "social media".to_string()
            }]
        );
    }
}
