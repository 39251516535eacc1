//! Generation Client Port - Interface to the policy generation backend.
//!
//! The backend is an external service that turns intents into policy
//! documents and synthetic examples. Its internal reasoning is opaque;
//! the workflow depends only on the five request/response contracts
//! below. Transport mechanics (timeouts, retries) belong to the adapter
//! implementing this port, never to the orchestrator.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct StubClient;
//!
//! #[async_trait]
//! impl GenerationClient for StubClient {
//!     async fn submit_intent(&self, form: &IntentForm) -> Result<EnrichedIntent, GenerationFailure> {
//!         Ok(EnrichedIntent::from_text("enriched"))
//!     }
//!     // ... other operations
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::example::{ExampleSet, GeneratedExample};
use crate::domain::intent::{EnrichedIntent, IntentForm};
use crate::domain::policy::PolicyDocument;

/// The public and moderator documents derived from a machine policy,
/// returned together by one backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedPolicies {
    pub public: PolicyDocument,
    pub moderator: PolicyDocument,
}

/// Port for the external generation backend.
///
/// One method per workflow transition that needs generated content.
/// Every operation either succeeds with domain values or fails with a
/// [`GenerationFailure`]; the orchestrator distinguishes no finer
/// failure kind.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Normalizes and enriches the raw intent form.
    ///
    /// The response is opaque to the workflow except for the `intent`
    /// text it forwards into [`Self::generate_initial_policy`].
    async fn submit_intent(&self, form: &IntentForm)
        -> Result<EnrichedIntent, GenerationFailure>;

    /// Generates the first machine policy from an enriched intent.
    async fn generate_initial_policy(
        &self,
        intent: &EnrichedIntent,
    ) -> Result<PolicyDocument, GenerationFailure>;

    /// Generates synthetic examples against a machine policy.
    ///
    /// A fresh batch every call; the caller replaces any prior set
    /// wholesale rather than merging.
    async fn generate_examples(
        &self,
        policy: &PolicyDocument,
    ) -> Result<Vec<GeneratedExample>, GenerationFailure>;

    /// Refines a machine policy against the user-labeled examples.
    ///
    /// The response is a full replacement document, not a diff.
    async fn refine_policy(
        &self,
        policy: &PolicyDocument,
        reviewed: &ExampleSet,
    ) -> Result<PolicyDocument, GenerationFailure>;

    /// Derives the public and moderator documents from the (possibly
    /// refined) machine policy.
    async fn generate_derived_policies(
        &self,
        policy: &PolicyDocument,
    ) -> Result<DerivedPolicies, GenerationFailure>;
}

/// Failure of a generation backend call.
///
/// Carries a human-readable message in every variant; the orchestrator
/// stores only the display text as a stage-scoped error.
#[derive(Debug, Clone, Error)]
pub enum GenerationFailure {
    /// Backend responded with a non-success status.
    #[error("generation backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// Network-level failure reaching the backend.
    #[error("network error: {0}")]
    Network(String),

    /// The adapter's configured timeout elapsed.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Backend responded but the payload was not the expected shape.
    #[error("invalid backend response: {0}")]
    InvalidResponse(String),
}

impl GenerationFailure {
    /// Creates a backend error.
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Returns true if retrying the same request may succeed.
    ///
    /// Used by the HTTP adapter's bounded retry; parse failures and
    /// client errors are not retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationFailure::Network(_) | GenerationFailure::Timeout { .. } => true,
            GenerationFailure::Backend { status, .. } => *status >= 500,
            GenerationFailure::InvalidResponse(_) => false,
        }
    }
}
