//! HTTP Generation Client - reqwest implementation of the port.
//!
//! Speaks the backend's JSON API:
//!
//! | Operation                  | Endpoint                       |
//! |----------------------------|--------------------------------|
//! | submit_intent              | POST /api/intent/submit        |
//! | generate_initial_policy    | POST /api/policy/generate/initial |
//! | generate_examples          | POST /api/examples/generate    |
//! | refine_policy              | POST /api/policy/refine        |
//! | generate_derived_policies  | POST /api/policy/generate/derived |
//!
//! Transport policy lives here, not in the orchestrator: every request
//! gets the configured timeout, and retryable failures (network,
//! timeout, 5xx) are retried with exponential backoff up to
//! `max_retries` before the final failure surfaces.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::sleep;

use crate::domain::example::{ExampleSet, GeneratedExample};
use crate::domain::intent::{EnrichedIntent, IntentForm};
use crate::domain::policy::{PolicyDocument, PolicyVariant};
use crate::ports::{DerivedPolicies, GenerationClient, GenerationFailure};

use super::dto::{
    DerivedPoliciesResponse, EnrichedIntentResponse, ExamplesResponse, GenerateDerivedRequest,
    GenerateExamplesRequest, GenerateInitialRequest, MachinePolicyResponse, PolicyDto,
    RefineRequest, ReviewedExampleDto,
};

/// Configuration for the HTTP generation client.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL of the generation backend, without trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
    /// Optional bearer token for deployments that front the backend
    /// with an API gateway.
    api_key: Option<Secret<String>>,
}

impl HttpClientConfig {
    /// Creates a configuration with defaults for everything but the URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 2,
            api_key: None,
        }
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the bearer token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }
}

/// Generation backend client over HTTP.
pub struct HttpGenerationClient {
    config: HttpClientConfig,
    client: Client,
}

impl HttpGenerationClient {
    /// Creates a client with the given configuration.
    pub fn new(config: HttpClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self { config, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Posts JSON and decodes JSON, retrying transient failures.
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, GenerationFailure>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        let mut attempt: u32 = 0;
        loop {
            match self.post_once(&url, body).await {
                Ok(response) => return Self::decode(response).await,
                Err(failure) if failure.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let backoff = Duration::from_millis(250u64 << attempt.min(6));
                    tracing::warn!(
                        %url,
                        attempt,
                        error = %failure,
                        "generation request failed, retrying"
                    );
                    sleep(backoff).await;
                }
                Err(failure) => return Err(failure),
            }
        }
    }

    /// Sends one request and maps transport and status errors.
    async fn post_once<B: Serialize + Sync>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<Response, GenerationFailure> {
        let mut request = self.client.post(url).json(body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GenerationFailure::Timeout {
                    timeout_secs: self.config.timeout.as_secs(),
                }
            } else if e.is_connect() {
                GenerationFailure::network(format!("Connection failed: {}", e))
            } else {
                GenerationFailure::network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(GenerationFailure::backend(
            status.as_u16(),
            Self::error_detail(&body),
        ))
    }

    async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, GenerationFailure> {
        response
            .json()
            .await
            .map_err(|e| GenerationFailure::invalid_response(e.to_string()))
    }

    /// Pulls the `detail` message out of an error body when present.
    fn error_detail(body: &str) -> String {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("detail")
                    .and_then(|detail| detail.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                if body.is_empty() {
                    "no error detail".to_string()
                } else {
                    body.to_string()
                }
            })
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn submit_intent(
        &self,
        form: &IntentForm,
    ) -> Result<EnrichedIntent, GenerationFailure> {
        tracing::debug!("submitting intent form");
        let enriched: EnrichedIntentResponse = self.post_json("/api/intent/submit", form).await?;
        Ok(enriched)
    }

    async fn generate_initial_policy(
        &self,
        intent: &EnrichedIntent,
    ) -> Result<PolicyDocument, GenerationFailure> {
        tracing::debug!("requesting initial machine policy");
        let request = GenerateInitialRequest {
            intent: intent.intent.clone(),
        };
        let response: MachinePolicyResponse =
            self.post_json("/api/policy/generate/initial", &request).await?;
        response.machine.into_document(PolicyVariant::Machine)
    }

    async fn generate_examples(
        &self,
        policy: &PolicyDocument,
    ) -> Result<Vec<GeneratedExample>, GenerationFailure> {
        tracing::debug!(policy = policy.name(), "requesting synthetic examples");
        let request = GenerateExamplesRequest {
            policy: PolicyDto::from_document(policy),
        };
        let response: ExamplesResponse =
            self.post_json("/api/examples/generate", &request).await?;
        Ok(response.examples)
    }

    async fn refine_policy(
        &self,
        policy: &PolicyDocument,
        reviewed: &ExampleSet,
    ) -> Result<PolicyDocument, GenerationFailure> {
        tracing::debug!(
            policy = policy.name(),
            examples = reviewed.len(),
            "requesting policy refinement"
        );
        let request = RefineRequest {
            machine: PolicyDto::from_document(policy),
            reviewed_examples: reviewed.records().iter().map(ReviewedExampleDto::from).collect(),
        };
        let response: MachinePolicyResponse =
            self.post_json("/api/policy/refine", &request).await?;
        response.machine.into_document(PolicyVariant::Machine)
    }

    async fn generate_derived_policies(
        &self,
        policy: &PolicyDocument,
    ) -> Result<DerivedPolicies, GenerationFailure> {
        tracing::debug!(policy = policy.name(), "requesting derived policies");
        let request = GenerateDerivedRequest {
            machine: PolicyDto::from_document(policy),
        };
        let response: DerivedPoliciesResponse =
            self.post_json("/api/policy/generate/derived", &request).await?;
        Ok(DerivedPolicies {
            public: response.public.into_document(PolicyVariant::Public)?,
            moderator: response.moderator.into_document(PolicyVariant::Moderator)?,
        })
    }
}
