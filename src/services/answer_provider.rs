// src/services/answer_provider.rs
//! Answer extraction behind a provider seam, mirroring the embedding side

use async_trait::async_trait;

use crate::models::internal::AnswerCandidate;
use crate::services::embedding_provider::ProviderError;
use crate::services::qa_bridge_client::QaBridgeClient;

/// Trait for extractive question-answering providers
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Extract candidate answer spans for `question` from `passage`.
    /// Candidates carry model confidence scores; order is provider-defined.
    async fn find_answers(
        &self,
        question: &str,
        passage: &str,
    ) -> Result<Vec<AnswerCandidate>, ProviderError>;

    /// Bring the model into a servable state. Called once at session start.
    async fn warm_up(&self) -> Result<(), ProviderError>;
}

/// Production provider backed by the QA bridge sidecar
pub struct BridgeAnswerProvider {
    bridge: QaBridgeClient,
    model: String,
}

impl BridgeAnswerProvider {
    pub fn new(bridge: QaBridgeClient, model: String) -> Self {
        Self { bridge, model }
    }
}

#[async_trait]
impl AnswerProvider for BridgeAnswerProvider {
    async fn find_answers(
        &self,
        question: &str,
        passage: &str,
    ) -> Result<Vec<AnswerCandidate>, ProviderError> {
        self.bridge
            .find_answers(question, passage, Some(&self.model))
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))
    }

    async fn warm_up(&self) -> Result<(), ProviderError> {
        let healthy = self
            .bridge
            .health_check()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;
        if !healthy {
            return Err(ProviderError::ModelUnavailable(
                "QA bridge health check failed".to_string(),
            ));
        }

        self.bridge
            .load_model(&self.model)
            .await
            .map_err(|e| ProviderError::ModelUnavailable(e.to_string()))
    }
}

/// Mock provider for testing
pub struct MockAnswerProvider {
    pub response: Result<Vec<AnswerCandidate>, ProviderError>,
    pub warm_up_response: Result<(), ProviderError>,
    pub call_count: std::sync::Arc<std::sync::Mutex<usize>>,
}

impl MockAnswerProvider {
    /// Create a mock provider that returns the given candidates
    pub fn new_success(candidates: Vec<AnswerCandidate>) -> Self {
        Self {
            response: Ok(candidates),
            warm_up_response: Ok(()),
            call_count: std::sync::Arc::new(std::sync::Mutex::new(0)),
        }
    }

    /// Create a mock provider that warms up fine but fails extraction
    pub fn new_error(error: ProviderError) -> Self {
        Self {
            response: Err(error),
            warm_up_response: Ok(()),
            call_count: std::sync::Arc::new(std::sync::Mutex::new(0)),
        }
    }

    /// Create a mock provider whose model never loads
    pub fn new_load_failure(error: ProviderError) -> Self {
        Self {
            response: Err(error.clone()),
            warm_up_response: Err(error),
            call_count: std::sync::Arc::new(std::sync::Mutex::new(0)),
        }
    }
}

#[async_trait]
impl AnswerProvider for MockAnswerProvider {
    async fn find_answers(
        &self,
        _question: &str,
        _passage: &str,
    ) -> Result<Vec<AnswerCandidate>, ProviderError> {
        *self.call_count.lock().unwrap() += 1;
        match &self.response {
            Ok(candidates) => Ok(candidates.clone()),
            Err(err) => Err(err.clone()),
        }
    }

    async fn warm_up(&self) -> Result<(), ProviderError> {
        match &self.warm_up_response {
            Ok(()) => Ok(()),
            Err(err) => Err(err.clone()),
        }
    }
}
