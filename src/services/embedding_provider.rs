// src/services/embedding_provider.rs

use async_trait::async_trait;
use thiserror::Error;

/// Provider-specific errors
#[derive(Debug, Error, Clone)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("No embeddings returned")]
    NoEmbeddings,
    #[error("Embedding count mismatch: asked for {expected}, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Model not available: {0}")]
    ModelUnavailable(String),
}

/// Trait for sentence-embedding providers (Ollama, etc.)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts, one vector per input text, same order
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;

    /// Bring the model into a servable state. Called once at session start.
    async fn warm_up(&self) -> Result<(), ProviderError> {
        self.embed(&["warm up".to_string()]).await.map(|_| ())
    }
}

/// Ollama provider implementation
pub struct OllamaProvider {
    ollama: ollama_rs::Ollama,
    model: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            ollama: ollama_rs::Ollama::new(base_url, 11434),
            model,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        use ollama_rs::generation::embeddings::request::{
            EmbeddingsInput, GenerateEmbeddingsRequest,
        };

        let input = EmbeddingsInput::Multiple(texts.to_vec());
        let request = GenerateEmbeddingsRequest::new(self.model.clone(), input);

        let response = self
            .ollama
            .generate_embeddings(request)
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        if response.embeddings.is_empty() {
            return Err(ProviderError::NoEmbeddings);
        }
        if response.embeddings.len() != texts.len() {
            return Err(ProviderError::CountMismatch {
                expected: texts.len(),
                actual: response.embeddings.len(),
            });
        }

        // Convert f64 to f32 for the scoring path
        let embeddings: Vec<Vec<f32>> = response
            .embeddings
            .into_iter()
            .map(|v| v.into_iter().map(|x| x as f32).collect())
            .collect();

        Ok(embeddings)
    }
}

/// Mock provider for testing
pub struct MockEmbeddingProvider {
    pub response: Result<Vec<Vec<f32>>, ProviderError>,
    pub warm_up_response: Result<(), ProviderError>,
    pub call_count: std::sync::Arc<std::sync::Mutex<usize>>,
}

impl MockEmbeddingProvider {
    /// Create a mock provider that returns the same vector for every input
    pub fn new_success(embedding: Vec<f32>) -> Self {
        Self {
            response: Ok(vec![embedding]),
            warm_up_response: Ok(()),
            call_count: std::sync::Arc::new(std::sync::Mutex::new(0)),
        }
    }

    /// Create a mock provider with one scripted vector per expected input
    pub fn new_batch(embeddings: Vec<Vec<f32>>) -> Self {
        Self {
            response: Ok(embeddings),
            warm_up_response: Ok(()),
            call_count: std::sync::Arc::new(std::sync::Mutex::new(0)),
        }
    }

    /// Create a mock provider that warms up fine but fails embedding
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
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        *self.call_count.lock().unwrap() += 1;
        // Clone the scripted result to allow multiple calls; repeat the last
        // vector when the caller asks for more texts than were scripted
        match &self.response {
            Ok(vecs) => {
                let last = vecs.last().cloned().unwrap_or_default();
                Ok((0..texts.len())
                    .map(|i| vecs.get(i).cloned().unwrap_or_else(|| last.clone()))
                    .collect())
            }
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
