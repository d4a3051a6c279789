pub mod answer_provider;
pub mod embedding_provider;
pub mod qa_bridge_client;

// Re-export for convenience
pub use answer_provider::{AnswerProvider, BridgeAnswerProvider, MockAnswerProvider};
pub use embedding_provider::{EmbeddingProvider, MockEmbeddingProvider, OllamaProvider};
pub use qa_bridge_client::QaBridgeClient;
