//! Colloquy - extractive question-answering chat sessions

pub mod config;
pub mod models;
pub mod orchestrator;
pub mod services;

// Re-export for convenience
pub use services::answer_provider::{AnswerProvider, BridgeAnswerProvider, MockAnswerProvider};
pub use services::embedding_provider::{
    EmbeddingProvider, MockEmbeddingProvider, OllamaProvider,
};
pub use services::qa_bridge_client::QaBridgeClient;

// Re-export main types for convenience
pub use crate::config::Config;
pub use crate::models::internal::{AnswerCandidate, ConversationTurn, NewTurn, SelectedAnswer};
pub use crate::orchestrator::conversation::ConversationLog;
pub use crate::orchestrator::lifecycle::{LifecycleError, ModelLifecycle, Readiness};
pub use crate::orchestrator::pipeline::{
    QueryPipeline, RerankPolicy, EMPTY_QUESTION_ANSWER, NO_ANSWER_FALLBACK,
    SERVICE_FAILURE_ANSWER,
};
pub use crate::orchestrator::{ChatSession, SessionError, SessionEvent};
