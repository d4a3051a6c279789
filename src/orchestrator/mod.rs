pub mod conversation;
pub mod lifecycle;
pub mod pipeline;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tracing::info;

use crate::config::Config;
use crate::models::internal::{ConversationTurn, SelectedAnswer};
use crate::services::answer_provider::{AnswerProvider, BridgeAnswerProvider};
use crate::services::embedding_provider::{EmbeddingProvider, OllamaProvider};
use crate::services::qa_bridge_client::QaBridgeClient;

use conversation::ConversationLog;
use lifecycle::{LifecycleError, ModelLifecycle, Readiness};
use pipeline::{QueryPipeline, RerankPolicy};

/// Notifications for the presentation layer: re-render on readiness
/// transitions, re-render and clear the question field on committed turns.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    ReadinessChanged(Readiness),
    TurnAppended(ConversationTurn),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Models are not ready")]
    NotReady,
    #[error("Model loading failed: {0}")]
    LoadFailed(String),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// One user session: the two model providers, their load lifecycle, the
/// query pipeline and the conversation transcript, behind a single handle.
///
/// Lifecycle: `new` -> `start` -> (`await_ready` | `readiness`) ->
/// `submit`*. Submissions fully serialize: a turn is committed to the
/// transcript before the next submission begins.
pub struct ChatSession {
    lifecycle: ModelLifecycle,
    pipeline: QueryPipeline,
    log: ConversationLog,
    submit_gate: Mutex<()>,
    events: broadcast::Sender<SessionEvent>,
    embedder: Arc<dyn EmbeddingProvider>,
    answerer: Arc<dyn AnswerProvider>,
    load_timeout: Duration,
}

impl ChatSession {
    pub fn new(
        config: &Config,
        embedder: Arc<dyn EmbeddingProvider>,
        answerer: Arc<dyn AnswerProvider>,
    ) -> Self {
        let (events, _) = broadcast::channel(64);
        let pipeline = QueryPipeline::new(
            embedder.clone(),
            answerer.clone(),
            config.model_call_timeout(),
            RerankPolicy {
                enabled: config.rerank_enabled,
                weight: config.rerank_weight,
            },
        );

        Self {
            lifecycle: ModelLifecycle::new(),
            pipeline,
            log: ConversationLog::new(),
            submit_gate: Mutex::new(()),
            events,
            embedder,
            answerer,
            load_timeout: config.model_load_timeout(),
        }
    }

    /// Production wiring: Ollama embeddings + QA bridge extraction
    pub fn from_config(config: &Config) -> Self {
        let embedder = Arc::new(OllamaProvider::new(
            config.ollama_url.clone(),
            config.embedding_model.clone(),
        ));
        let bridge = QaBridgeClient::new(config.qa_bridge_url.clone());
        let answerer = Arc::new(BridgeAnswerProvider::new(bridge, config.qa_model.clone()));
        Self::new(config, embedder, answerer)
    }

    /// Kick off the one-shot background load of both models and forward
    /// readiness transitions onto the session event channel.
    pub fn start(&self) -> Result<(), LifecycleError> {
        self.lifecycle
            .spawn_load(self.embedder.clone(), self.answerer.clone(), self.load_timeout)?;

        let mut rx = self.lifecycle.subscribe();
        let events = self.events.clone();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let state = rx.borrow_and_update().clone();
                let terminal = matches!(state, Readiness::Ready | Readiness::LoadFailed(_));
                let _ = events.send(SessionEvent::ReadinessChanged(state));
                if terminal {
                    break;
                }
            }
        });

        Ok(())
    }

    pub fn readiness(&self) -> Readiness {
        self.lifecycle.readiness()
    }

    pub fn is_ready(&self) -> bool {
        self.lifecycle.is_ready()
    }

    pub fn subscribe_readiness(&self) -> tokio::sync::watch::Receiver<Readiness> {
        self.lifecycle.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn await_ready(&self) -> Result<(), SessionError> {
        self.lifecycle
            .await_ready()
            .await
            .map_err(SessionError::from)
    }

    /// Answer one question against the passage and commit the turn.
    ///
    /// Callers gate on readiness; before the models are loaded this is a
    /// precondition violation and the transcript is untouched. Question
    /// level failures (empty input, no candidates, provider errors,
    /// timeouts) are absorbed into the returned answer text, never an
    /// `Err`.
    pub async fn submit(
        &self,
        passage: &str,
        question: &str,
    ) -> Result<SelectedAnswer, SessionError> {
        let _guard = self.submit_gate.lock().await;

        match self.lifecycle.readiness() {
            Readiness::Ready => {}
            Readiness::LoadFailed(msg) => return Err(SessionError::LoadFailed(msg)),
            Readiness::NotLoaded | Readiness::Loading => return Err(SessionError::NotReady),
        }

        let outcome = self.pipeline.run(passage, question).await;
        let committed = self.log.append(outcome.turn);
        info!("Turn committed ({} total)", self.log.len());
        let _ = self.events.send(SessionEvent::TurnAppended(committed));

        Ok(outcome.answer)
    }

    /// Read-only view of the transcript for rendering
    pub fn snapshot(&self) -> Vec<ConversationTurn> {
        self.log.snapshot()
    }

    pub fn transcript_len(&self) -> usize {
        self.log.len()
    }
}
