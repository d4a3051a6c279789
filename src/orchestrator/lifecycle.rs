use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use crate::services::answer_provider::AnswerProvider;
use crate::services::embedding_provider::EmbeddingProvider;

/// Model loading state. Transitions once along
/// `NotLoaded -> Loading -> Ready`, or into the terminal `LoadFailed`;
/// never reverts.
#[derive(Debug, Clone, PartialEq)]
pub enum Readiness {
    NotLoaded,
    Loading,
    Ready,
    LoadFailed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("Model loading already started")]
    AlreadyStarted,
    #[error("Model loading failed: {0}")]
    LoadFailed(String),
    #[error("Readiness channel closed")]
    ChannelClosed,
}

/// Owns the one-shot asynchronous load of both model providers and
/// publishes readiness over a watch channel.
///
/// Both providers are warmed exactly once, joined, and bounded by a load
/// timeout so the published state always settles at `Ready` or
/// `LoadFailed`.
pub struct ModelLifecycle {
    state_tx: watch::Sender<Readiness>,
}

impl ModelLifecycle {
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(Readiness::NotLoaded);
        Self { state_tx }
    }

    pub fn readiness(&self) -> Readiness {
        self.state_tx.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.readiness(), Readiness::Ready)
    }

    /// Receiver for readiness transitions; the presentation layer watches
    /// this to swap its loading state for the input form.
    pub fn subscribe(&self) -> watch::Receiver<Readiness> {
        self.state_tx.subscribe()
    }

    /// Start loading both models in the background. Returns immediately;
    /// progress is published on the watch channel. A session loads at most
    /// once, so a second call is rejected.
    pub fn spawn_load(
        &self,
        embedder: Arc<dyn EmbeddingProvider>,
        answerer: Arc<dyn AnswerProvider>,
        timeout: Duration,
    ) -> Result<(), LifecycleError> {
        let mut started = false;
        self.state_tx.send_modify(|state| {
            if matches!(state, Readiness::NotLoaded) {
                *state = Readiness::Loading;
                started = true;
            }
        });
        if !started {
            return Err(LifecycleError::AlreadyStarted);
        }

        info!("Loading models");
        let state_tx = self.state_tx.clone();
        tokio::spawn(async move {
            let warm = futures::future::try_join(embedder.warm_up(), answerer.warm_up());

            let next = match tokio::time::timeout(timeout, warm).await {
                Ok(Ok(_)) => {
                    info!("Models loaded");
                    Readiness::Ready
                }
                Ok(Err(e)) => {
                    error!("Model loading failed: {}", e);
                    Readiness::LoadFailed(e.to_string())
                }
                Err(_) => {
                    error!("Model loading timed out after {:?}", timeout);
                    Readiness::LoadFailed(format!(
                        "model loading timed out after {}s",
                        timeout.as_secs()
                    ))
                }
            };
            state_tx.send_replace(next);
        });

        Ok(())
    }

    /// Suspend until the session is `Ready`, or fail once loading has
    /// terminally failed.
    pub async fn await_ready(&self) -> Result<(), LifecycleError> {
        let mut rx = self.state_tx.subscribe();
        loop {
            match rx.borrow_and_update().clone() {
                Readiness::Ready => return Ok(()),
                Readiness::LoadFailed(msg) => return Err(LifecycleError::LoadFailed(msg)),
                Readiness::NotLoaded | Readiness::Loading => {}
            }
            rx.changed()
                .await
                .map_err(|_| LifecycleError::ChannelClosed)?;
        }
    }
}

impl Default for ModelLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
