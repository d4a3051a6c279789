use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use colloquy::services::embedding_provider::ProviderError;
use colloquy::{
    AnswerCandidate, EmbeddingProvider, LifecycleError, MockAnswerProvider,
    MockEmbeddingProvider, ModelLifecycle, Readiness,
};

fn ready_mocks() -> (Arc<MockEmbeddingProvider>, Arc<MockAnswerProvider>) {
    (
        Arc::new(MockEmbeddingProvider::new_success(vec![0.1; 768])),
        Arc::new(MockAnswerProvider::new_success(vec![AnswerCandidate::new(
            "span", 0.9,
        )])),
    )
}

/// Provider whose warm-up never completes, for load-timeout coverage
struct HangingEmbeddingProvider;

#[async_trait]
impl EmbeddingProvider for HangingEmbeddingProvider {
    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        futures::future::pending().await
    }
}

// ============================================
// Test: NotLoaded -> Loading -> Ready
// ============================================

#[tokio::test]
async fn test_load_reaches_ready() {
    let lifecycle = ModelLifecycle::new();
    assert_eq!(lifecycle.readiness(), Readiness::NotLoaded);
    assert!(!lifecycle.is_ready());

    let (embedder, answerer) = ready_mocks();
    lifecycle
        .spawn_load(embedder, answerer, Duration::from_secs(5))
        .unwrap();

    lifecycle.await_ready().await.unwrap();
    assert!(lifecycle.is_ready());
}

// ============================================
// Test: Second load rejected
// ============================================

#[tokio::test]
async fn test_spawn_load_only_once() {
    let lifecycle = ModelLifecycle::new();
    let (embedder, answerer) = ready_mocks();
    lifecycle
        .spawn_load(embedder.clone(), answerer.clone(), Duration::from_secs(5))
        .unwrap();

    let second = lifecycle.spawn_load(embedder, answerer, Duration::from_secs(5));
    assert!(matches!(second, Err(LifecycleError::AlreadyStarted)));
}

// ============================================
// Test: Warm-up failure is terminal
// ============================================

#[tokio::test]
async fn test_load_failure_is_terminal() {
    let lifecycle = ModelLifecycle::new();
    let embedder = Arc::new(MockEmbeddingProvider::new_load_failure(
        ProviderError::Http("connection refused".to_string()),
    ));
    let answerer = Arc::new(MockAnswerProvider::new_success(vec![]));

    lifecycle
        .spawn_load(embedder, answerer, Duration::from_secs(5))
        .unwrap();

    let err = lifecycle.await_ready().await.unwrap_err();
    assert!(matches!(err, LifecycleError::LoadFailed(_)));
    assert!(matches!(lifecycle.readiness(), Readiness::LoadFailed(_)));
    assert!(!lifecycle.is_ready());
}

// ============================================
// Test: A hanging warm-up still settles
// ============================================

#[tokio::test]
async fn test_hanging_load_settles_via_timeout() {
    let lifecycle = ModelLifecycle::new();
    let embedder = Arc::new(HangingEmbeddingProvider);
    let answerer = Arc::new(MockAnswerProvider::new_success(vec![]));

    lifecycle
        .spawn_load(embedder, answerer, Duration::from_millis(100))
        .unwrap();

    let err = lifecycle.await_ready().await.unwrap_err();
    match err {
        LifecycleError::LoadFailed(msg) => assert!(msg.contains("timed out")),
        other => panic!("expected LoadFailed, got {:?}", other),
    }
}

// ============================================
// Test: Watch subscribers see the transitions
// ============================================

#[tokio::test]
async fn test_subscribe_observes_ready_transition() {
    let lifecycle = ModelLifecycle::new();
    let mut rx = lifecycle.subscribe();
    assert_eq!(*rx.borrow(), Readiness::NotLoaded);

    let (embedder, answerer) = ready_mocks();
    lifecycle
        .spawn_load(embedder, answerer, Duration::from_secs(5))
        .unwrap();

    loop {
        rx.changed().await.unwrap();
        let state = rx.borrow_and_update().clone();
        match state {
            Readiness::Loading => continue,
            Readiness::Ready => break,
            other => panic!("unexpected transition: {:?}", other),
        }
    }
}
