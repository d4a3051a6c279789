use std::sync::Arc;
use std::time::Duration;

use ndarray::ArrayView1;
use tracing::{debug, warn};

use crate::models::internal::{AnswerCandidate, NewTurn, SelectedAnswer};
use crate::services::answer_provider::AnswerProvider;
use crate::services::embedding_provider::{EmbeddingProvider, ProviderError};

/// Canned reply when the submitted question is empty or whitespace
pub const EMPTY_QUESTION_ANSWER: &str = "Please enter a question.";

/// Canned reply when extraction produces no candidates
pub const NO_ANSWER_FALLBACK: &str = "I'm sorry, I don't have an answer to that question.";

/// Canned reply when a model call fails or times out mid-query
pub const SERVICE_FAILURE_ANSWER: &str =
    "Something went wrong while answering. Please try again.";

/// Candidate re-ranking by similarity to the question vector. Off by
/// default: the question is still encoded every turn, but the vector only
/// feeds scoring when `enabled` is set.
#[derive(Debug, Clone, Copy)]
pub struct RerankPolicy {
    pub enabled: bool,
    /// Blend weight of the similarity term (0 = extraction score only)
    pub weight: f32,
}

impl Default for RerankPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            weight: 0.5,
        }
    }
}

/// Result of one pipeline run: the answer handed back to the caller and
/// the turn to commit to the transcript.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub turn: NewTurn,
    pub answer: SelectedAnswer,
}

enum CallFailure {
    Provider(ProviderError),
    Timeout,
}

/// The query-answering sequence: validate, encode, extract, select.
///
/// A run never fails: empty questions, empty candidate sets, provider
/// errors and timeouts all resolve to a canned answer that becomes part of
/// the transcript like any other turn.
pub struct QueryPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    answerer: Arc<dyn AnswerProvider>,
    call_timeout: Duration,
    rerank: RerankPolicy,
}

impl QueryPipeline {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        answerer: Arc<dyn AnswerProvider>,
        call_timeout: Duration,
        rerank: RerankPolicy,
    ) -> Self {
        Self {
            embedder,
            answerer,
            call_timeout,
            rerank,
        }
    }

    pub async fn run(&self, passage: &str, question: &str) -> PipelineOutcome {
        // Whitespace-only input short-circuits before any model call; the
        // transcript records an empty question, not the raw input.
        if question.trim().is_empty() {
            let answer = SelectedAnswer::canned(EMPTY_QUESTION_ANSWER);
            return PipelineOutcome {
                turn: NewTurn::new("", answer.text.clone()),
                answer,
            };
        }

        debug!("Question submitted");

        // Encoding completes before extraction starts; the vector feeds
        // scoring only when re-ranking is enabled.
        let question_vector = match self.encode_question(question).await {
            Ok(vector) => vector,
            Err(failure) => return self.failure_outcome(question, failure),
        };
        debug!("Question encoded ({} dims)", question_vector.len());

        let candidates = match self
            .guarded(self.answerer.find_answers(question, passage))
            .await
        {
            Ok(candidates) => candidates,
            Err(failure) => return self.failure_outcome(question, failure),
        };
        debug!("Extraction produced {} candidates", candidates.len());

        let answer = self.select(candidates, &question_vector).await;
        PipelineOutcome {
            turn: NewTurn::new(question, answer.text.clone()),
            answer,
        }
    }

    async fn encode_question(&self, question: &str) -> Result<Vec<f32>, CallFailure> {
        let vectors = self
            .guarded(self.embedder.embed(&[question.to_string()]))
            .await?;
        vectors
            .into_iter()
            .next()
            .ok_or(CallFailure::Provider(ProviderError::NoEmbeddings))
    }

    /// Selection policy: the candidate with the strictly highest score via
    /// a left-to-right scan; the first candidate encountered wins all ties.
    async fn select(
        &self,
        candidates: Vec<AnswerCandidate>,
        question_vector: &[f32],
    ) -> SelectedAnswer {
        if candidates.is_empty() {
            return SelectedAnswer::canned(NO_ANSWER_FALLBACK);
        }

        let scored = if self.rerank.enabled {
            match self
                .guarded(self.rerank_candidates(candidates.clone(), question_vector))
                .await
            {
                Ok(reranked) => reranked,
                Err(CallFailure::Provider(e)) => {
                    warn!("Re-ranking unavailable, using extraction scores: {}", e);
                    candidates
                }
                Err(CallFailure::Timeout) => {
                    warn!("Re-ranking timed out, using extraction scores");
                    candidates
                }
            }
        } else {
            candidates
        };

        match pick_best(&scored) {
            Some(best) => SelectedAnswer::extracted(best.clone()),
            None => SelectedAnswer::canned(NO_ANSWER_FALLBACK),
        }
    }

    /// Blend each candidate's extraction score with its cosine similarity
    /// to the question vector. Candidate order is preserved so tie-breaks
    /// stay first-wins.
    async fn rerank_candidates(
        &self,
        candidates: Vec<AnswerCandidate>,
        question_vector: &[f32],
    ) -> Result<Vec<AnswerCandidate>, ProviderError> {
        let texts: Vec<String> = candidates.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed(&texts).await?;
        if vectors.len() != texts.len() {
            return Err(ProviderError::CountMismatch {
                expected: texts.len(),
                actual: vectors.len(),
            });
        }

        let weight = self.rerank.weight;
        Ok(candidates
            .into_iter()
            .zip(vectors)
            .map(|(candidate, vector)| {
                let similarity = cosine_similarity(question_vector, &vector);
                AnswerCandidate {
                    score: (1.0 - weight) * candidate.score + weight * similarity,
                    text: candidate.text,
                }
            })
            .collect())
    }

    async fn guarded<T>(
        &self,
        call: impl std::future::Future<Output = Result<T, ProviderError>>,
    ) -> Result<T, CallFailure> {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(CallFailure::Provider(e)),
            Err(_) => Err(CallFailure::Timeout),
        }
    }

    fn failure_outcome(&self, question: &str, failure: CallFailure) -> PipelineOutcome {
        match failure {
            CallFailure::Provider(e) => warn!("Model call failed: {}", e),
            CallFailure::Timeout => warn!(
                "Model call timed out after {}s",
                self.call_timeout.as_secs()
            ),
        }
        let answer = SelectedAnswer::canned(SERVICE_FAILURE_ANSWER);
        PipelineOutcome {
            turn: NewTurn::new(question, answer.text.clone()),
            answer,
        }
    }
}

/// First-wins max scan: keeps the earlier candidate unless a later one
/// scores strictly higher.
pub fn pick_best(candidates: &[AnswerCandidate]) -> Option<&AnswerCandidate> {
    candidates
        .iter()
        .reduce(|prev, current| if current.score > prev.score { current } else { prev })
}

/// Cosine similarity of two vectors; 0.0 for mismatched lengths or a zero
/// vector on either side.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let a = ArrayView1::from(a);
    let b = ArrayView1::from(b);
    let denom = a.dot(&a).sqrt() * b.dot(&b).sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    a.dot(&b) / denom
}
