use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One extracted answer span with the model's confidence for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerCandidate {
    pub text: String,
    pub score: f32,
}

impl AnswerCandidate {
    pub fn new(text: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            score,
        }
    }
}

/// The answer the selection policy settled on for one question.
///
/// `score` is `None` when the text is a canned fallback rather than a span
/// extracted from the passage.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SelectedAnswer {
    pub text: String,
    pub score: Option<f32>,
}

impl SelectedAnswer {
    pub fn extracted(candidate: AnswerCandidate) -> Self {
        Self {
            text: candidate.text,
            score: Some(candidate.score),
        }
    }

    pub fn canned(text: &str) -> Self {
        Self {
            text: text.to_string(),
            score: None,
        }
    }
}

/// One committed (question, answer) exchange in the transcript.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationTurn {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub timestamp: NaiveDateTime,
}

// NEW: turn payload before the log assigns id/timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTurn {
    pub question: String,
    pub answer: String,
}

impl NewTurn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}
