use serde::{Deserialize, Serialize};

use crate::models::internal::AnswerCandidate;

#[derive(Debug, thiserror::Error)]
pub enum QaBridgeError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// HTTP client for the QA bridge sidecar that serves the extractive
/// question-answering model.
#[derive(Clone)]
pub struct QaBridgeClient {
    client: reqwest::Client,
    base_url: String,
}

impl QaBridgeClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Extract candidate answer spans for `question` from `passage`.
    pub async fn find_answers(
        &self,
        question: &str,
        passage: &str,
        model: Option<&str>,
    ) -> Result<Vec<AnswerCandidate>, QaBridgeError> {
        let request = FindAnswersRequest {
            question: question.to_string(),
            passage: passage.to_string(),
            model: model.map(|s| s.to_string()),
        };

        let response = self
            .client
            .post(format!("{}/answers", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QaBridgeError::ApiError {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let answers_response: FindAnswersResponse = response.json().await?;
        Ok(answers_response
            .answers
            .into_iter()
            .map(|a| AnswerCandidate {
                text: a.text,
                score: a.score,
            })
            .collect())
    }

    /// Ask the bridge to load the given model into memory. Blocks until the
    /// model is servable or the bridge reports a failure.
    pub async fn load_model(&self, model: &str) -> Result<(), QaBridgeError> {
        let request = LoadModelRequest {
            model: model.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/load", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QaBridgeError::ApiError {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let load_response: LoadModelResponse = response.json().await?;
        if !load_response.loaded {
            return Err(QaBridgeError::InvalidResponse(format!(
                "bridge did not load model {}",
                model
            )));
        }
        Ok(())
    }

    pub async fn health_check(&self) -> Result<bool, QaBridgeError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}

// Request/Response Models
#[derive(Serialize)]
struct FindAnswersRequest {
    question: String,
    passage: String,
    model: Option<String>,
}

#[derive(Deserialize)]
struct FindAnswersResponse {
    answers: Vec<AnswerSpan>,
}

#[derive(Deserialize)]
struct AnswerSpan {
    text: String,
    score: f32,
}

#[derive(Serialize)]
struct LoadModelRequest {
    model: String,
}

#[derive(Deserialize)]
struct LoadModelResponse {
    loaded: bool,
}
