use serde::Deserialize;
use validator::Validate;

/// Main configuration for the Colloquy session engine
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct Config {
    /// Ollama base URL (sentence embeddings)
    #[validate(length(min = 1))]
    pub ollama_url: String,

    /// Embedding model name served by Ollama
    #[validate(length(min = 1))]
    pub embedding_model: String,

    /// QA bridge base URL (extractive answer model sidecar)
    #[validate(length(min = 1))]
    pub qa_bridge_url: String,

    /// Extractive QA model name loaded by the bridge
    #[validate(length(min = 1))]
    pub qa_model: String,

    /// Upper bound on the combined model warm-up, in seconds
    #[validate(range(min = 1, max = 3600))]
    pub model_load_timeout_secs: u64,

    /// Per model call timeout during a query, in seconds
    #[validate(range(min = 1, max = 600))]
    pub model_call_timeout_secs: u64,

    /// Whether candidates are re-ranked by similarity to the question vector
    pub rerank_enabled: bool,

    /// Blend weight of the similarity term when re-ranking (0 = extraction
    /// score only, 1 = similarity only)
    #[validate(range(min = 0.0, max = 1.0))]
    pub rerank_weight: f32,

    /// Log level (e.g., info, debug, trace)
    pub log_level: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            // Core defaults
            .set_default("ollama_url", "http://localhost:11434")?
            .set_default("embedding_model", "nomic-embed-text:latest")?
            .set_default("qa_bridge_url", "http://localhost:5001")?
            .set_default("qa_model", "mobilebert-uncased-squad")?
            .set_default("model_load_timeout_secs", 300u64)?
            .set_default("model_call_timeout_secs", 30u64)?
            .set_default("rerank_enabled", false)?
            .set_default("rerank_weight", 0.5f64)?
            .set_default("log_level", "info")?
            // Load from ~/.colloquy/config.toml (if present)
            .add_source(
                config::File::with_name(&format!(
                    "{}/.colloquy/config",
                    std::env::var("HOME").unwrap_or_else(|_| ".".to_string())
                ))
                .required(false),
            )
            // Environment overrides: COLLOQUY__OLLAMA_URL, COLLOQUY__QA_MODEL, etc.
            .add_source(config::Environment::with_prefix("COLLOQUY").separator("__"))
            .build()?;

        let cfg: Config = settings.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    pub fn model_load_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.model_load_timeout_secs)
    }

    pub fn model_call_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.model_call_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            embedding_model: "nomic-embed-text:latest".to_string(),
            qa_bridge_url: "http://localhost:5001".to_string(),
            qa_model: "mobilebert-uncased-squad".to_string(),
            model_load_timeout_secs: 300,
            model_call_timeout_secs: 30,
            rerank_enabled: false,
            rerank_weight: 0.5,
            log_level: "info".to_string(),
        }
    }
}
