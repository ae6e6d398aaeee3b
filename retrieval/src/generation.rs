//! Generative model used to write the final answer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use notes_embeddings::resolve_ollama_url;

use crate::config::DEFAULT_GENERATION_MODEL;

/// Errors returned by a generative model.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The model service could not be reached.
    #[error("model service unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// The model service answered with an error status.
    #[error("model service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body was not what the API promises.
    #[error("invalid response from model service: {0}")]
    InvalidResponse(String),
}

/// A model that turns a prompt into text.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Model identifier.
    fn model(&self) -> &str;

    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Ollama text generation using the non-streaming `/api/generate` endpoint.
pub struct OllamaGenerator {
    base_url: String,
    client: reqwest::Client,
    model: String,
}

impl OllamaGenerator {
    /// Create a generator pointing at `OLLAMA_HOST` or the local default.
    pub fn new() -> Self {
        let host = std::env::var("OLLAMA_HOST").ok();
        Self {
            base_url: resolve_ollama_url(host.as_deref()),
            client: reqwest::Client::new(),
            model: DEFAULT_GENERATION_MODEL.to_string(),
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for OllamaGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[async_trait]
impl GenerativeModel for OllamaGenerator {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        debug!(model = %self.model, chars = prompt.len(), "requesting completion");

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Ollama reports failures as {"error": "..."}.
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let result: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;
        Ok(result.response)
    }
}
