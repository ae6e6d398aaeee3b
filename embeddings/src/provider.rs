//! Embedding providers.
//!
//! Providers are constructed once and shared for the lifetime of the
//! process; callers hold them behind `Arc<dyn EmbeddingProvider>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::similarity::normalize;

/// Default Ollama endpoint when `OLLAMA_HOST` is not set.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default Ollama embedding model (all-MiniLM-L6-v2).
pub const DEFAULT_OLLAMA_EMBEDDING_MODEL: &str = "all-minilm";

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// Model identifier used to produce vectors.
    fn model(&self) -> &str;

    /// Dimension of produced vectors, if known before the first call.
    fn dimension(&self) -> Option<usize>;

    /// Generate an embedding for the given text.
    async fn embed(&self, text: &str) -> Result<Embedding>;

    /// Generate embeddings for multiple texts.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }
}

/// Resolve the Ollama base URL from an `OLLAMA_HOST`-style value.
///
/// Accepts `host`, `host:port` or a full URL. A bare host gets `http://`
/// and port 11434; an explicit scheme keeps that scheme's default port.
pub fn resolve_ollama_url(host: Option<&str>) -> String {
    let Some(host) = host.map(str::trim).filter(|h| !h.is_empty()) else {
        return DEFAULT_OLLAMA_URL.to_string();
    };

    if host.contains("://") {
        return host.trim_end_matches('/').to_string();
    }

    let host = host.trim_end_matches('/');
    let authority = host.split('/').next().unwrap_or(host);
    if authority.contains(':') {
        format!("http://{host}")
    } else {
        let path = &host[authority.len()..];
        format!("http://{authority}:11434{path}")
    }
}

/// Ollama embedding provider using the `/api/embed` endpoint.
pub struct OllamaProvider {
    /// API base URL.
    base_url: String,

    /// HTTP client, reused for every request.
    client: reqwest::Client,

    /// Embedding model.
    model: String,

    /// Expected dimension, if configured.
    dimension: Option<usize>,
}

impl OllamaProvider {
    /// Create a provider pointing at `OLLAMA_HOST` or the local default.
    pub fn new() -> Self {
        let host = std::env::var("OLLAMA_HOST").ok();
        Self {
            base_url: resolve_ollama_url(host.as_deref()),
            client: reqwest::Client::new(),
            model: DEFAULT_OLLAMA_EMBEDDING_MODEL.to_string(),
            dimension: None,
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

    /// Require every returned vector to have this dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[async_trait]
impl EmbeddingProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        debug!(model = %self.model, chars = text.len(), "requesting embedding");

        let response = self
            .client
            .post(format!("{}/api/embed", self.base_url))
            .json(&OllamaEmbedRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ApiRequest(format!(
                "{status}: {error_text}"
            )));
        }

        let result: OllamaEmbedResponse = response.json().await?;
        let embedding = result
            .embeddings
            .into_iter()
            .next()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| EmbeddingError::InvalidResponse("no embedding in response".to_string()))?;

        if let Some(expected) = self.dimension {
            if embedding.len() != expected {
                return Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                });
            }
        }

        Ok(embedding)
    }
}

/// Default dimension of the hashing provider, matching MiniLM.
pub const DEFAULT_HASHING_DIMENSION: usize = 384;

/// Deterministic, offline embedding provider based on feature hashing.
///
/// Each lowercased alphanumeric token is hashed with FNV-1a into a signed
/// bucket; the resulting bag-of-words vector is L2-normalized. Texts sharing
/// words land close together, which is enough for tests and for running
/// without a model server.
pub struct HashingProvider {
    dimension: usize,
}

impl HashingProvider {
    /// Create a hashing provider with the given dimension (at least 1).
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn fnv1a(token: &str) -> u64 {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;

        token.bytes().fold(OFFSET, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(PRIME)
        })
    }

    fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    /// Embed synchronously; the async trait method delegates here.
    pub fn embed_text(&self, text: &str) -> Embedding {
        let mut embedding = vec![0.0f32; self.dimension];
        for token in Self::tokens(text) {
            let hash = Self::fnv1a(&token);
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 1 { -1.0 } else { 1.0 };
            embedding[bucket] += sign;
        }
        normalize(&mut embedding);
        embedding
    }
}

impl Default for HashingProvider {
    fn default() -> Self {
        Self::new(DEFAULT_HASHING_DIMENSION)
    }
}

#[async_trait]
impl EmbeddingProvider for HashingProvider {
    fn name(&self) -> &str {
        "hashing"
    }

    fn model(&self) -> &str {
        "fnv1a-bag-of-words"
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        Ok(self.embed_text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::squared_l2_distance;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_ollama_url() {
        assert_eq!(resolve_ollama_url(None), "http://localhost:11434");
        assert_eq!(resolve_ollama_url(Some("  ")), "http://localhost:11434");
        assert_eq!(resolve_ollama_url(Some("0.0.0.0")), "http://0.0.0.0:11434");
        assert_eq!(
            resolve_ollama_url(Some("gpu-box:8080")),
            "http://gpu-box:8080"
        );
        assert_eq!(
            resolve_ollama_url(Some("https://ollama.example.com/")),
            "https://ollama.example.com"
        );
        assert_eq!(
            resolve_ollama_url(Some("http://127.0.0.1:11434")),
            "http://127.0.0.1:11434"
        );
    }

    #[test]
    fn test_hashing_is_deterministic() {
        let provider = HashingProvider::default();
        let a = provider.embed_text("Pasta boils in 10 minutes.");
        let b = provider.embed_text("Pasta boils in 10 minutes.");
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_HASHING_DIMENSION);
    }

    #[test]
    fn test_hashing_ignores_case_and_punctuation() {
        let provider = HashingProvider::new(64);
        assert_eq!(
            provider.embed_text("Hello, World!"),
            provider.embed_text("hello world")
        );
    }

    #[test]
    fn test_hashing_shared_words_are_closer() {
        let provider = HashingProvider::default();
        let query = provider.embed_text("how long to boil pasta");
        let cooking = provider.embed_text("Pasta boils in 10 minutes.");
        let hiking = provider.embed_text("Mount Rainier trail is 12 miles.");

        let d_cooking = squared_l2_distance(&query, &cooking).unwrap();
        let d_hiking = squared_l2_distance(&query, &hiking).unwrap();
        assert!(d_cooking < d_hiking);
    }

    #[test]
    fn test_hashing_empty_text_is_zero_vector() {
        let provider = HashingProvider::new(8);
        assert_eq!(provider.embed_text("  ...  "), vec![0.0; 8]);
    }
}
