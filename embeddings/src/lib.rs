//! # Embeddings
//!
//! Text embedding generation and vector distances for notes retrieval.
//!
//! ## Features
//!
//! - **Embedding Generation**: Convert text to dense vectors through a
//!   narrow [`EmbeddingProvider`] trait
//! - **Multiple Providers**: Ollama-served models, or an offline
//!   feature-hashing provider
//! - **Distances**: Squared L2, cosine and dot-product distances
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings System                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider ──► Embedding ──► DistanceMetric            │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  Ollama/Hashing                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod provider;
pub mod similarity;

pub use error::{EmbeddingError, Result};
pub use provider::{
    DEFAULT_HASHING_DIMENSION, DEFAULT_OLLAMA_EMBEDDING_MODEL, DEFAULT_OLLAMA_URL,
    EmbeddingProvider, HashingProvider, OllamaProvider, resolve_ollama_url,
};
pub use similarity::{DistanceMetric, cosine_distance, cosine_similarity, normalize};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;
