//! Error types for indexing and querying.

use thiserror::Error;

use notes_embeddings::EmbeddingError;
use notes_loader::LoaderError;
use notes_vector_store::StoreError;

use crate::generation::GenerationError;

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors that can occur while indexing or answering a query.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// A note could not be found, read or parsed.
    #[error("failed to load notes: {0}")]
    FileAccess(#[from] LoaderError),

    /// The query ran before any index was built.
    #[error("no index named `{table}` found; run indexing first")]
    StoreNotFound { table: String },

    /// The index was built by a different embedding model than the one
    /// embedding the query.
    #[error("index was built with embedder `{indexed}` but queries use `{current}`; re-index first")]
    EmbedderMismatch { indexed: String, current: String },

    /// The generative model could not be reached or failed.
    #[error("generation unavailable: {0}")]
    GenerationUnavailable(#[from] GenerationError),

    /// Embedding error.
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Vector store error.
    #[error("vector store error: {0}")]
    Store(StoreError),

    /// A stored row is missing one of the note fields.
    #[error("invalid record in index: {0}")]
    InvalidRecord(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<StoreError> for RetrievalError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TableNotFound(table) => Self::StoreNotFound { table },
            other => Self::Store(other),
        }
    }
}
