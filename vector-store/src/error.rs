//! Error types for the vector store.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in the vector store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The named table has never been created, or was dropped.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// Table names become file names, so they are restricted.
    #[error("invalid table name: {0:?}")]
    InvalidTableName(String),

    /// A vector does not match the table's dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A table file exists but its contents are not a valid table.
    #[error("corrupt table {table}: {reason}")]
    CorruptTable { table: String, reason: String },

    /// Distance computation failed.
    #[error("embedding error: {0}")]
    Embedding(#[from] notes_embeddings::EmbeddingError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
