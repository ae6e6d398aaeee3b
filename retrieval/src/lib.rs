//! # Notes Retrieval
//!
//! Retrieval-augmented question answering over a directory of markdown
//! notes:
//!
//! - **Indexing**: load every note, embed its body and rebuild the notes
//!   table in the vector store
//! - **Retrieval**: embed a question and fetch the nearest notes
//! - **Generation**: build a prompt grounded on those notes and ask a model
//!   for the answer
//!
//! ## Architecture
//!
//! ```text
//!   notes dir ──► NoteLoader ──► EmbeddingProvider ──► VectorStore::rebuild
//!
//!   question ──► EmbeddingProvider ──► VectorStore::search ──► prompt
//!                                                                │
//!              QueryResponse { answer, sources } ◄── GenerativeModel
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use notes_retrieval::{NotesSearcher, RetrievalConfig};
//!
//! let searcher = NotesSearcher::open(RetrievalConfig::new("~/notes")).await?;
//! searcher.index_notes().await?;
//!
//! let response = searcher.search("how long to boil pasta").await?;
//! println!("{}", response.answer);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod indexer;
pub mod prompt;
pub mod result;
pub mod searcher;

pub use config::{
    EmbeddingConfig, EmbeddingProviderType, GenerationConfig, QueryConfig, RetrievalConfig,
    ScanConfig, StoreConfig,
};
pub use engine::QueryEngine;
pub use error::{Result, RetrievalError};
pub use generation::{GenerationError, GenerativeModel, OllamaGenerator};
pub use indexer::Indexer;
pub use result::{IndexReport, QueryResponse, SearchResult, Source};
pub use searcher::{NotesSearcher, NotesSearcherBuilder, SearcherStats};

// Re-export from dependencies for convenience
pub use notes_embeddings::{EmbeddingProvider, HashingProvider, OllamaProvider};
pub use notes_loader::Note;
pub use notes_vector_store::{DistanceMetric, FileVectorStore, VectorStore};
