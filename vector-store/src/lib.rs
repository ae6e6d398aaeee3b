//! # Vector Store
//!
//! Named, persistent vector tables with exact k-nearest-neighbor search.
//!
//! A table is rebuilt as a whole: [`VectorStore::rebuild`] drops any table of
//! the same name and writes the new record set. Search returns records in
//! ascending distance order under the metric the table was built with.
//!
//! ```rust,ignore
//! use notes_vector_store::{FileVectorStore, StoredRecord, VectorStore};
//!
//! let store = FileVectorStore::open("data/notes-db").await?;
//! store.rebuild("notes", vec![StoredRecord::new(vec![1.0, 0.0])]).await?;
//! let hits = store.search("notes", &[1.0, 0.0], 5).await?;
//! ```

pub mod error;
pub mod file_store;
pub mod record;
pub mod store;

pub use error::{Result, StoreError};
pub use file_store::FileVectorStore;
pub use record::{ScoredRecord, StoredRecord, TableMetadata, VECTOR_FIELD};
pub use store::{VectorStore, validate_table_name};

pub use notes_embeddings::DistanceMetric;
