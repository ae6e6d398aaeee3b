//! Values produced by indexing and querying, and the record layout notes
//! are stored under.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use notes_embeddings::{Embedding, EmbeddingProvider};
use notes_loader::Note;
use notes_vector_store::{ScoredRecord, StoredRecord, TableMetadata};

use crate::error::{Result, RetrievalError};

/// Stored field holding the note path.
pub const PATH_FIELD: &str = "path";
/// Stored field holding the note body.
pub const CONTENT_FIELD: &str = "content";
/// Stored field holding the note title.
pub const TITLE_FIELD: &str = "title";
/// Stored field holding the note tags.
pub const TAGS_FIELD: &str = "tags";

/// Table metadata key naming the embedder that built the index.
pub const EMBEDDER_KEY: &str = "embedder";

/// `name/model` of an embedding provider.
pub fn embedder_identity(embedder: &dyn EmbeddingProvider) -> String {
    format!("{}/{}", embedder.name(), embedder.model())
}

/// Table metadata recording which embedder produced the vectors.
pub fn index_metadata(embedder: &dyn EmbeddingProvider) -> TableMetadata {
    let mut metadata = TableMetadata::new();
    metadata.insert(EMBEDDER_KEY.to_string(), embedder_identity(embedder).into());
    metadata
}

/// Build the stored row for a note.
pub fn note_record(note: &Note, vector: Embedding) -> StoredRecord {
    StoredRecord::new(vector)
        .with_field(PATH_FIELD, note.path_string())
        .with_field(CONTENT_FIELD, note.content.as_str())
        .with_field(TITLE_FIELD, note.title.as_str())
        .with_field(TAGS_FIELD, note.tags.clone())
}

/// A stored note matched by a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub path: String,
    pub title: String,
    pub tags: Vec<String>,
    pub content: String,

    /// Raw distance from the store; lower is more relevant.
    pub distance: f32,
}

impl SearchResult {
    /// Read a search hit back into note fields.
    pub fn from_scored(scored: ScoredRecord) -> Result<Self> {
        let record = &scored.record;
        let string_field = |name: &str| {
            record
                .str_field(name)
                .map(str::to_string)
                .ok_or_else(|| RetrievalError::InvalidRecord(format!("missing `{name}` field")))
        };

        let tags = match record.field(TAGS_FIELD) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(values)) => values
                .iter()
                .map(|v| {
                    v.as_str().map(str::to_string).ok_or_else(|| {
                        RetrievalError::InvalidRecord(format!("non-string tag {v}"))
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(RetrievalError::InvalidRecord(format!(
                    "`{TAGS_FIELD}` is not a list: {other}"
                )));
            }
        };

        Ok(Self {
            path: string_field(PATH_FIELD)?,
            title: string_field(TITLE_FIELD)?,
            content: string_field(CONTENT_FIELD)?,
            tags,
            distance: scored.distance,
        })
    }

    /// The citation for this result.
    pub fn source(&self) -> Source {
        Source {
            title: self.title.clone(),
            path: self.path.clone(),
            relevance_score: self.distance,
        }
    }
}

/// A note cited in an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub path: String,

    /// Raw vector distance; lower is more relevant.
    pub relevance_score: f32,
}

/// The answer to a query and the notes it was grounded on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,

    /// Sources in retrieval order, most relevant first.
    pub sources: Vec<Source>,
}

/// Summary of an indexing pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexReport {
    /// Table that was rebuilt.
    pub table: String,

    /// Number of notes written to the table.
    pub notes_indexed: usize,

    /// Vector dimension, or `None` when no notes were found.
    pub dimension: Option<usize>,

    /// Wall time of the pass in milliseconds.
    pub duration_ms: u64,

    /// When the pass finished.
    pub indexed_at: DateTime<Utc>,
}
