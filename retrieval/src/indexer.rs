//! Indexing pass: load every note, embed it and rebuild the table.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info};

use notes_embeddings::{EmbeddingError, EmbeddingProvider};
use notes_loader::{Note, NoteLoader};
use notes_vector_store::{StoredRecord, VectorStore};

use crate::config::ScanConfig;
use crate::error::Result;
use crate::result::{IndexReport, index_metadata, note_record};

/// Builds the notes table from a directory.
pub struct Indexer {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    table: String,
    scan: ScanConfig,
}

impl Indexer {
    /// Create an indexer writing to `table`.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            embedder,
            store,
            table: table.into(),
            scan: ScanConfig::default(),
        }
    }

    /// Set the note discovery options.
    pub fn with_scan_config(mut self, scan: ScanConfig) -> Self {
        self.scan = scan;
        self
    }

    /// Replace the table with one record per note under `root`.
    ///
    /// All notes are loaded and embedded before the table is touched, so a
    /// failure anywhere leaves the previous index in place.
    pub async fn index(&self, root: &Path) -> Result<IndexReport> {
        let started = Instant::now();
        info!("Indexing notes in {}", root.display());

        let loader = NoteLoader::new(self.scan.loader_config(root));
        let notes = loader.load_all().await?;

        let mut records = Vec::with_capacity(notes.len());
        for note in &notes {
            records.push(self.embed_note(note).await?);
        }

        let notes_indexed = records.len();
        let dimension = records.first().map(StoredRecord::dimension);
        self.store
            .rebuild_with_metadata(&self.table, records, index_metadata(self.embedder.as_ref()))
            .await?;

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            table = %self.table,
            notes = notes_indexed,
            duration_ms,
            "Indexing complete"
        );

        Ok(IndexReport {
            table: self.table.clone(),
            notes_indexed,
            dimension,
            duration_ms,
            indexed_at: Utc::now(),
        })
    }

    async fn embed_note(&self, note: &Note) -> Result<StoredRecord> {
        let vector = self.embedder.embed(&note.content).await?;
        if let Some(expected) = self.embedder.dimension() {
            if vector.len() != expected {
                return Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                }
                .into());
            }
        }
        debug!("Embedded {} ({} dims)", note.path.display(), vector.len());
        Ok(note_record(note, vector))
    }
}
