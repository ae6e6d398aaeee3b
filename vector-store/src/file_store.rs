//! File-backed vector store.
//!
//! Each table is a single JSON file `<root>/<name>.table.json`. Search is an
//! exact scan over every record, which is fine at note-collection scale.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};

use notes_embeddings::DistanceMetric;

use crate::error::{Result, StoreError};
use crate::record::{ScoredRecord, StoredRecord, TableMetadata};
use crate::store::{VectorStore, common_dimension, validate_table_name};

const TABLE_SUFFIX: &str = ".table.json";

/// On-disk layout of one table.
#[derive(Debug, Serialize, Deserialize)]
struct TableFile {
    name: String,
    metric: DistanceMetric,
    dimension: Option<usize>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    metadata: TableMetadata,
    records: Vec<StoredRecord>,
}

/// A vector store keeping each table in a JSON file under one directory.
#[derive(Debug, Clone)]
pub struct FileVectorStore {
    /// Directory holding the table files.
    root: PathBuf,

    /// Metric recorded into tables built by this store.
    metric: DistanceMetric,
}

impl FileVectorStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        debug!("Opened vector store at {}", root.display());

        Ok(Self {
            root,
            metric: DistanceMetric::default(),
        })
    }

    /// Set the metric used for tables built from now on.
    ///
    /// Existing tables keep the metric they were built with.
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Directory holding the table files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Metric used for newly built tables.
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}{TABLE_SUFFIX}"))
    }

    async fn load_table(&self, name: &str) -> Result<TableFile> {
        validate_table_name(name)?;
        let path = self.table_path(name);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::TableNotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let table: TableFile =
            serde_json::from_str(&content).map_err(|e| StoreError::CorruptTable {
                table: name.to_string(),
                reason: e.to_string(),
            })?;

        if let Some(dimension) = table.dimension {
            if table.records.iter().any(|r| r.dimension() != dimension) {
                return Err(StoreError::CorruptTable {
                    table: name.to_string(),
                    reason: format!("records do not all have dimension {dimension}"),
                });
            }
        }

        Ok(table)
    }

    async fn save_table(&self, table: &TableFile) -> Result<()> {
        let path = self.table_path(&table.name);
        let content = serde_json::to_string(table)?;

        let temp_path = self.root.join(format!("{}{TABLE_SUFFIX}.tmp", table.name));
        fs::write(&temp_path, &content).await?;
        fs::rename(&temp_path, &path).await?;

        debug!("Saved table {} to {}", table.name, path.display());
        Ok(())
    }
}

#[async_trait]
impl VectorStore for FileVectorStore {
    async fn table_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            if let Some(name) = file_name.to_str().and_then(|n| n.strip_suffix(TABLE_SUFFIX)) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn drop_table(&self, table: &str) -> Result<bool> {
        validate_table_name(table)?;
        match fs::remove_file(self.table_path(table)).await {
            Ok(()) => {
                info!("Dropped table {table}");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn rebuild_with_metadata(
        &self,
        table: &str,
        records: Vec<StoredRecord>,
        metadata: TableMetadata,
    ) -> Result<()> {
        validate_table_name(table)?;
        let dimension = common_dimension(&records)?;

        self.drop_table(table).await?;

        let file = TableFile {
            name: table.to_string(),
            metric: self.metric,
            dimension,
            created_at: Utc::now(),
            metadata,
            records,
        };
        self.save_table(&file).await?;

        info!(
            "Created table {table} with {} records (metric: {}, dimension: {dimension:?})",
            file.records.len(),
            file.metric
        );
        Ok(())
    }

    async fn search(&self, table: &str, query: &[f32], k: usize) -> Result<Vec<ScoredRecord>> {
        let table_file = self.load_table(table).await?;

        let Some(dimension) = table_file.dimension else {
            return Ok(Vec::new());
        };
        if query.len() != dimension {
            return Err(StoreError::DimensionMismatch {
                expected: dimension,
                actual: query.len(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let metric = table_file.metric;
        let mut scored = Vec::with_capacity(table_file.records.len());
        for record in table_file.records {
            let distance = metric.distance(query, &record.vector)?;
            scored.push(ScoredRecord { record, distance });
        }

        // Stable sort: equal distances keep insertion order.
        scored.sort_by_key(|s| OrderedFloat(s.distance));
        scored.truncate(k);

        debug!("Search on {table} returned {} records", scored.len());
        Ok(scored)
    }

    async fn count(&self, table: &str) -> Result<usize> {
        Ok(self.load_table(table).await?.records.len())
    }

    async fn metadata(&self, table: &str) -> Result<TableMetadata> {
        Ok(self.load_table(table).await?.metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn record(title: &str, vector: Vec<f32>) -> StoredRecord {
        StoredRecord::new(vector).with_field("title", title)
    }

    fn titles(results: &[ScoredRecord]) -> Vec<&str> {
        results
            .iter()
            .map(|r| r.record.str_field("title").unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_search_orders_by_distance() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileVectorStore::open(temp_dir.path()).await.unwrap();

        store
            .rebuild(
                "notes",
                vec![
                    record("b", vec![0.0, 1.0, 0.0]),
                    record("a", vec![1.0, 0.0, 0.0]),
                    record("c", vec![0.7, 0.7, 0.0]),
                ],
            )
            .await
            .unwrap();

        let results = store.search("notes", &[1.0, 0.0, 0.0], 2).await.unwrap();
        assert_eq!(titles(&results), vec!["a", "c"]);
        assert_eq!(results[0].distance, 0.0);
        assert!(results[0].distance <= results[1].distance);
    }

    #[tokio::test]
    async fn test_search_with_large_k_returns_everything() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileVectorStore::open(temp_dir.path()).await.unwrap();
        store
            .rebuild(
                "notes",
                vec![record("a", vec![1.0, 0.0]), record("b", vec![0.0, 1.0])],
            )
            .await
            .unwrap();

        let results = store.search("notes", &[1.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 2);

        let none = store.search("notes", &[1.0, 0.0], 0).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_missing_table() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileVectorStore::open(temp_dir.path()).await.unwrap();

        let err = store.search("notes", &[1.0], 5).await.unwrap_err();
        assert!(matches!(err, StoreError::TableNotFound(name) if name == "notes"));
        assert!(!store.drop_table("notes").await.unwrap());
    }

    #[tokio::test]
    async fn test_query_dimension_must_match() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileVectorStore::open(temp_dir.path()).await.unwrap();
        store
            .rebuild("notes", vec![record("a", vec![1.0, 0.0, 0.0])])
            .await
            .unwrap();

        let err = store.search("notes", &[1.0, 0.0], 1).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_cosine_metric_is_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileVectorStore::open(temp_dir.path())
            .await
            .unwrap()
            .with_metric(DistanceMetric::Cosine);
        store
            .rebuild(
                "notes",
                vec![record("long", vec![10.0, 0.0]), record("diag", vec![1.0, 1.0])],
            )
            .await
            .unwrap();

        // A store opened with the default metric still searches with cosine.
        let reopened = FileVectorStore::open(temp_dir.path()).await.unwrap();
        let results = reopened.search("notes", &[1.0, 0.0], 2).await.unwrap();
        assert_eq!(titles(&results), vec!["long", "diag"]);
        assert!(results[0].distance.abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_metadata_is_replaced_on_rebuild() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileVectorStore::open(temp_dir.path()).await.unwrap();

        let mut metadata = TableMetadata::new();
        metadata.insert("embedder".to_string(), "hashing".into());
        store
            .rebuild_with_metadata("notes", vec![record("a", vec![1.0])], metadata.clone())
            .await
            .unwrap();

        let reopened = FileVectorStore::open(temp_dir.path()).await.unwrap();
        assert_eq!(reopened.metadata("notes").await.unwrap(), metadata);

        store
            .rebuild("notes", vec![record("a", vec![1.0])])
            .await
            .unwrap();
        assert!(store.metadata("notes").await.unwrap().is_empty());

        let err = store.metadata("missing").await.unwrap_err();
        assert!(matches!(err, StoreError::TableNotFound(_)));
    }

    #[tokio::test]
    async fn test_corrupt_table_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileVectorStore::open(temp_dir.path()).await.unwrap();
        std::fs::write(temp_dir.path().join("notes.table.json"), "not json").unwrap();

        let err = store.count("notes").await.unwrap_err();
        assert!(matches!(err, StoreError::CorruptTable { .. }));
    }
}
