//! The vector store abstraction.

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::record::{ScoredRecord, StoredRecord, TableMetadata};

/// A persistent set of named tables supporting full rebuild and
/// k-nearest-neighbor search.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Names of all existing tables, sorted.
    async fn table_names(&self) -> Result<Vec<String>>;

    /// Drop a table. Returns whether it existed.
    async fn drop_table(&self, table: &str) -> Result<bool>;

    /// Replace the whole table with `records`, dropping any existing table
    /// of the same name first. An empty record set is a valid table.
    async fn rebuild(&self, table: &str, records: Vec<StoredRecord>) -> Result<()> {
        self.rebuild_with_metadata(table, records, TableMetadata::new())
            .await
    }

    /// Like [`rebuild`](VectorStore::rebuild), also storing table-level
    /// `metadata` that replaces whatever the old table carried.
    async fn rebuild_with_metadata(
        &self,
        table: &str,
        records: Vec<StoredRecord>,
        metadata: TableMetadata,
    ) -> Result<()>;

    /// Table-level metadata written by the last rebuild.
    ///
    /// Fails with [`StoreError::TableNotFound`] if the table does not exist.
    async fn metadata(&self, table: &str) -> Result<TableMetadata>;

    /// Return up to `k` records nearest `query`, ascending by distance.
    ///
    /// Fails with [`StoreError::TableNotFound`] if the table does not exist.
    async fn search(&self, table: &str, query: &[f32], k: usize) -> Result<Vec<ScoredRecord>>;

    /// Number of records in a table.
    async fn count(&self, table: &str) -> Result<usize>;

    /// Whether a table exists.
    async fn table_exists(&self, table: &str) -> Result<bool> {
        Ok(self.table_names().await?.iter().any(|name| name == table))
    }
}

/// Check that a table name is non-empty and only uses `[A-Za-z0-9_-]`.
pub fn validate_table_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidTableName(name.to_string()))
    }
}

/// Check that every record has the same dimension. Returns that dimension,
/// or `None` for an empty set.
pub fn common_dimension(records: &[StoredRecord]) -> Result<Option<usize>> {
    let Some(first) = records.first() else {
        return Ok(None);
    };
    let expected = first.dimension();
    for record in records {
        if record.dimension() != expected {
            return Err(StoreError::DimensionMismatch {
                expected,
                actual: record.dimension(),
            });
        }
    }
    Ok(Some(expected))
}
