//! Records stored in, and returned from, a vector table.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use notes_embeddings::Embedding;

/// Name of the field holding the vector in a serialized record.
pub const VECTOR_FIELD: &str = "vector";

/// Table-level key/value metadata, kept beside the records.
pub type TableMetadata = Map<String, Value>;

/// A stored row: one vector plus arbitrary named fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// The embedding vector.
    pub vector: Embedding,

    /// Every other column, keyed by field name.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl StoredRecord {
    /// Create a record with no fields.
    pub fn new(vector: Embedding) -> Self {
        Self {
            vector,
            fields: Map::new(),
        }
    }

    /// Set a field, replacing any previous value.
    ///
    /// The `vector` name is reserved; setting it is ignored.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if name != VECTOR_FIELD {
            self.fields.insert(name, value.into());
        }
        self
    }

    /// Get a field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get a string field by name.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Dimension of the stored vector.
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

/// A record returned by a search, with its distance to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    /// The matched record.
    pub record: StoredRecord,

    /// Distance to the query; lower is more similar.
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_record_serializes_flat() {
        let record = StoredRecord::new(vec![1.0, 2.0])
            .with_field("title", "Cooking")
            .with_field("tags", json!(["food"]));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({ "vector": [1.0, 2.0], "title": "Cooking", "tags": ["food"] })
        );

        let back: StoredRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_vector_field_is_reserved() {
        let record = StoredRecord::new(vec![0.5]).with_field("vector", "oops");
        assert!(record.field("vector").is_none());
        assert_eq!(record.str_field("title"), None);
    }
}
