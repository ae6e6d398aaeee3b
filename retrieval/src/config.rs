//! Configuration for indexing and querying.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use notes_embeddings::DistanceMetric;
use notes_loader::LoaderConfig;

use crate::error::{Result, RetrievalError};

/// Default location of the vector store.
pub const DEFAULT_DB_PATH: &str = "data/notes-db";

/// Name of the collection notes are indexed into.
pub const DEFAULT_TABLE_NAME: &str = "notes";

/// Default generation model.
pub const DEFAULT_GENERATION_MODEL: &str = "mistral";

/// Configuration for the notes searcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Directory of notes to index.
    pub notes_dir: PathBuf,

    /// Directory holding the vector store.
    pub db_path: PathBuf,

    /// Collection the notes are indexed into.
    pub table_name: String,

    /// Note discovery options.
    pub scan: ScanConfig,

    /// Embedding provider configuration.
    pub embedding: EmbeddingConfig,

    /// Generative model configuration.
    pub generation: GenerationConfig,

    /// Query processing configuration.
    pub query: QueryConfig,

    /// Vector store configuration.
    pub store: StoreConfig,
}

impl RetrievalConfig {
    /// Create a new configuration with default values.
    pub fn new(notes_dir: impl Into<PathBuf>) -> Self {
        Self {
            notes_dir: notes_dir.into(),
            ..Self::default()
        }
    }

    /// Load a configuration from a TOML file. Missing keys take defaults.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| RetrievalError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
            .map_err(|e| RetrievalError::Config(format!("{}: {e}", path.display())))
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| RetrievalError::Config(e.to_string()))
    }

    /// Set the vector store location.
    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }

    /// Set the embedding configuration.
    pub fn with_embedding(mut self, config: EmbeddingConfig) -> Self {
        self.embedding = config;
        self
    }

    /// Set the generation configuration.
    pub fn with_generation(mut self, config: GenerationConfig) -> Self {
        self.generation = config;
        self
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            notes_dir: PathBuf::from("."),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            scan: ScanConfig::default(),
            embedding: EmbeddingConfig::default(),
            generation: GenerationConfig::default(),
            query: QueryConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

/// Note discovery options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Also load dot-prefixed files and directories.
    pub include_hidden: bool,

    /// Follow symbolic links.
    pub follow_symlinks: bool,

    /// Maximum depth to recurse (None = unlimited).
    pub max_depth: Option<usize>,
}

impl ScanConfig {
    /// Loader configuration rooted at `root`.
    pub fn loader_config(&self, root: &Path) -> LoaderConfig {
        LoaderConfig {
            root: root.to_path_buf(),
            include_hidden: self.include_hidden,
            follow_symlinks: self.follow_symlinks,
            max_depth: self.max_depth,
        }
    }
}

/// Configuration for the embedding provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Which provider to use.
    pub provider: EmbeddingProviderType,

    /// Model to use (provider default when unset).
    pub model: Option<String>,

    /// Base URL of the Ollama API (`OLLAMA_HOST` or localhost when unset).
    pub base_url: Option<String>,

    /// Expected vector dimension. Required size for the hashing provider.
    pub dimension: Option<usize>,
}

/// Type of embedding provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderType {
    /// Model served by Ollama.
    #[default]
    Ollama,
    /// Offline feature hashing.
    Hashing,
}

/// Configuration for the generative model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Model identifier.
    pub model: String,

    /// Base URL of the Ollama API (`OLLAMA_HOST` or localhost when unset).
    pub base_url: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_GENERATION_MODEL.to_string(),
            base_url: None,
        }
    }
}

/// Configuration for query processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Number of notes retrieved per query.
    pub top_k: usize,

    /// Characters of each note's content placed in the prompt.
    pub context_chars: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            context_chars: 1500,
        }
    }
}

/// Configuration for the vector store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Distance metric for newly built tables.
    pub metric: DistanceMetric,
}
