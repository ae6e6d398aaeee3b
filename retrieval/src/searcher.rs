//! The notes searcher: owns the providers and store for the life of the
//! process and exposes indexing and querying.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use notes_embeddings::{
    DEFAULT_HASHING_DIMENSION, DEFAULT_OLLAMA_EMBEDDING_MODEL, EmbeddingProvider,
    HashingProvider, OllamaProvider,
};
use notes_vector_store::{FileVectorStore, VectorStore};

use crate::config::{EmbeddingConfig, EmbeddingProviderType, GenerationConfig, RetrievalConfig};
use crate::engine::QueryEngine;
use crate::error::Result;
use crate::generation::{GenerativeModel, OllamaGenerator};
use crate::indexer::Indexer;
use crate::result::{IndexReport, QueryResponse, SearchResult};

/// Indexes a notes directory and answers questions about it.
///
/// Construct one per process with [`NotesSearcher::open`] or the
/// [builder](NotesSearcher::builder); the embedder, store and generator are
/// created once and shared by indexing and querying.
pub struct NotesSearcher {
    config: RetrievalConfig,
    store: Arc<dyn VectorStore>,
    indexer: Indexer,
    engine: QueryEngine,
}

impl NotesSearcher {
    /// Create a new searcher builder.
    pub fn builder() -> NotesSearcherBuilder {
        NotesSearcherBuilder::new()
    }

    /// Open the store and create the model clients described by `config`.
    pub async fn open(config: RetrievalConfig) -> Result<Self> {
        Self::builder().with_config(config).build().await
    }

    fn from_parts(
        config: RetrievalConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        generator: Arc<dyn GenerativeModel>,
    ) -> Self {
        let indexer = Indexer::new(Arc::clone(&embedder), Arc::clone(&store), &config.table_name)
            .with_scan_config(config.scan.clone());
        let engine = QueryEngine::new(embedder, Arc::clone(&store), generator, &config.table_name)
            .with_context_chars(config.query.context_chars);

        Self {
            config,
            store,
            indexer,
            engine,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Rebuild the index from the configured notes directory.
    pub async fn index_notes(&self) -> Result<IndexReport> {
        self.indexer.index(&self.config.notes_dir).await
    }

    /// Answer `query` using the configured number of notes.
    pub async fn search(&self, query: &str) -> Result<QueryResponse> {
        self.engine.query(query, self.config.query.top_k).await
    }

    /// Answer `query` using the `k` most relevant notes.
    pub async fn search_with_k(&self, query: &str, k: usize) -> Result<QueryResponse> {
        self.engine.query(query, k).await
    }

    /// Retrieve the `k` most relevant notes without generating an answer.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        self.engine.retrieve(query, k).await
    }

    /// Get searcher statistics.
    pub async fn stats(&self) -> Result<SearcherStats> {
        let table = &self.config.table_name;
        let indexed_notes = if self.store.table_exists(table).await? {
            Some(self.store.count(table).await?)
        } else {
            None
        };

        Ok(SearcherStats {
            notes_dir: self.config.notes_dir.clone(),
            db_path: self.config.db_path.clone(),
            table: table.clone(),
            indexed_notes,
        })
    }
}

/// Builder for [`NotesSearcher`].
///
/// Components left unset are created from the configuration when
/// [`build`](NotesSearcherBuilder::build) runs.
pub struct NotesSearcherBuilder {
    config: RetrievalConfig,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    store: Option<Arc<dyn VectorStore>>,
    generator: Option<Arc<dyn GenerativeModel>>,
}

impl NotesSearcherBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: RetrievalConfig::default(),
            embedder: None,
            store: None,
            generator: None,
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: RetrievalConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the notes directory.
    pub fn with_notes_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.notes_dir = dir.into();
        self
    }

    /// Set the vector store location.
    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.db_path = path.into();
        self
    }

    /// Set the number of notes retrieved per query.
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.config.query.top_k = k;
        self
    }

    /// Use this embedding provider instead of one built from the config.
    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Use this vector store instead of opening `db_path`.
    pub fn with_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use this generative model instead of one built from the config.
    pub fn with_generator(mut self, generator: Arc<dyn GenerativeModel>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Build the searcher.
    pub async fn build(self) -> Result<NotesSearcher> {
        let config = self.config;

        let embedder = match self.embedder {
            Some(embedder) => embedder,
            None => embedder_from_config(&config.embedding),
        };
        let store = match self.store {
            Some(store) => store,
            None => {
                let store = FileVectorStore::open(&config.db_path)
                    .await?
                    .with_metric(config.store.metric);
                Arc::new(store) as Arc<dyn VectorStore>
            }
        };
        let generator = match self.generator {
            Some(generator) => generator,
            None => generator_from_config(&config.generation),
        };

        info!(
            embedder = embedder.name(),
            embedding_model = embedder.model(),
            generation_model = generator.model(),
            db_path = %config.db_path.display(),
            "Notes searcher ready"
        );

        Ok(NotesSearcher::from_parts(config, embedder, store, generator))
    }
}

impl Default for NotesSearcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the embedding provider described by `config`.
pub fn embedder_from_config(config: &EmbeddingConfig) -> Arc<dyn EmbeddingProvider> {
    match config.provider {
        EmbeddingProviderType::Ollama => {
            let mut provider = OllamaProvider::new().with_model(
                config
                    .model
                    .as_deref()
                    .unwrap_or(DEFAULT_OLLAMA_EMBEDDING_MODEL),
            );
            if let Some(url) = &config.base_url {
                provider = provider.with_base_url(url.as_str());
            }
            if let Some(dimension) = config.dimension {
                provider = provider.with_dimension(dimension);
            }
            Arc::new(provider)
        }
        EmbeddingProviderType::Hashing => Arc::new(HashingProvider::new(
            config.dimension.unwrap_or(DEFAULT_HASHING_DIMENSION),
        )),
    }
}

/// Create the generative model described by `config`.
pub fn generator_from_config(config: &GenerationConfig) -> Arc<dyn GenerativeModel> {
    let mut generator = OllamaGenerator::new().with_model(config.model.as_str());
    if let Some(url) = &config.base_url {
        generator = generator.with_base_url(url.as_str());
    }
    Arc::new(generator)
}

/// Statistics about the searcher.
#[derive(Debug, Clone)]
pub struct SearcherStats {
    /// Directory notes are indexed from.
    pub notes_dir: PathBuf,

    /// Vector store location.
    pub db_path: PathBuf,

    /// Notes table name.
    pub table: String,

    /// Number of indexed notes, or `None` before the first index.
    pub indexed_notes: Option<usize>,
}
