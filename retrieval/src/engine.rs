//! Query engine: retrieve the nearest notes and ask the model for a
//! grounded answer.

use std::sync::Arc;

use tracing::{debug, info};

use notes_embeddings::EmbeddingProvider;
use notes_vector_store::VectorStore;

use crate::error::{Result, RetrievalError};
use crate::generation::GenerativeModel;
use crate::prompt::{build_context, build_prompt};
use crate::result::{EMBEDDER_KEY, QueryResponse, SearchResult, embedder_identity};

/// Default number of characters of each note placed in the prompt.
pub const DEFAULT_CONTEXT_CHARS: usize = 1500;

/// Answers questions against an indexed notes table.
pub struct QueryEngine {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    generator: Arc<dyn GenerativeModel>,
    table: String,
    context_chars: usize,
}

impl QueryEngine {
    /// Create a query engine over `table`.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        generator: Arc<dyn GenerativeModel>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            embedder,
            store,
            generator,
            table: table.into(),
            context_chars: DEFAULT_CONTEXT_CHARS,
        }
    }

    /// Set how many characters of each note go into the prompt.
    pub fn with_context_chars(mut self, chars: usize) -> Self {
        self.context_chars = chars;
        self
    }

    /// Find the `k` notes nearest `query`, most relevant first.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        self.check_embedder().await?;

        let vector = self.embedder.embed(query).await?;
        let hits = self.store.search(&self.table, &vector, k).await?;
        debug!("Retrieved {} notes for query", hits.len());

        hits.into_iter().map(SearchResult::from_scored).collect()
    }

    /// Fail unless the table exists and was built by this engine's embedder.
    ///
    /// Runs before the query is embedded. Tables without a recorded
    /// embedder are accepted.
    async fn check_embedder(&self) -> Result<()> {
        let metadata = self.store.metadata(&self.table).await?;
        let current = embedder_identity(self.embedder.as_ref());
        match metadata.get(EMBEDDER_KEY).and_then(serde_json::Value::as_str) {
            Some(indexed) if indexed != current => Err(RetrievalError::EmbedderMismatch {
                indexed: indexed.to_string(),
                current,
            }),
            _ => Ok(()),
        }
    }

    /// Build the grounded prompt for `query` from already retrieved notes.
    pub fn prompt_for(&self, query: &str, results: &[SearchResult]) -> String {
        build_prompt(query, &build_context(results, self.context_chars))
    }

    /// Answer `query` from the `k` most relevant notes.
    pub async fn query(&self, query: &str, k: usize) -> Result<QueryResponse> {
        info!("Processing query: {query}");

        let results = self.retrieve(query, k).await?;
        let prompt = self.prompt_for(query, &results);
        let answer = self.generator.generate(&prompt).await?;

        Ok(QueryResponse {
            answer,
            sources: results.iter().map(SearchResult::source).collect(),
        })
    }
}
