//! Command-line arguments and how they layer onto the configuration.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use notes_embeddings::resolve_ollama_url;
use notes_retrieval::{EmbeddingProviderType, RetrievalConfig};

/// Search through markdown notes and answer questions about them.
#[derive(Parser, Debug)]
#[command(name = "notes-searcher", version, about)]
pub struct Cli {
    /// Directory containing the notes.
    #[arg(long)]
    pub notes_dir: PathBuf,

    /// Rebuild the index before querying.
    #[arg(long)]
    pub index: bool,

    /// Question to answer from the notes.
    #[arg(long)]
    pub query: Option<String>,

    /// Directory holding the vector store [default: data/notes-db].
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of notes used to answer a query [default: 5].
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Generation model [default: mistral].
    #[arg(long)]
    pub model: Option<String>,

    /// Embedding model [default: all-minilm].
    #[arg(long)]
    pub embedding_model: Option<String>,

    /// Embedding provider.
    #[arg(long, value_enum)]
    pub embedder: Option<EmbedderArg>,

    /// Print results as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum EmbedderArg {
    Ollama,
    Hashing,
}

impl From<EmbedderArg> for EmbeddingProviderType {
    fn from(arg: EmbedderArg) -> Self {
        match arg {
            EmbedderArg::Ollama => Self::Ollama,
            EmbedderArg::Hashing => Self::Hashing,
        }
    }
}

impl Cli {
    /// The question to answer, if one was given. An empty `--query` is
    /// treated as absent.
    pub fn query_text(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }

    /// Resolve the configuration: defaults, then the TOML file, then
    /// `OLLAMA_HOST`, then flags.
    pub fn resolve_config(&self, ollama_host: Option<&str>) -> anyhow::Result<RetrievalConfig> {
        let mut config = match &self.config {
            Some(path) => RetrievalConfig::from_toml_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => RetrievalConfig::default(),
        };

        if let Some(host) = ollama_host.filter(|h| !h.trim().is_empty()) {
            let url = resolve_ollama_url(Some(host));
            config.embedding.base_url = Some(url.clone());
            config.generation.base_url = Some(url);
        }

        config.notes_dir = self.notes_dir.clone();
        if let Some(db_path) = &self.db_path {
            config.db_path = db_path.clone();
        }
        if let Some(k) = self.top_k {
            config.query.top_k = k;
        }
        if let Some(model) = &self.model {
            config.generation.model = model.clone();
        }
        if let Some(model) = &self.embedding_model {
            config.embedding.model = Some(model.clone());
        }
        if let Some(embedder) = self.embedder {
            config.embedding.provider = embedder.into();
        }

        Ok(config)
    }
}
