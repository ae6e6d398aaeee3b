#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use notes_embeddings::{Embedding, EmbeddingError};
use notes_retrieval::{
    EmbeddingProvider, GenerationError, GenerativeModel, HashingProvider, NotesSearcher,
    RetrievalConfig,
};

pub const ANSWER: &str = "Pasta boils in about 10 minutes.";

/// Generator that records every prompt and returns a fixed answer.
#[derive(Default)]
pub struct RecordingGenerator {
    prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> String {
        self.prompts().pop().unwrap()
    }
}

#[async_trait]
impl GenerativeModel for RecordingGenerator {
    fn model(&self) -> &str {
        "recording"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(ANSWER.to_string())
    }
}

/// Embedder posing as the default Ollama model: same dimension as the
/// hashing embedder, different vectors.
pub struct MiniLmLookalike;

#[async_trait]
impl EmbeddingProvider for MiniLmLookalike {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        "all-minilm"
    }

    fn dimension(&self) -> Option<usize> {
        Some(384)
    }

    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let mut vector = vec![0.0; 384];
        vector[text.len() % 384] = 1.0;
        Ok(vector)
    }
}

/// Generator that always reports the model as down.
pub struct FailingGenerator;

#[async_trait]
impl GenerativeModel for FailingGenerator {
    fn model(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Api {
            status: 503,
            message: "model is loading".to_string(),
        })
    }
}

pub fn write_note(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Write the cooking and hiking notes.
pub fn write_sample_notes(dir: &Path) {
    write_note(
        dir,
        "a.md",
        "---\ntitle: Cooking\ntags: [food]\n---\nPasta boils in 10 minutes.",
    );
    write_note(
        dir,
        "b.md",
        "---\ntitle: Hiking\n---\nMount Rainier trail is 12 miles.",
    );
}

/// A searcher over `notes_dir` using `embedder`, with a store in `db_dir`.
pub async fn searcher_with_embedder(
    notes_dir: &Path,
    db_dir: &Path,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn GenerativeModel>,
) -> NotesSearcher {
    NotesSearcher::builder()
        .with_config(RetrievalConfig::new(notes_dir).with_db_path(db_dir))
        .with_embedder(embedder)
        .with_generator(generator)
        .build()
        .await
        .unwrap()
}

/// A searcher over `notes_dir` with an offline embedder and a store in
/// `db_dir`.
pub async fn searcher(
    notes_dir: &Path,
    db_dir: &Path,
    generator: Arc<dyn GenerativeModel>,
) -> NotesSearcher {
    searcher_with_embedder(
        notes_dir,
        db_dir,
        Arc::new(HashingProvider::default()),
        generator,
    )
    .await
}
