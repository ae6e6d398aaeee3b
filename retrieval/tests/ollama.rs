use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use notes_retrieval::{
    EmbeddingConfig, GenerationConfig, GenerationError, GenerativeModel, NotesSearcher,
    OllamaGenerator, RetrievalConfig, RetrievalError,
};

#[tokio::test]
async fn test_generate_sends_non_streaming_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "mistral",
            "prompt": "Say hi",
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "mistral",
            "response": "Hi!",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let generator = OllamaGenerator::new().with_base_url(server.uri());
    assert_eq!(generator.generate("Say hi").await.unwrap(), "Hi!");
}

#[tokio::test]
async fn test_generate_reports_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "model 'llama9' not found"})),
        )
        .mount(&server)
        .await;

    let generator = OllamaGenerator::new()
        .with_base_url(server.uri())
        .with_model("llama9");
    let err = generator.generate("Say hi").await.unwrap_err();

    match err {
        GenerationError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "model 'llama9' not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_generate_rejects_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let generator = OllamaGenerator::new().with_base_url(server.uri());
    let err = generator.generate("Say hi").await.unwrap_err();
    assert!(matches!(err, GenerationError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_searcher_against_ollama_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .and(body_partial_json(json!({"model": "all-minilm"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"embeddings": [[0.6, 0.8, 0.0]]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"model": "mistral", "stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Boil it for 10 minutes.",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let notes = TempDir::new().unwrap();
    let db = TempDir::new().unwrap();
    std::fs::write(
        notes.path().join("a.md"),
        "---\ntitle: Cooking\n---\nPasta boils in 10 minutes.",
    )
    .unwrap();

    let config = RetrievalConfig::new(notes.path())
        .with_db_path(db.path())
        .with_embedding(EmbeddingConfig {
            base_url: Some(server.uri()),
            ..EmbeddingConfig::default()
        })
        .with_generation(GenerationConfig {
            base_url: Some(server.uri()),
            ..GenerationConfig::default()
        });
    let searcher = NotesSearcher::open(config).await.unwrap();

    assert_eq!(searcher.index_notes().await.unwrap().dimension, Some(3));

    let response = searcher.search("how long to boil pasta").await.unwrap();
    assert_eq!(response.answer, "Boil it for 10 minutes.");
    assert_eq!(response.sources.len(), 1);
    assert_eq!(response.sources[0].title, "Cooking");
    assert_eq!(response.sources[0].relevance_score, 0.0);
}

#[tokio::test]
async fn test_unreachable_model_is_generation_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"embeddings": [[1.0, 0.0]]})),
        )
        .mount(&server)
        .await;

    let notes = TempDir::new().unwrap();
    let db = TempDir::new().unwrap();
    std::fs::write(notes.path().join("a.md"), "Pasta boils in 10 minutes.").unwrap();

    let config = RetrievalConfig::new(notes.path())
        .with_db_path(db.path())
        .with_embedding(EmbeddingConfig {
            base_url: Some(server.uri()),
            ..EmbeddingConfig::default()
        })
        .with_generation(GenerationConfig {
            // Port 9 (discard) is closed on test hosts.
            base_url: Some("http://127.0.0.1:9".to_string()),
            ..GenerationConfig::default()
        });
    let searcher = NotesSearcher::open(config).await.unwrap();
    searcher.index_notes().await.unwrap();

    let err = searcher.search("pasta").await.unwrap_err();
    assert!(matches!(
        err,
        RetrievalError::GenerationUnavailable(GenerationError::Unreachable(_))
    ));
}
