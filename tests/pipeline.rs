use resume_screener::screener_core::MapVaultProvider;
use resume_screener::screener_llm::mock::{MockEmbeddingProvider, MockHubAuth};
use resume_screener::{
    AuthError, Config, DEFAULT_EMBEDDING_MODEL, Document, DocumentMetadata, EMBEDDING_DIMENSION,
    Embedder, HF_TOKEN_ENV, authenticate, embed_chunks, get_embeddings, split_docs,
};

fn resume(source: &str, text: &str) -> Document {
    let mut metadata = DocumentMetadata::new(source, "application/pdf");
    metadata.page = Some(0);
    metadata.total_pages = Some(1);
    Document::new(text, metadata)
}

fn long_resume() -> String {
    let mut text = String::from("Jane Doe\nSenior Rust Engineer\n\n");
    for i in 0..40 {
        text.push_str(&format!(
            "Project {i}: built a streaming ingestion service handling resumes at scale. "
        ));
    }
    text
}

#[test]
fn chunks_flow_into_default_embedder() {
    let docs = vec![resume("resumes/jane.pdf", &long_resume())];
    let chunks = split_docs(&docs, 500, 50).unwrap();
    assert!(chunks.len() > 1);
    assert!(chunks.iter().all(|c| c.content.chars().count() <= 500));
    assert!(chunks.iter().all(|c| c.metadata.source == "resumes/jane.pdf"));

    let provider = MockEmbeddingProvider::default();
    let model = get_embeddings(&provider, None).unwrap();
    assert_eq!(provider.requested(), vec![DEFAULT_EMBEDDING_MODEL]);

    let vectors = embed_chunks(&model, &chunks).unwrap();
    assert_eq!(vectors.len(), chunks.len());
    assert!(vectors.iter().all(|v| v.len() == EMBEDDING_DIMENSION));
}

#[test]
fn config_selects_embedding_model() {
    let mut config = Config::default();
    config.embedding.model = "BAAI/bge-small-en-v1.5".into();
    let provider = MockEmbeddingProvider::default();

    let model = config.embeddings(&provider).unwrap();
    assert_eq!(model.model_id(), "BAAI/bge-small-en-v1.5");
    assert_eq!(provider.requested(), vec!["BAAI/bge-small-en-v1.5"]);
}

#[test]
fn chunk_order_follows_document_order() {
    let docs = vec![
        resume("a.pdf", "alpha resume body"),
        resume("b.pdf", "beta resume body"),
    ];
    let chunks = split_docs(&docs, 500, 50).unwrap();
    let sources: Vec<&str> = chunks.iter().map(|c| c.metadata.source.as_str()).collect();
    assert_eq!(sources, vec!["a.pdf", "b.pdf"]);
}

#[test]
fn failing_embedding_provider_surfaces_error() {
    let provider = MockEmbeddingProvider::failing();
    assert!(get_embeddings(&provider, Some("org/missing-model")).is_err());
    assert_eq!(provider.requested(), vec!["org/missing-model"]);
}

#[test]
fn authentication_prefers_explicit_token() {
    let vault = MapVaultProvider::new().with_secret(HF_TOKEN_ENV, "hf_env");
    let client = MockHubAuth::default();
    authenticate(Some("hf_arg"), &vault, &client).unwrap();
    authenticate(None, &vault, &client).unwrap();
    assert_eq!(client.tokens(), vec!["hf_arg", "hf_env"]);
}

#[test]
fn authentication_without_token_makes_no_request() {
    let client = MockHubAuth::default();
    let err = authenticate(None, &MapVaultProvider::new(), &client).unwrap_err();
    assert!(matches!(err, AuthError::MissingToken));
    assert!(client.tokens().is_empty());
}

#[cfg(feature = "pdf")]
#[test]
fn ingest_from_config_on_empty_directory() {
    let root = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.documents.directory = root.path().join("incoming");
    std::fs::create_dir_all(&config.documents.directory).unwrap();
    std::fs::write(config.documents.directory.join("cover.txt"), "not a pdf").unwrap();

    let chunks = resume_screener::ingest(&config).unwrap();
    assert!(chunks.is_empty());
}

#[cfg(feature = "pdf")]
#[test]
fn ingest_rejects_invalid_splitter_settings() {
    let root = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.documents.directory = root.path().to_path_buf();
    config.splitter.chunk_overlap = config.splitter.chunk_size;

    let err = resume_screener::ingest(&config).unwrap_err();
    assert!(format!("{err:#}").contains("failed to split resumes"));
}

#[cfg(feature = "pdf")]
#[test]
fn load_docs_creates_missing_directory() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("data").join("resumes");
    let docs = resume_screener::load_docs(&dir).unwrap();
    assert!(docs.is_empty());
    assert!(dir.is_dir());
}
