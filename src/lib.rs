//! Resume ingestion: hub authentication, PDF loading, chunking and sentence embeddings.
//!
//! The pieces are independent and the caller composes them: [`setup_logging`] once at
//! startup, [`authenticate_huggingface`], then [`load_docs`] into [`split_docs`], and finally
//! [`get_embeddings`] to obtain an [`Embedder`] for the chunks. [`ingest`] runs the load and
//! split steps from a [`Config`].

pub use screener_core;
pub use screener_documents;
pub use screener_llm;

pub use screener_core::{
    AuthError, Config, HF_TOKEN_ENV, LoggingConfig, LoggingError, authenticate,
    authenticate_huggingface, setup_logging,
};
pub use screener_documents::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, Document, DocumentError, DocumentMetadata,
    split_docs,
};
pub use screener_llm::{
    DEFAULT_EMBEDDING_MODEL, EMBEDDING_DIMENSION, Embedder, EmbeddingProvider, LlmError,
    get_embeddings,
};

#[cfg(feature = "pdf")]
pub use screener_documents::load_docs;

/// Load and chunk every resume named by `config`'s `[documents]` and `[splitter]` sections.
///
/// # Errors
///
/// Returns an error if loading fails or the splitter settings are invalid.
#[cfg(feature = "pdf")]
pub fn ingest(config: &Config) -> anyhow::Result<Vec<Document>> {
    use anyhow::Context as _;

    let documents = config.load_documents().with_context(|| {
        format!(
            "failed to load resumes from {}",
            config.documents.directory.display()
        )
    })?;
    let chunks = config
        .split_documents(&documents)
        .context("failed to split resumes")?;
    tracing::info!(
        documents = documents.len(),
        chunks = chunks.len(),
        "ingested resumes"
    );
    Ok(chunks)
}

/// Embed chunk contents in order, one vector per chunk.
///
/// # Errors
///
/// Returns the first embedding error.
pub fn embed_chunks<E>(model: &E, chunks: &[Document]) -> Result<Vec<Vec<f32>>, LlmError>
where
    E: Embedder + ?Sized,
{
    let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    let vectors = model.embed_documents(&texts)?;
    tracing::debug!(model = model.model_id(), count = vectors.len(), "embedded chunks");
    Ok(vectors)
}
