//! One-call entry points over the loader and splitter.

#[cfg(feature = "pdf")]
use std::path::Path;

use crate::splitter::{RecursiveCharacterSplitter, SplitterConfig, TextSplitter};
use crate::{Document, DocumentError};

pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

/// Load every `*.pdf` directly inside `directory`, one document per page.
///
/// A missing directory is created and yields an empty vec. The first unreadable PDF aborts
/// the load; use [`crate::DirectoryLoader`] with `silent_errors` to skip bad files instead.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or listed, or a PDF fails to parse.
#[cfg(feature = "pdf")]
pub fn load_docs(directory: impl AsRef<Path>) -> Result<Vec<Document>, DocumentError> {
    crate::DirectoryLoader::new(crate::PdfLoader::default()).load(directory.as_ref())
}

/// Split documents into overlapping chunks of at most `chunk_size` characters.
///
/// # Errors
///
/// Returns [`DocumentError::InvalidSplitterConfig`] if `chunk_overlap >= chunk_size` or
/// `chunk_size == 0`.
pub fn split_docs(
    documents: &[Document],
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<Document>, DocumentError> {
    split_docs_with(
        documents,
        SplitterConfig {
            chunk_size,
            chunk_overlap,
            ..SplitterConfig::default()
        },
    )
}

/// [`split_docs`] with the full splitter configuration.
///
/// # Errors
///
/// Returns an error if `config` is invalid.
pub fn split_docs_with(
    documents: &[Document],
    config: SplitterConfig,
) -> Result<Vec<Document>, DocumentError> {
    let splitter = RecursiveCharacterSplitter::new(config)?;
    let chunks = splitter.split_documents(documents);
    tracing::info!(
        documents = documents.len(),
        chunks = chunks.len(),
        "split documents into chunks"
    );
    Ok(chunks)
}
