//! Loading PDF resumes into [`Document`]s and splitting them into overlapping chunks.

pub mod error;
pub mod loader;
pub mod pipeline;
pub mod splitter;
pub mod types;

pub use error::DocumentError;
pub use loader::{DirectoryLoader, DirectoryLoaderConfig, DocumentLoader};
pub use pipeline::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, split_docs, split_docs_with};
pub use splitter::{RecursiveCharacterSplitter, SplitterConfig, TextSplitter};
pub use types::{Document, DocumentMetadata};

#[cfg(feature = "pdf")]
pub use loader::PdfLoader;
#[cfg(feature = "pdf")]
pub use pipeline::load_docs;

/// Default maximum file size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;
