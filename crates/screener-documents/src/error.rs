use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("failed to read directory entry: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("file too large: {0} bytes")]
    FileTooLarge(u64),

    #[cfg(feature = "pdf")]
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("invalid splitter config: chunk_size={chunk_size}, chunk_overlap={chunk_overlap}")]
    InvalidSplitterConfig {
        chunk_size: usize,
        chunk_overlap: usize,
    },
}
