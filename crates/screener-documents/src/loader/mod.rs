mod directory;
#[cfg(feature = "pdf")]
mod pdf;

use std::path::Path;

pub use directory::{DirectoryLoader, DirectoryLoaderConfig};
#[cfg(feature = "pdf")]
pub use pdf::PdfLoader;

use crate::{Document, DocumentError};

/// Parses a single file into one or more documents.
pub trait DocumentLoader: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    fn load(&self, path: &Path) -> Result<Vec<Document>, DocumentError>;

    /// Lowercase extensions, without the leading dot.
    fn supported_extensions(&self) -> &[&str];
}
