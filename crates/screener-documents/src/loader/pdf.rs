use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use super::DocumentLoader;
use crate::{DEFAULT_MAX_FILE_SIZE, Document, DocumentError, DocumentMetadata};

/// Extracts text from a PDF, one [`Document`] per page.
pub struct PdfLoader {
    pub max_file_size: u64,
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl DocumentLoader for PdfLoader {
    fn load(&self, path: &Path) -> Result<Vec<Document>, DocumentError> {
        let path = std::fs::canonicalize(path)?;

        let meta = std::fs::metadata(&path)?;
        if meta.len() > self.max_file_size {
            return Err(DocumentError::FileTooLarge(meta.len()));
        }

        let source = path.display().to_string();
        // pdf-extract panics on some malformed inputs instead of returning an error
        let pages = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_by_pages(&path)
        }))
        .map_err(|_| DocumentError::Pdf(format!("{source}: parser panicked")))?
        .map_err(|e| DocumentError::Pdf(format!("{source}: {e}")))?;

        let total_pages = pages.len();
        tracing::debug!(source = %source, pages = total_pages, "extracted PDF text");

        Ok(pages
            .into_iter()
            .enumerate()
            .map(|(page, content)| {
                let mut metadata = DocumentMetadata::new(source.clone(), "application/pdf");
                metadata.page = Some(page);
                metadata.total_pages = Some(total_pages);
                Document { content, metadata }
            })
            .collect())
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }
}
