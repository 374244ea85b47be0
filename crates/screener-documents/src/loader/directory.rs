use std::path::{Path, PathBuf};

use super::DocumentLoader;
use crate::{Document, DocumentError};

#[derive(Debug, Clone)]
pub struct DirectoryLoaderConfig {
    /// Pattern matched relative to the directory; `*.pdf` only looks one level deep.
    pub glob: String,
    /// Skip files the loader fails on instead of aborting the whole load.
    pub silent_errors: bool,
}

impl Default for DirectoryLoaderConfig {
    fn default() -> Self {
        Self {
            glob: "*.pdf".to_owned(),
            silent_errors: false,
        }
    }
}

/// Runs a per-file [`DocumentLoader`] over every matching file in a directory.
pub struct DirectoryLoader<L> {
    loader: L,
    config: DirectoryLoaderConfig,
}

impl<L: DocumentLoader> DirectoryLoader<L> {
    #[must_use]
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            config: DirectoryLoaderConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: DirectoryLoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Load every matching file under `directory`, creating the directory if it is missing.
    ///
    /// Files are visited in the glob crate's sorted order. A missing directory is created and
    /// yields no documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or listed, if `directory` is not a
    /// directory, or if any file fails to load while `silent_errors` is off.
    pub fn load(&self, directory: &Path) -> Result<Vec<Document>, DocumentError> {
        if !directory.exists() {
            tracing::info!(directory = %directory.display(), "directory not found, creating it");
            std::fs::create_dir_all(directory)?;
        } else if !directory.is_dir() {
            return Err(DocumentError::Io(std::io::Error::new(
                std::io::ErrorKind::NotADirectory,
                format!("expected a directory: {}", directory.display()),
            )));
        }

        let mut documents = Vec::new();
        for path in self.matching_files(directory)? {
            match self.loader.load(&path) {
                Ok(docs) => documents.extend(docs),
                Err(e) if self.config.silent_errors => {
                    tracing::warn!(path = %path.display(), "skipping file: {e}");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            count = documents.len(),
            directory = %directory.display(),
            "loaded documents"
        );
        Ok(documents)
    }

    fn matching_files(&self, directory: &Path) -> Result<Vec<PathBuf>, DocumentError> {
        let dir = directory
            .to_str()
            .ok_or_else(|| DocumentError::NonUtf8Path(directory.to_path_buf()))?;
        let pattern = format!("{}/{}", glob::Pattern::escape(dir), self.config.glob);

        // Wildcards never match dot-prefixed names, so `._cv.pdf` and lock files stay out.
        let options = glob::MatchOptions {
            require_literal_leading_dot: true,
            ..glob::MatchOptions::default()
        };

        let supported = self.loader.supported_extensions();
        let mut files = Vec::new();
        for entry in glob::glob_with(&pattern, options)? {
            let path = entry?;
            if !path.is_file() {
                continue;
            }
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase)
                .unwrap_or_default();
            if supported.contains(&ext.as_str()) {
                files.push(path);
            } else {
                tracing::debug!(path = %path.display(), "no loader for extension, skipping");
            }
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::DocumentMetadata;

    /// Reads the file as UTF-8 and fails on files whose name starts with `bad`.
    #[derive(Default)]
    struct StubLoader {
        seen: Mutex<Vec<String>>,
    }

    impl DocumentLoader for StubLoader {
        fn load(&self, path: &Path) -> Result<Vec<Document>, DocumentError> {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            self.seen.lock().unwrap().push(name.clone());
            if name.starts_with("bad") {
                return Err(DocumentError::Io(std::io::Error::other("corrupt")));
            }
            let content = std::fs::read_to_string(path)?;
            Ok(vec![Document::new(
                content,
                DocumentMetadata::new(name, "text/plain"),
            )])
        }

        fn supported_extensions(&self) -> &[&str] {
            &["pdf"]
        }
    }

    #[test]
    fn missing_directory_is_created_and_empty() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("resumes").join("incoming");

        let docs = DirectoryLoader::new(StubLoader::default())
            .load(&dir)
            .unwrap();
        assert!(docs.is_empty());
        assert!(dir.is_dir());
    }

    #[test]
    fn only_top_level_pdfs_are_loaded() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("b.pdf"), "second").unwrap();
        std::fs::write(root.path().join("a.pdf"), "first").unwrap();
        std::fs::write(root.path().join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir(root.path().join("nested")).unwrap();
        std::fs::write(root.path().join("nested").join("c.pdf"), "deep").unwrap();

        let loader = DirectoryLoader::new(StubLoader::default());
        let docs = loader.load(root.path()).unwrap();
        let contents: Vec<_> = docs.iter().map(|d| d.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
    }

    #[test]
    fn failing_file_aborts_by_default() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("a.pdf"), "ok").unwrap();
        std::fs::write(root.path().join("bad.pdf"), "broken").unwrap();

        let result = DirectoryLoader::new(StubLoader::default()).load(root.path());
        assert!(matches!(result, Err(DocumentError::Io(_))));
    }

    #[test]
    fn silent_errors_skip_failing_file() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("a.pdf"), "ok").unwrap();
        std::fs::write(root.path().join("bad.pdf"), "broken").unwrap();
        std::fs::write(root.path().join("c.pdf"), "also ok").unwrap();

        let loader = DirectoryLoader::new(StubLoader::default()).with_config(
            DirectoryLoaderConfig {
                silent_errors: true,
                ..DirectoryLoaderConfig::default()
            },
        );
        let docs = loader.load(root.path()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(
            *loader.loader.seen.lock().unwrap(),
            vec!["a.pdf", "bad.pdf", "c.pdf"]
        );
    }

    #[test]
    fn hidden_files_are_not_loaded() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("jane.pdf"), "jane").unwrap();
        std::fs::write(root.path().join("._jane.pdf"), "resource fork").unwrap();
        std::fs::write(root.path().join(".~lock.cv.pdf"), "lock").unwrap();

        let loader = DirectoryLoader::new(StubLoader::default());
        let docs = loader.load(root.path()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(*loader.loader.seen.lock().unwrap(), vec!["jane.pdf"]);
    }

    #[test]
    fn file_path_instead_of_directory_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("resume.pdf");
        std::fs::write(&file, "x").unwrap();

        let result = DirectoryLoader::new(StubLoader::default()).load(&file);
        assert!(matches!(result, Err(DocumentError::Io(ref e)) if e.kind() == std::io::ErrorKind::NotADirectory));
    }

    #[test]
    fn custom_glob_narrows_matches() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("cv_jane.pdf"), "jane").unwrap();
        std::fs::write(root.path().join("cover_letter.pdf"), "letter").unwrap();

        let loader = DirectoryLoader::new(StubLoader::default()).with_config(
            DirectoryLoaderConfig {
                glob: "cv_*.pdf".into(),
                ..DirectoryLoaderConfig::default()
            },
        );
        let docs = loader.load(root.path()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "jane");
    }

    #[test]
    fn directory_name_with_glob_metacharacters() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("resumes [2024]");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("a.pdf"), "escaped").unwrap();

        let docs = DirectoryLoader::new(StubLoader::default())
            .load(&dir)
            .unwrap();
        assert_eq!(docs.len(), 1);
    }
}
