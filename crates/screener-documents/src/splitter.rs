use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::error::DocumentError;
use super::types::Document;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters carried over from the end of one chunk into the next.
    pub chunk_overlap: usize,
    /// Record each chunk's char offset in `metadata.start_index`.
    pub add_start_index: bool,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
            add_start_index: false,
        }
    }
}

impl SplitterConfig {
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidSplitterConfig`] if `chunk_size` is zero or the overlap
    /// is not strictly smaller than the chunk size.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.chunk_size == 0 || self.chunk_overlap >= self.chunk_size {
            return Err(DocumentError::InvalidSplitterConfig {
                chunk_size: self.chunk_size,
                chunk_overlap: self.chunk_overlap,
            });
        }
        Ok(())
    }
}

pub trait TextSplitter: Send + Sync {
    fn split_text(&self, text: &str) -> Vec<String>;

    /// Split every document, cloning its metadata onto each chunk.
    ///
    /// Chunks come out in input order, then left to right within a document.
    fn split_documents(&self, documents: &[Document]) -> Vec<Document> {
        documents
            .iter()
            .flat_map(|doc| {
                self.split_text(&doc.content)
                    .into_iter()
                    .map(|content| Document {
                        content,
                        metadata: doc.metadata.clone(),
                    })
            })
            .collect()
    }
}

/// Splits on the first separator present in the text, recursing into pieces that are still
/// too long with the remaining separators, then merges neighbouring pieces back up to
/// `chunk_size` with `chunk_overlap` characters of carry-over.
pub struct RecursiveCharacterSplitter {
    config: SplitterConfig,
    separators: Vec<String>,
}

impl RecursiveCharacterSplitter {
    /// Paragraphs, then lines, then words, then characters.
    pub const DEFAULT_SEPARATORS: [&'static str; 4] = ["\n\n", "\n", " ", ""];

    /// # Errors
    ///
    /// Returns an error if the config fails [`SplitterConfig::validate`].
    pub fn new(config: SplitterConfig) -> Result<Self, DocumentError> {
        config.validate()?;
        Ok(Self {
            config,
            separators: Self::DEFAULT_SEPARATORS
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        })
    }

    #[must_use]
    pub fn with_separators(mut self, separators: Vec<String>) -> Self {
        self.separators = separators;
        self
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut chunks = Vec::new();
        let (separator, remaining) = pick_separator(text, separators);

        let mut short: Vec<&str> = Vec::new();
        for piece in split_keeping_separator(text, separator) {
            if char_len(piece) < self.config.chunk_size {
                short.push(piece);
                continue;
            }
            if !short.is_empty() {
                chunks.extend(self.merge(&short));
                short.clear();
            }
            if remaining.is_empty() {
                chunks.push(piece.to_owned());
            } else {
                chunks.extend(self.split_recursive(piece, remaining));
            }
        }
        if !short.is_empty() {
            chunks.extend(self.merge(&short));
        }
        chunks
    }

    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let SplitterConfig {
            chunk_size,
            chunk_overlap,
            ..
        } = self.config;

        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0;

        for &piece in pieces {
            let len = char_len(piece);
            if total + len > chunk_size {
                if total > chunk_size {
                    tracing::warn!(size = total, chunk_size, "created chunk larger than chunk_size");
                }
                if !window.is_empty() {
                    if let Some(chunk) = join_trimmed(&window) {
                        chunks.push(chunk);
                    }
                    while total > chunk_overlap || (total + len > chunk_size && total > 0) {
                        let Some(front) = window.pop_front() else {
                            break;
                        };
                        total -= char_len(front);
                    }
                }
            }
            window.push_back(piece);
            total += len;
        }

        if let Some(chunk) = join_trimmed(&window) {
            chunks.push(chunk);
        }
        chunks
    }
}

impl TextSplitter for RecursiveCharacterSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    fn split_documents(&self, documents: &[Document]) -> Vec<Document> {
        let mut out = Vec::new();
        for doc in documents {
            let mut index: usize = 0;
            let mut previous_len: usize = 0;
            for content in self.split_text(&doc.content) {
                let mut metadata = doc.metadata.clone();
                if self.config.add_start_index {
                    let from = (index + previous_len).saturating_sub(self.config.chunk_overlap);
                    metadata.start_index = find_from(&doc.content, &content, from);
                    if let Some(found) = metadata.start_index {
                        index = found;
                    }
                    previous_len = char_len(&content);
                }
                out.push(Document { content, metadata });
            }
        }
        out
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// First separator occurring in `text`, plus the finer separators left for recursion.
fn pick_separator<'a>(text: &str, separators: &'a [String]) -> (&'a str, &'a [String]) {
    for (i, sep) in separators.iter().enumerate() {
        if sep.is_empty() {
            return ("", &[]);
        }
        if text.contains(sep.as_str()) {
            return (sep, &separators[i + 1..]);
        }
    }
    (separators.last().map_or("", String::as_str), &[])
}

/// Cut `text` before every occurrence of `separator`; an empty separator yields single chars.
fn split_keeping_separator<'t>(text: &'t str, separator: &str) -> Vec<&'t str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        if idx > start {
            pieces.push(&text[start..idx]);
        }
        start = idx;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

fn join_trimmed(window: &VecDeque<&str>) -> Option<String> {
    let joined: String = window.iter().copied().collect();
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Char offset of `needle` in `haystack`, searching from char offset `from`.
fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let byte_from = haystack
        .char_indices()
        .nth(from)
        .map_or(haystack.len(), |(b, _)| b);
    haystack[byte_from..]
        .find(needle)
        .map(|b| char_len(&haystack[..byte_from + b]))
}
