use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// Sentence-transformers model used when the caller does not name one.
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Vector width produced by [`DEFAULT_EMBEDDING_MODEL`].
///
/// Informational only: nothing compares it against the model that actually gets loaded.
pub const EMBEDDING_DIMENSION: usize = 384;

/// Default token window; matches the `max_seq_length` sentence-transformers ships for MiniLM.
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 256;

/// Compute device an embedding backend should run on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    #[default]
    Cpu,
    Cuda,
    Metal,
}

impl std::str::FromStr for DeviceKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "cuda" => Ok(Self::Cuda),
            "metal" => Ok(Self::Metal),
            other => Err(LlmError::Other(format!("unknown device: {other}"))),
        }
    }
}

/// A loaded embedding model bound to a single model identifier.
pub trait Embedder: Send + Sync {
    fn model_id(&self) -> &str;

    /// Embed a single piece of text.
    ///
    /// # Errors
    ///
    /// Returns an error if tokenization or the forward pass fails.
    fn embed_query(&self, text: &str) -> Result<Vec<f32>, LlmError>;

    /// Embed a batch of texts, preserving input order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while embedding any text.
    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        texts.iter().map(|text| self.embed_query(text)).collect()
    }
}

/// Resolves a model identifier into a ready-to-use [`Embedder`].
pub trait EmbeddingProvider: Send + Sync {
    type Model: Embedder;

    /// # Errors
    ///
    /// Returns an error if the identifier is unknown to the backend or the model fails to load.
    fn load(&self, model_name: &str) -> Result<Self::Model, LlmError>;

    fn name(&self) -> &'static str;
}

/// Construct an embedding model, falling back to [`DEFAULT_EMBEDDING_MODEL`].
///
/// The identifier is handed to the provider untouched; validation and any artifact download
/// happen inside the provider.
///
/// # Errors
///
/// Propagates the provider's error unchanged.
pub fn get_embeddings<P>(provider: &P, model_name: Option<&str>) -> Result<P::Model, LlmError>
where
    P: EmbeddingProvider + ?Sized,
{
    let model_name = model_name.unwrap_or(DEFAULT_EMBEDDING_MODEL);
    tracing::info!(
        model = model_name,
        provider = provider.name(),
        "loading embedding model"
    );
    let model = provider.load(model_name)?;
    tracing::info!(model = model.model_id(), "embedding model loaded");
    Ok(model)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug)]
    struct FixedEmbedder {
        id: String,
    }

    impl Embedder for FixedEmbedder {
        fn model_id(&self) -> &str {
            &self.id
        }

        fn embed_query(&self, text: &str) -> Result<Vec<f32>, LlmError> {
            if text.is_empty() {
                return Err(LlmError::Inference("empty input".into()));
            }
            #[allow(clippy::cast_precision_loss)]
            Ok(vec![text.len() as f32])
        }
    }

    #[derive(Default)]
    struct RecordingProvider {
        requested: Mutex<Vec<String>>,
        fail: bool,
    }

    impl EmbeddingProvider for RecordingProvider {
        type Model = FixedEmbedder;

        fn load(&self, model_name: &str) -> Result<Self::Model, LlmError> {
            self.requested.lock().unwrap().push(model_name.to_owned());
            if self.fail {
                return Err(LlmError::ModelLoad(format!("no such repo: {model_name}")));
            }
            Ok(FixedEmbedder {
                id: model_name.to_owned(),
            })
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    #[test]
    fn default_model_used_when_none_given() {
        let provider = RecordingProvider::default();
        let model = get_embeddings(&provider, None).unwrap();
        assert_eq!(model.model_id(), DEFAULT_EMBEDDING_MODEL);
        assert_eq!(
            *provider.requested.lock().unwrap(),
            vec![DEFAULT_EMBEDDING_MODEL.to_owned()]
        );
    }

    #[test]
    fn explicit_model_passed_unchanged() {
        let provider = RecordingProvider::default();
        let model = get_embeddings(&provider, Some("BAAI/bge-small-en-v1.5")).unwrap();
        assert_eq!(model.model_id(), "BAAI/bge-small-en-v1.5");
        assert_eq!(
            *provider.requested.lock().unwrap(),
            vec!["BAAI/bge-small-en-v1.5".to_owned()]
        );
    }

    #[test]
    fn provider_error_propagates() {
        let provider = RecordingProvider {
            fail: true,
            ..RecordingProvider::default()
        };
        let err = get_embeddings(&provider, Some("not/a-model")).unwrap_err();
        assert!(matches!(err, LlmError::ModelLoad(ref msg) if msg.contains("not/a-model")));
    }

    #[test]
    fn embed_documents_preserves_order() {
        let model = FixedEmbedder { id: "x".into() };
        let vectors = model
            .embed_documents(&["a".to_owned(), "abc".to_owned(), "ab".to_owned()])
            .unwrap();
        assert_eq!(vectors, vec![vec![1.0], vec![3.0], vec![2.0]]);
    }

    #[test]
    fn embed_documents_stops_on_first_error() {
        let model = FixedEmbedder { id: "x".into() };
        let result = model.embed_documents(&["ok".to_owned(), String::new()]);
        assert!(matches!(result, Err(LlmError::Inference(_))));
    }

    #[test]
    fn device_kind_parses_case_insensitively() {
        assert_eq!("CPU".parse::<DeviceKind>().unwrap(), DeviceKind::Cpu);
        assert_eq!(" cuda ".parse::<DeviceKind>().unwrap(), DeviceKind::Cuda);
        assert_eq!("metal".parse::<DeviceKind>().unwrap(), DeviceKind::Metal);
        assert!("tpu".parse::<DeviceKind>().is_err());
    }
}
