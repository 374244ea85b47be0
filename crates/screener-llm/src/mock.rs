//! Test doubles for the embedding factory and hub login.

use std::sync::{Arc, Mutex};

use crate::embedding::{EMBEDDING_DIMENSION, Embedder, EmbeddingProvider};
use crate::error::LlmError;
use crate::hub::{HubAuth, HubIdentity};

#[derive(Debug, Clone)]
pub struct MockEmbedder {
    pub model_id: String,
    pub embedding: Vec<f32>,
}

impl Embedder for MockEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn embed_query(&self, _text: &str) -> Result<Vec<f32>, LlmError> {
        Ok(self.embedding.clone())
    }
}

/// Records every model name it is asked to load.
#[derive(Debug, Clone)]
pub struct MockEmbeddingProvider {
    requested: Arc<Mutex<Vec<String>>>,
    pub embedding: Vec<f32>,
    pub fail_load: bool,
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self {
            requested: Arc::new(Mutex::new(Vec::new())),
            embedding: vec![0.0; EMBEDDING_DIMENSION],
            fail_load: false,
        }
    }
}

impl MockEmbeddingProvider {
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_load: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl EmbeddingProvider for MockEmbeddingProvider {
    type Model = MockEmbedder;

    fn load(&self, model_name: &str) -> Result<MockEmbedder, LlmError> {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(model_name.to_owned());
        }
        if self.fail_load {
            return Err(LlmError::ModelLoad(format!(
                "mock refused to load {model_name}"
            )));
        }
        Ok(MockEmbedder {
            model_id: model_name.to_owned(),
            embedding: self.embedding.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Captures the tokens passed to [`HubAuth::login`].
#[derive(Debug, Clone, Default)]
pub struct MockHubAuth {
    tokens: Arc<Mutex<Vec<String>>>,
    pub reject: bool,
}

impl MockHubAuth {
    #[must_use]
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

impl HubAuth for MockHubAuth {
    fn login(&self, token: &str) -> Result<HubIdentity, LlmError> {
        if let Ok(mut tokens) = self.tokens.lock() {
            tokens.push(token.to_owned());
        }
        if self.reject {
            return Err(LlmError::HubStatus {
                status: 401,
                body: "Invalid credentials in Authorization header".into(),
            });
        }
        Ok(HubIdentity {
            name: "mock-user".into(),
            kind: Some("user".into()),
        })
    }
}
