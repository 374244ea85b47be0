//! Embedding model construction and HuggingFace Hub access.

#[cfg(feature = "candle")]
pub mod candle_provider;
pub mod embedding;
pub mod error;
pub mod hub;
#[cfg(feature = "mock")]
pub mod mock;

pub use embedding::{
    DEFAULT_EMBEDDING_MODEL, DEFAULT_MAX_SEQUENCE_LENGTH, DeviceKind, EMBEDDING_DIMENSION, Embedder,
    EmbeddingProvider, get_embeddings,
};
pub use error::LlmError;
pub use hub::{DEFAULT_HUB_ENDPOINT, HubAuth, HubClient, HubIdentity};
