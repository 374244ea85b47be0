use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use screener_documents::{DEFAULT_MAX_FILE_SIZE, SplitterConfig};
use screener_llm::{
    DEFAULT_EMBEDDING_MODEL, DEFAULT_HUB_ENDPOINT, DEFAULT_MAX_SEQUENCE_LENGTH, DeviceKind,
};

use crate::logging::LoggingConfig;
use crate::vault::Secret;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub hub: HubConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub documents: DocumentsConfig,
    #[serde(default)]
    pub splitter: SplitterConfig,
    #[serde(skip)]
    pub secrets: ResolvedSecrets,
}

fn default_hub_endpoint() -> String {
    DEFAULT_HUB_ENDPOINT.into()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HubConfig {
    #[serde(default = "default_hub_endpoint")]
    pub endpoint: String,
    /// Model artifact cache; the hub client's own default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            endpoint: default_hub_endpoint(),
            cache_dir: None,
        }
    }
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.into()
}

fn default_max_sequence_length() -> usize {
    DEFAULT_MAX_SEQUENCE_LENGTH
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default)]
    pub device: DeviceKind,
    #[serde(default = "default_max_sequence_length")]
    pub max_sequence_length: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            device: DeviceKind::default(),
            max_sequence_length: default_max_sequence_length(),
        }
    }
}

fn default_resume_directory() -> PathBuf {
    PathBuf::from("data/resumes")
}

fn default_glob() -> String {
    "*.pdf".into()
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DocumentsConfig {
    #[serde(default = "default_resume_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_glob")]
    pub glob: String,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Skip unreadable PDFs with a warning instead of failing the whole load.
    #[serde(default)]
    pub silent_errors: bool,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            directory: default_resume_directory(),
            glob: default_glob(),
            max_file_size: default_max_file_size(),
            silent_errors: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct ResolvedSecrets {
    pub hf_token: Option<Secret>,
}
