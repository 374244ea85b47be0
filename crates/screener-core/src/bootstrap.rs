//! Turning a loaded [`Config`] into ready-to-use pipeline components.

use std::path::PathBuf;

use screener_documents::{Document, DocumentError, SplitterConfig, split_docs_with};
use screener_llm::{EmbeddingProvider, HubAuth, HubClient, HubIdentity, LlmError, get_embeddings};

use crate::auth::{AuthError, authenticate};
use crate::config::Config;
use crate::logging::LoggingError;
use crate::vault::{EnvVaultProvider, MapVaultProvider, Secret, VaultProvider};

#[cfg(feature = "candle")]
use screener_llm::candle_provider::{CandleEmbeddingProvider, HubOptions};
#[cfg(feature = "pdf")]
use screener_documents::{DirectoryLoader, DirectoryLoaderConfig, PdfLoader};

/// Priority: `SCREENER_CONFIG` env > `config/default.toml`.
#[must_use]
pub fn resolve_config_path() -> PathBuf {
    std::env::var("SCREENER_CONFIG")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map_or_else(|| PathBuf::from("config/default.toml"), PathBuf::from)
}

/// Load the config at [`resolve_config_path`] and resolve secrets from `vault`.
///
/// # Errors
///
/// Returns an error if the config file is unreadable, malformed or invalid.
pub fn load_config(vault: &dyn VaultProvider) -> anyhow::Result<Config> {
    let mut config = Config::load(&resolve_config_path())?;
    config.resolve_secrets(vault);
    Ok(config)
}

/// [`load_config`] with the process environment as the vault.
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_from_env() -> anyhow::Result<Config> {
    load_config(&EnvVaultProvider)
}

impl Config {
    /// Install the `[logging]` subscriber globally.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or logging is already initialized.
    pub fn init_logging(&self) -> Result<(), LoggingError> {
        self.logging.init()
    }

    #[must_use]
    pub fn splitter_config(&self) -> SplitterConfig {
        self.splitter.clone()
    }

    #[cfg(feature = "pdf")]
    #[must_use]
    pub fn directory_loader(&self) -> DirectoryLoader<PdfLoader> {
        DirectoryLoader::new(PdfLoader {
            max_file_size: self.documents.max_file_size,
        })
        .with_config(DirectoryLoaderConfig {
            glob: self.documents.glob.clone(),
            silent_errors: self.documents.silent_errors,
        })
    }

    /// Load every resume under `[documents].directory`.
    ///
    /// # Errors
    ///
    /// See [`DirectoryLoader::load`].
    #[cfg(feature = "pdf")]
    pub fn load_documents(&self) -> Result<Vec<Document>, DocumentError> {
        self.directory_loader().load(&self.documents.directory)
    }

    /// Chunk `documents` with the `[splitter]` settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the splitter settings are invalid.
    pub fn split_documents(&self, documents: &[Document]) -> Result<Vec<Document>, DocumentError> {
        split_docs_with(documents, self.splitter_config())
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn hub_client(&self) -> Result<HubClient, LlmError> {
        HubClient::new(&self.hub.endpoint)
    }

    /// Log in with the token resolved by [`Config::resolve_secrets`].
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingToken`] if no token was resolved, or the client's error.
    pub fn authenticate_with<C>(&self, client: &C) -> Result<HubIdentity, AuthError>
    where
        C: HubAuth + ?Sized,
    {
        let token = self.secrets.hf_token.as_ref().map(Secret::expose);
        authenticate(token, &MapVaultProvider::new(), client)
    }

    /// Load the `[embedding].model` through `provider`.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the model cannot be loaded.
    pub fn embeddings<P>(&self, provider: &P) -> Result<P::Model, LlmError>
    where
        P: EmbeddingProvider + ?Sized,
    {
        get_embeddings(provider, Some(&self.embedding.model))
    }

    #[cfg(feature = "candle")]
    #[must_use]
    pub fn hub_options(&self) -> HubOptions {
        HubOptions {
            endpoint: self.hub.endpoint.clone(),
            cache_dir: self.hub.cache_dir.clone(),
            token: self
                .secrets
                .hf_token
                .as_ref()
                .map(|t| t.expose().to_owned()),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the configured device is unavailable.
    #[cfg(feature = "candle")]
    pub fn embedding_provider(&self) -> Result<CandleEmbeddingProvider, LlmError> {
        let provider = CandleEmbeddingProvider::new(self.embedding.device)?
            .with_hub(self.hub_options())
            .with_max_sequence_length(self.embedding.max_sequence_length);
        tracing::debug!(device = provider.device_name(), "embedding provider ready");
        Ok(provider)
    }
}
