mod env;
mod types;


pub use types::*;

use std::path::Path;

use anyhow::Context;

use crate::auth::{HF_TOKEN_ENV, resolve_token};
use crate::vault::VaultProvider;

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or the merged result
    /// fails [`Config::validate`].
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error naming the first invalid setting.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.logging
            .env_filter()
            .context("invalid [logging] settings")?;
        self.splitter
            .validate()
            .context("invalid [splitter] settings")?;
        if self.hub.endpoint.trim().is_empty() {
            anyhow::bail!("hub.endpoint must not be empty");
        }
        if self.embedding.model.trim().is_empty() {
            anyhow::bail!("embedding.model must not be empty");
        }
        if self.embedding.max_sequence_length == 0 {
            anyhow::bail!("embedding.max_sequence_length must be greater than zero");
        }
        if self.documents.glob.trim().is_empty() {
            anyhow::bail!("documents.glob must not be empty");
        }
        Ok(())
    }

    /// Pull the hub token through the vault; blank values count as absent.
    pub fn resolve_secrets(&mut self, vault: &dyn VaultProvider) {
        self.secrets.hf_token = resolve_token(None, vault);
        if self.secrets.hf_token.is_none() {
            tracing::debug!("{HF_TOKEN_ENV} not set; hub requests will be anonymous");
        }
    }
}
