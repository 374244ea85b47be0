pub mod embed;

use std::fmt;
use std::path::PathBuf;

pub use candle_core::Device;

pub use self::embed::EmbedModel;
use crate::embedding::{DEFAULT_MAX_SEQUENCE_LENGTH, DeviceKind, EmbeddingProvider};
use crate::error::LlmError;
use crate::hub::DEFAULT_HUB_ENDPOINT;

/// Where model artifacts are fetched from and cached.
#[derive(Clone)]
pub struct HubOptions {
    pub endpoint: String,
    pub cache_dir: Option<PathBuf>,
    pub token: Option<String>,
}

impl Default for HubOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_HUB_ENDPOINT.to_owned(),
            cache_dir: None,
            token: None,
        }
    }
}

impl fmt::Debug for HubOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubOptions")
            .field("endpoint", &self.endpoint)
            .field("cache_dir", &self.cache_dir)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HubOptions {
    pub(crate) fn api(&self) -> Result<hf_hub::api::sync::Api, LlmError> {
        let mut builder = hf_hub::api::sync::ApiBuilder::new()
            .with_endpoint(self.endpoint.clone())
            .with_progress(false);
        if let Some(dir) = &self.cache_dir {
            builder = builder.with_cache_dir(dir.clone());
        }
        if let Some(token) = &self.token {
            builder = builder.with_token(Some(token.clone()));
        }
        builder.build().map_err(|e| {
            LlmError::ModelLoad(format!("failed to create HuggingFace API client: {e}"))
        })
    }
}

/// Sentence-embedding backend running BERT-family models through candle.
#[derive(Clone)]
pub struct CandleEmbeddingProvider {
    device: Device,
    hub: HubOptions,
    max_sequence_length: usize,
}

impl fmt::Debug for CandleEmbeddingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandleEmbeddingProvider")
            .field("device", &self.device_name())
            .field("hub", &self.hub)
            .field("max_sequence_length", &self.max_sequence_length)
            .finish()
    }
}

impl CandleEmbeddingProvider {
    /// # Errors
    ///
    /// Returns an error if the requested accelerator is unavailable.
    pub fn new(device: DeviceKind) -> Result<Self, LlmError> {
        let device = match device {
            DeviceKind::Cpu => Device::Cpu,
            DeviceKind::Cuda => Device::new_cuda(0)?,
            DeviceKind::Metal => Device::new_metal(0)?,
        };
        Ok(Self {
            device,
            hub: HubOptions::default(),
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
        })
    }

    #[must_use]
    pub fn with_hub(mut self, hub: HubOptions) -> Self {
        self.hub = hub;
        self
    }

    #[must_use]
    pub fn with_max_sequence_length(mut self, max_sequence_length: usize) -> Self {
        self.max_sequence_length = max_sequence_length;
        self
    }

    #[must_use]
    pub fn device_name(&self) -> &'static str {
        match &self.device {
            Device::Cpu => "cpu",
            Device::Cuda(_) => "cuda",
            Device::Metal(_) => "metal",
        }
    }
}

impl EmbeddingProvider for CandleEmbeddingProvider {
    type Model = EmbedModel;

    fn load(&self, model_name: &str) -> Result<EmbedModel, LlmError> {
        EmbedModel::load(model_name, &self.device, &self.hub, self.max_sequence_length)
    }

    fn name(&self) -> &'static str {
        "candle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_provider_reports_device() {
        let provider = CandleEmbeddingProvider::new(DeviceKind::Cpu).unwrap();
        assert_eq!(provider.device_name(), "cpu");
        assert_eq!(provider.name(), "candle");
    }

    #[test]
    fn hub_options_debug_redacts_token() {
        let hub = HubOptions {
            token: Some("hf_secret_value".into()),
            ..HubOptions::default()
        };
        let debug = format!("{hub:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hf_secret_value"));
    }

    #[test]
    fn unreachable_hub_fails_model_load() {
        let cache = tempfile::tempdir().unwrap();
        let provider = CandleEmbeddingProvider::new(DeviceKind::Cpu)
            .unwrap()
            .with_hub(HubOptions {
                endpoint: "http://127.0.0.1:1".into(),
                cache_dir: Some(cache.path().to_path_buf()),
                token: None,
            });
        let err = provider
            .load("sentence-transformers/all-MiniLM-L6-v2")
            .unwrap_err();
        assert!(matches!(err, LlmError::ModelLoad(_)), "got {err:?}");
    }
}
