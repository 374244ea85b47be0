use std::path::Path;
use std::sync::Arc;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::{Tokenizer, TruncationParams};

use super::HubOptions;
use crate::embedding::{EMBEDDING_DIMENSION, Embedder};
use crate::error::LlmError;

#[derive(Clone)]
pub struct EmbedModel {
    model_id: String,
    model: Arc<BertModel>,
    tokenizer: Arc<Tokenizer>,
    device: Device,
}

impl std::fmt::Debug for EmbedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedModel")
            .field("model_id", &self.model_id)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl EmbedModel {
    /// Load a BERT sentence-embedding model from the hub.
    ///
    /// Artifacts land in the hf-hub cache; later loads of the same repo reuse them.
    ///
    /// # Errors
    ///
    /// Returns an error if model download or loading fails.
    pub fn load(
        repo_id: &str,
        device: &Device,
        hub: &HubOptions,
        max_sequence_length: usize,
    ) -> Result<Self, LlmError> {
        let api = hub.api()?;
        let repo = api.model(repo_id.to_owned());

        let fetch = |file: &str| {
            repo.get(file).map_err(|e| {
                LlmError::ModelLoad(format!("failed to download {file} from {repo_id}: {e}"))
            })
        };
        let config_path = fetch("config.json")?;
        let tokenizer_path = fetch("tokenizer.json")?;
        let weights_path = fetch("model.safetensors")?;

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| LlmError::ModelLoad(format!("failed to read BERT config: {e}")))?;
        let config: BertConfig = serde_json::from_str(&config_str)?;
        if let Some(width) = hidden_size(&config_str)
            && width != EMBEDDING_DIMENSION
        {
            tracing::debug!(repo_id, width, "model width differs from default dimension");
        }

        let tokenizer = load_tokenizer(&tokenizer_path, max_sequence_length)?;

        // SAFETY: file is a valid safetensors downloaded from hf-hub, not modified during
        // VarBuilder lifetime
        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        let model = BertModel::load(vb, &config)?;

        Ok(Self {
            model_id: repo_id.to_owned(),
            model: Arc::new(model),
            tokenizer: Arc::new(tokenizer),
            device: device.clone(),
        })
    }

    /// Generate a mean-pooled, L2-normalised embedding for the given text.
    ///
    /// # Errors
    ///
    /// Returns an error if tokenization or the model forward pass fails.
    pub fn embed_sync(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| LlmError::Inference(format!("tokenizer encode failed: {e}")))?;

        let token_ids = encoding.get_ids();
        let token_type_ids: Vec<u32> = vec![0; token_ids.len()];

        let input_ids = Tensor::new(token_ids, &self.device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(token_type_ids.as_slice(), &self.device)?.unsqueeze(0)?;

        let embeddings = self.model.forward(&input_ids, &token_type_ids, None)?;

        // Mean pooling over sequence dimension
        let seq_len = embeddings.dim(1)?;
        let sum = embeddings.sum(1)?;
        let mean_pooled = (sum
            / f64::from(
                u32::try_from(seq_len)
                    .map_err(|e| LlmError::Inference(format!("sequence length overflow: {e}")))?,
            ))?;

        let norm = mean_pooled.sqr()?.sum_keepdim(1)?.sqrt()?;
        let normalized = mean_pooled.broadcast_div(&norm)?.squeeze(0)?;

        normalized.to_vec1::<f32>().map_err(LlmError::Candle)
    }
}

impl Embedder for EmbedModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn embed_query(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        self.embed_sync(text)
    }
}

fn load_tokenizer(path: &Path, max_sequence_length: usize) -> Result<Tokenizer, LlmError> {
    let mut tokenizer = Tokenizer::from_file(path)
        .map_err(|e| LlmError::ModelLoad(format!("failed to load tokenizer: {e}")))?;
    tokenizer.with_padding(None);
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_sequence_length,
            ..TruncationParams::default()
        }))
        .map_err(|e| LlmError::ModelLoad(format!("invalid truncation settings: {e}")))?;
    Ok(tokenizer)
}

fn hidden_size(config_json: &str) -> Option<usize> {
    let value: serde_json::Value = serde_json::from_str(config_json).ok()?;
    value
        .get("hidden_size")?
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
}
