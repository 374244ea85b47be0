use std::path::PathBuf;

use screener_llm::DeviceKind;

use super::Config;

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SCREENER_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Ok(v) = std::env::var("SCREENER_LOG_FILTER") {
            self.logging.filter = Some(v).filter(|f| !f.trim().is_empty());
        }
        if let Ok(v) = std::env::var("HF_ENDPOINT") {
            self.hub.endpoint = v;
        }
        if let Ok(v) = std::env::var("HF_HOME")
            && !v.trim().is_empty()
        {
            self.hub.cache_dir = Some(PathBuf::from(v).join("hub"));
        }
        if let Ok(v) = std::env::var("SCREENER_EMBEDDING_MODEL") {
            self.embedding.model = v;
        }
        if let Ok(v) = std::env::var("SCREENER_EMBEDDING_DEVICE") {
            if let Ok(device) = v.parse::<DeviceKind>() {
                self.embedding.device = device;
            } else {
                tracing::warn!("ignoring invalid SCREENER_EMBEDDING_DEVICE value: {v}");
            }
        }
        if let Ok(v) = std::env::var("SCREENER_RESUME_DIR") {
            self.documents.directory = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("SCREENER_CHUNK_SIZE") {
            if let Ok(size) = v.trim().parse::<usize>() {
                self.splitter.chunk_size = size;
            } else {
                tracing::warn!("ignoring invalid SCREENER_CHUNK_SIZE value: {v}");
            }
        }
        if let Ok(v) = std::env::var("SCREENER_CHUNK_OVERLAP") {
            if let Ok(overlap) = v.trim().parse::<usize>() {
                self.splitter.chunk_overlap = overlap;
            } else {
                tracing::warn!("ignoring invalid SCREENER_CHUNK_OVERLAP value: {v}");
            }
        }
    }
}
