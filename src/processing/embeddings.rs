//! Embedding provider interface and the Model2Vec-backed implementation

use crate::config::Config;
use crate::error::{Result, ResumeRankerError};
use log::info;
use model2vec_rs::model::StaticModel;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Narrow interface the scoring pipeline needs from an embedding model.
///
/// Implementations must be safe for concurrent read-only inference: the
/// pipeline never mutates the provider, and a single instance is expected to
/// be constructed at process start and shared across requests. Tests
/// substitute deterministic stubs.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text into a fixed-length vector.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts in one call. Returns one vector per input, in
    /// input order. Batching amortizes fixed model overhead; callers should
    /// prefer this over repeated `embed` calls.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Static-embedding model loaded once from disk.
pub struct Model2VecEmbedder {
    model: StaticModel,
    model_name: String,
}

impl Model2VecEmbedder {
    pub fn new(model_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .map_err(|e| ResumeRankerError::ModelLoading(format!("Failed to load model: {}", e)))?;

        info!("Embedding model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: model_name.to_string(),
        })
    }

    /// Load the default model named in the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let model_name = &config.models.default_embedding_model;
        let model_path = Self::resolve_model_path(config, model_name);
        Self::new(&model_path, model_name)
    }

    fn resolve_model_path(config: &Config, model_name: &str) -> PathBuf {
        let local_path = config.models_dir().join(model_name);
        if local_path.exists() {
            local_path
        } else {
            // Not present locally; treat the name as a HuggingFace repo id
            // and let the loader fetch it.
            PathBuf::from(model_name)
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl EmbeddingProvider for Model2VecEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.model.encode_single(text))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(self.model.encode(texts))
    }
}
