//! Sentence embeddings for skill phrases using Model2Vec

use crate::config::Config;
use crate::error::{AtsError, Result};
use log::{debug, info};
use model2vec_rs::model::StaticModel;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

/// Turns texts into fixed-size vectors. One output vector per input text, in order.
pub trait Embedder: Send + Sync {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn model_name(&self) -> &str;
}

/// Model2Vec static embedding model with an in-memory cache keyed by text
pub struct Model2VecEmbedder {
    model: StaticModel,
    batch_size: usize,
    cache: Mutex<HashMap<String, Vec<f32>>>,
    model_name: String,
}

impl Model2VecEmbedder {
    /// Load from a local model folder or a HuggingFace repo id
    pub fn load(source: &str, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", source);

        let model = StaticModel::from_pretrained(source, None, None, None)
            .map_err(|e| AtsError::ModelError(format!("Failed to load embedding model '{}': {}", source, e)))?;

        info!("Embedding model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            batch_size: 256,
            cache: Mutex::new(HashMap::new()),
            model_name: model_name.to_string(),
        })
    }

    /// Load the model named in the configuration, preferring a downloaded copy
    pub fn from_config(config: &Config) -> Result<Self> {
        let (source, name) = resolve_model_source(config);
        Ok(Self::load(&source.to_string_lossy(), &name)?.with_batch_size(config.models.embedding_batch_size))
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn cache_size(&self) -> usize {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn clear_cache(&self) {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl Embedder for Model2VecEmbedder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());

        let mut uncached: Vec<String> = Vec::new();
        for text in texts {
            if !cache.contains_key(text) && !uncached.contains(text) {
                uncached.push(text.clone());
            }
        }
        debug!(
            "Encoding {} texts ({} cache hits)",
            texts.len(),
            texts.len() - uncached.len().min(texts.len())
        );

        for batch in uncached.chunks(self.batch_size) {
            let embeddings = self.model.encode(batch);
            if embeddings.len() != batch.len() {
                return Err(AtsError::ExternalService(format!(
                    "embedding model returned {} vectors for {} texts",
                    embeddings.len(),
                    batch.len()
                )));
            }
            for (text, embedding) in batch.iter().zip(embeddings) {
                cache.insert(text.clone(), embedding);
            }
        }

        texts
            .iter()
            .map(|text| {
                cache.get(text).cloned().ok_or_else(|| {
                    AtsError::ExternalService(format!("no embedding produced for '{}'", text))
                })
            })
            .collect()
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Where to load the configured embedding model from, and its display name.
///
/// A downloaded copy under `models_dir/<name>` wins; otherwise a known model is
/// fetched by repo id, and anything else is handed to the loader as given.
pub fn resolve_model_source(config: &Config) -> (PathBuf, String) {
    let requested = &config.models.embedding_model;

    match config.get_model(requested) {
        Some(model) => {
            let local = config.models_dir().join(&model.name);
            if local.join("tokenizer.json").exists() {
                (local, model.name.clone())
            } else {
                (PathBuf::from(&model.repo_id), model.name.clone())
            }
        }
        None => (PathBuf::from(requested), requested.clone()),
    }
}

/// Cosine similarity of two equal-length vectors; zero vectors score 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(AtsError::ExternalService(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    if a.is_empty() {
        return Ok(0.0);
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}
