//! Download and discovery of Model2Vec embedding models

use crate::config::{AvailableModel, Config};
use crate::error::{AtsError, Result};
use hf_hub::api::tokio::Api;
use log::{info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files fetched for a model; only the tokenizer and weights are required
const MODEL_FILES: [(&str, bool); 4] = [
    ("model.safetensors", true),
    ("tokenizer.json", true),
    ("config.json", false),
    ("README.md", false),
];

/// Tracks which configured embedding models are present under `models_dir`
pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: Vec<AvailableModel>,
    downloaded_models: HashSet<String>,
}

impl EmbeddingModelManager {
    pub async fn new(config: &Config) -> Result<Self> {
        let models_dir = config.models_dir().to_path_buf();
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                AtsError::ModelError(format!("Failed to create models directory: {}", e))
            })?;
        }

        let mut manager = Self {
            models_dir,
            available_models: config.models.available_models.clone(),
            downloaded_models: HashSet::new(),
        };
        manager.scan_downloaded_models().await?;

        Ok(manager)
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await.map_err(|e| {
            AtsError::ModelError(format!("Failed to scan models directory: {}", e))
        })?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() && is_model_directory(&entry.path()).await {
                self.downloaded_models
                    .insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(())
    }

    /// Fetch a model from the HuggingFace Hub into `models_dir/<name>`
    pub async fn download_model(&mut self, name_or_repo: &str) -> Result<PathBuf> {
        let model = self
            .get_model_info(name_or_repo)
            .cloned()
            .ok_or_else(|| AtsError::ModelError(format!("Unknown embedding model: {}", name_or_repo)))?;

        let model_dir = self.models_dir.join(&model.name);
        if self.downloaded_models.contains(&model.name) {
            return Ok(model_dir);
        }

        info!("Downloading embedding model {} ({} MB) from {}", model.name, model.size_mb, model.repo_id);
        fs::create_dir_all(&model_dir).await?;

        let api = Api::new()
            .map_err(|e| AtsError::ModelError(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.model(model.repo_id.clone());

        for (file, required) in MODEL_FILES {
            match repo.get(file).await {
                Ok(cached) => {
                    fs::copy(&cached, model_dir.join(file)).await.map_err(|e| {
                        AtsError::ModelError(format!("Failed to copy {}: {}", file, e))
                    })?;
                    info!("Downloaded {}", file);
                }
                Err(e) if !required => warn!("Optional file {} not found: {}", file, e),
                Err(e) => {
                    return Err(AtsError::ModelError(format!(
                        "Failed to download required file {}: {}",
                        file, e
                    )))
                }
            }
        }

        self.downloaded_models.insert(model.name.clone());
        Ok(model_dir)
    }

    pub fn get_model_path(&self, name: &str) -> Option<PathBuf> {
        self.downloaded_models
            .contains(name)
            .then(|| self.models_dir.join(name))
    }

    pub fn list_available_models(&self) -> &[AvailableModel] {
        &self.available_models
    }

    pub fn list_downloaded_models(&self) -> Vec<String> {
        let mut names: Vec<String> = self.downloaded_models.iter().cloned().collect();
        names.sort();
        names
    }

    pub fn get_model_info(&self, name_or_repo: &str) -> Option<&AvailableModel> {
        self.available_models
            .iter()
            .find(|m| m.name == name_or_repo || m.repo_id == name_or_repo)
    }

    pub fn is_model_downloaded(&self, name: &str) -> bool {
        self.downloaded_models.contains(name)
    }
}

async fn is_model_directory(path: &Path) -> bool {
    fs::metadata(path.join("tokenizer.json")).await.is_ok()
        && fs::metadata(path.join("model.safetensors")).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::default();
        config.models.models_dir = dir.join("models");
        config
    }

    #[tokio::test]
    async fn test_manager_creates_models_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(temp_dir.path());
        let manager = EmbeddingModelManager::new(&config).await.unwrap();

        assert!(config.models_dir().exists());
        assert_eq!(manager.list_available_models().len(), 3);
        assert!(manager.list_downloaded_models().is_empty());
    }

    #[tokio::test]
    async fn test_scan_finds_complete_model_dirs_only() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(temp_dir.path());

        let complete = config.models_dir().join("potion-base-8M");
        std::fs::create_dir_all(&complete).unwrap();
        std::fs::write(complete.join("tokenizer.json"), "{}").unwrap();
        std::fs::write(complete.join("model.safetensors"), "").unwrap();

        let partial = config.models_dir().join("m2v-base");
        std::fs::create_dir_all(&partial).unwrap();
        std::fs::write(partial.join("tokenizer.json"), "{}").unwrap();

        let manager = EmbeddingModelManager::new(&config).await.unwrap();
        assert!(manager.is_model_downloaded("potion-base-8M"));
        assert!(!manager.is_model_downloaded("m2v-base"));
        assert_eq!(manager.get_model_path("potion-base-8M"), Some(complete));
    }

    #[tokio::test]
    async fn test_unknown_model_download_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(temp_dir.path());
        let mut manager = EmbeddingModelManager::new(&config).await.unwrap();

        let result = manager.download_model("no-such-model").await;
        assert!(matches!(result, Err(AtsError::ModelError(_))));
    }

    #[tokio::test]
    async fn test_lookup_by_repo_id() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(&config_in(temp_dir.path())).await.unwrap();
        let info = manager.get_model_info("minishlab/potion-base-8M").unwrap();
        assert_eq!(info.name, "potion-base-8M");
    }
}
