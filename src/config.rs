//! Configuration management for the ATS screener

use crate::error::{AtsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Divisor applied to the summed soft-factor category scores.
pub const DEFAULT_SOFT_FACTOR_DIVISOR: f64 = 2.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    pub llm: LlmConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    /// Model name from `available_models`, a HuggingFace repo id, or a local path
    pub embedding_model: String,
    /// Texts per encode call when filling the embedding cache
    #[serde(default = "default_embedding_batch_size")]
    pub embedding_batch_size: usize,
    pub available_models: Vec<AvailableModel>,
}

fn default_embedding_batch_size() -> usize {
    256
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableModel {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub dimensions: u32,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Minimum cosine similarity for a job skill to count as matched
    pub semantic_threshold: f32,
    /// Fuzzy alias matches must score strictly above this (0-100)
    pub fuzzy_cutoff: f64,
    pub soft_factor_divisor: f64,
    pub clamp_final_score: bool,
    /// Clamp a negative "Impact vs Responsibility" score to 0; off passes it through
    pub floor_impact_score: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// JSON object of canonical skill -> aliases; built-in table when unset
    pub alias_table: Option<PathBuf>,
    /// JSON object holding the four phrase lists; built-in lists when unset
    pub vocabulary: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub extraction_model: String,
    pub review_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
    pub include_review: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            semantic_threshold: 0.6,
            fuzzy_cutoff: 80.0,
            soft_factor_divisor: DEFAULT_SOFT_FACTOR_DIVISOR,
            clamp_final_score: true,
            floor_impact_score: false,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.semantic_threshold) {
            return Err(AtsError::Configuration(format!(
                "semantic_threshold must be within [0, 1], got {}",
                self.semantic_threshold
            )));
        }
        if !(0.0..=100.0).contains(&self.fuzzy_cutoff) {
            return Err(AtsError::Configuration(format!(
                "fuzzy_cutoff must be within [0, 100], got {}",
                self.fuzzy_cutoff
            )));
        }
        if !(self.soft_factor_divisor > 0.0 && self.soft_factor_divisor.is_finite()) {
            return Err(AtsError::Configuration(format!(
                "soft_factor_divisor must be positive, got {}",
                self.soft_factor_divisor
            )));
        }
        Ok(())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key_env: "GROQ_API".to_string(),
            extraction_model: "moonshotai/kimi-k2-instruct-0905".to_string(),
            review_model: "llama-3.1-8b-instant".to_string(),
            temperature: 0.4,
            max_tokens: 512,
            timeout_secs: 60,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ats-screener")
            .join("models");

        Self {
            models: ModelConfig {
                models_dir,
                embedding_model: "potion-base-8M".to_string(),
                embedding_batch_size: default_embedding_batch_size(),
                available_models: vec![
                    AvailableModel {
                        name: "potion-base-8M".to_string(),
                        repo_id: "minishlab/potion-base-8M".to_string(),
                        size_mb: 33,
                        dimensions: 256,
                        description: "Compact Model2Vec embeddings, good default for short skill phrases".to_string(),
                    },
                    AvailableModel {
                        name: "m2v-base".to_string(),
                        repo_id: "minishlab/M2V_base_output".to_string(),
                        size_mb: 90,
                        dimensions: 256,
                        description: "Model2Vec base embeddings model".to_string(),
                    },
                    AvailableModel {
                        name: "m2v-large".to_string(),
                        repo_id: "minishlab/M2V_large_output".to_string(),
                        size_mb: 250,
                        dimensions: 512,
                        description: "Larger Model2Vec embeddings model".to_string(),
                    },
                ],
            },
            scoring: ScoringConfig::default(),
            vocabulary: VocabularyConfig::default(),
            llm: LlmConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
                include_review: true,
            },
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first use
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| AtsError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.scoring.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AtsError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("ats-screener")
            .join("config.toml")
    }

    pub fn models_dir(&self) -> &Path {
        &self.models.models_dir
    }

    /// Look a model up by its short name or its repo id
    pub fn get_model(&self, name_or_repo: &str) -> Option<&AvailableModel> {
        self.models
            .available_models
            .iter()
            .find(|m| m.name == name_or_repo || m.repo_id == name_or_repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_scoring_is_valid() {
        let config = Config::default();
        assert!(config.scoring.validate().is_ok());
        assert_eq!(config.scoring.soft_factor_divisor, DEFAULT_SOFT_FACTOR_DIVISOR);
        assert_eq!(config.scoring.semantic_threshold, 0.6);
        assert!(!config.scoring.floor_impact_score);
        assert_eq!(config.llm.api_key_env, "GROQ_API");
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let scoring = ScoringConfig {
            semantic_threshold: 1.5,
            ..ScoringConfig::default()
        };
        assert!(matches!(scoring.validate(), Err(AtsError::Configuration(_))));

        let scoring = ScoringConfig {
            soft_factor_divisor: 0.0,
            ..ScoringConfig::default()
        };
        assert!(scoring.validate().is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.scoring.fuzzy_cutoff = 85.0;
        config.output.format = OutputFormat::Markdown;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.scoring.fuzzy_cutoff, 85.0);
        assert_eq!(loaded.output.format, OutputFormat::Markdown);
        assert!(loaded.vocabulary.alias_table.is_none());
    }

    #[test]
    fn test_missing_batch_size_uses_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let rendered = toml::to_string_pretty(&Config::default()).unwrap();
        let trimmed: String = rendered
            .lines()
            .filter(|line| !line.starts_with("embedding_batch_size"))
            .map(|line| format!("{}\n", line))
            .collect();
        assert_ne!(rendered.len(), trimmed.len());
        std::fs::write(&path, trimmed).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.models.embedding_batch_size, 256);
    }

    #[test]
    fn test_get_model_by_name_or_repo() {
        let config = Config::default();
        assert!(config.get_model("potion-base-8M").is_some());
        assert!(config.get_model("minishlab/M2V_base_output").is_some());
        assert!(config.get_model("unknown").is_none());
    }
}
