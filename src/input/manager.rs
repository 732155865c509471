//! Input manager for handling different file types

use crate::error::{AtsError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct InputManager {
    cache: HashMap<PathBuf, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(path) {
                debug!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(AtsError::InvalidInput(format!("File does not exist: {}", path.display())));
        }

        let file_type = FileType::from_path(path)
            .ok_or_else(|| AtsError::InvalidInput(format!("File has no extension: {}", path.display())))?;

        let text = match file_type {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Json | FileType::Unknown => {
                return Err(AtsError::UnsupportedFormat(format!(
                    "Cannot extract text from: {}",
                    path.display()
                )));
            }
        };

        if text.trim().is_empty() {
            return Err(AtsError::InvalidInput(format!("No text found in: {}", path.display())));
        }

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), text.clone());
        }

        Ok(text)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_caches_by_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "Education and experience").unwrap();

        let mut manager = InputManager::new();
        assert_eq!(manager.extract_text(&path).await.unwrap(), "Education and experience");
        assert_eq!(manager.cache_size(), 1);

        std::fs::write(&path, "changed").unwrap();
        assert_eq!(manager.extract_text(&path).await.unwrap(), "Education and experience");

        manager.clear_cache();
        assert_eq!(manager.extract_text(&path).await.unwrap(), "changed");
    }

    #[tokio::test]
    async fn test_cache_disabled() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("resume.md");
        std::fs::write(&path, "# Resume").unwrap();

        let mut manager = InputManager::new().with_cache(false);
        assert_eq!(manager.extract_text(&path).await.unwrap(), "Resume");
        assert_eq!(manager.cache_size(), 0);
    }

    #[tokio::test]
    async fn test_rejects_missing_unsupported_and_empty() {
        let dir = TempDir::new().unwrap();
        let mut manager = InputManager::new();

        let missing = dir.path().join("missing.txt");
        assert!(matches!(manager.extract_text(&missing).await, Err(AtsError::InvalidInput(_))));

        let docx = dir.path().join("resume.docx");
        std::fs::write(&docx, "binary").unwrap();
        assert!(matches!(manager.extract_text(&docx).await, Err(AtsError::UnsupportedFormat(_))));

        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, "  \n").unwrap();
        assert!(matches!(manager.extract_text(&empty).await, Err(AtsError::InvalidInput(_))));
    }
}
