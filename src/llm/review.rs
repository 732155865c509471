//! Narrative resume review

use crate::config::LlmConfig;
use crate::error::Result;
use crate::llm::client::{GenerationOptions, TextGenerator};
use crate::llm::prompts::PromptTemplates;
use crate::processing::records::CandidateRecord;
use log::info;

pub struct ReviewGenerator<G> {
    generator: G,
    templates: PromptTemplates,
    options: GenerationOptions,
}

impl<G: TextGenerator> ReviewGenerator<G> {
    pub fn new(generator: G, config: &LlmConfig) -> Self {
        Self {
            generator,
            templates: PromptTemplates::default(),
            options: GenerationOptions {
                model: config.review_model.clone(),
                temperature: None,
                max_tokens: Some(config.max_tokens),
            },
        }
    }

    /// Strengths, weaknesses and recommendations for the candidate against the job text
    pub async fn review(&self, candidate: &CandidateRecord, job_text: &str) -> Result<String> {
        info!("Requesting resume review from {}", self.options.model);
        let candidate_json = serde_json::to_string_pretty(candidate)?;
        let prompt = self.templates.render_resume_review(&candidate_json, job_text);
        let review = self.generator.generate(&prompt, &self.options).await?;
        Ok(review.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AtsError;
    use crate::processing::records::{ProfileRecord, TECH_STACK};
    use std::sync::Mutex;

    struct EchoGenerator {
        seen: Mutex<Option<(String, GenerationOptions)>>,
    }

    impl TextGenerator for EchoGenerator {
        async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
            *self.seen.lock().unwrap() = Some((prompt.to_string(), options.clone()));
            Ok("  ## Strengths\nRust\n".to_string())
        }
    }

    struct DownGenerator;

    impl TextGenerator for DownGenerator {
        async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String> {
            Err(AtsError::ExternalService("503".to_string()))
        }
    }

    #[tokio::test]
    async fn test_review_prompt_and_options() {
        let generator = EchoGenerator { seen: Mutex::new(None) };
        let reviewer = ReviewGenerator::new(generator, &LlmConfig::default());
        let candidate = ProfileRecord::new().with_field(TECH_STACK, "Rust");

        let review = reviewer.review(&candidate, "Rust backend role").await.unwrap();
        assert_eq!(review, "## Strengths\nRust");

        let seen = reviewer.generator.seen.lock().unwrap();
        let (prompt, options) = seen.as_ref().unwrap();
        assert!(prompt.contains("\"Tech Stack\": \"Rust\""));
        assert!(prompt.contains("Rust backend role"));
        assert_eq!(options.model, "llama-3.1-8b-instant");
        assert_eq!(options.max_tokens, Some(512));
    }

    #[tokio::test]
    async fn test_review_failure_propagates() {
        let reviewer = ReviewGenerator::new(DownGenerator, &LlmConfig::default());
        let result = reviewer.review(&ProfileRecord::new(), "job").await;
        assert!(matches!(result, Err(AtsError::ExternalService(_))));
    }
}
