//! Structured profile extraction from free text

use crate::config::LlmConfig;
use crate::error::{AtsError, Result};
use crate::llm::client::{GenerationOptions, TextGenerator};
use crate::llm::prompts::PromptTemplates;
use crate::processing::records::{ProfileRecord, RecordKind};
use log::{info, warn};
use serde_json::Value;

/// Turns resume or job-description text into a [`ProfileRecord`] via a language model
pub struct ProfileExtractor<G> {
    generator: G,
    templates: PromptTemplates,
    options: GenerationOptions,
}

impl<G: TextGenerator> ProfileExtractor<G> {
    pub fn new(generator: G, config: &LlmConfig) -> Self {
        Self {
            generator,
            templates: PromptTemplates::default(),
            options: GenerationOptions {
                model: config.extraction_model.clone(),
                temperature: Some(config.temperature),
                max_tokens: None,
            },
        }
    }

    pub async fn extract_candidate(&self, resume_text: &str) -> Result<ProfileRecord> {
        info!("Extracting candidate profile");
        let prompt = self.templates.render_candidate_extraction(resume_text);
        let reply = self.generator.generate(&prompt, &self.options).await?;
        parse_record_reply(&reply, RecordKind::Candidate)
    }

    pub async fn extract_job(&self, job_text: &str) -> Result<ProfileRecord> {
        info!("Extracting job requirements");
        let prompt = self.templates.render_job_extraction(job_text);
        let reply = self.generator.generate(&prompt, &self.options).await?;
        parse_record_reply(&reply, RecordKind::Job)
    }
}

/// Parse a model reply as a JSON object, retrying once without code fences
pub fn parse_record_reply(reply: &str, kind: RecordKind) -> Result<ProfileRecord> {
    let value = match serde_json::from_str::<Value>(reply) {
        Ok(value) => value,
        Err(first_error) => {
            warn!("{} reply is not plain JSON ({}), stripping code fences", kind, first_error);
            serde_json::from_str::<Value>(&strip_code_fence(reply)).map_err(|e| {
                AtsError::malformed(kind, "response", format!("is not valid JSON: {}", e))
            })?
        }
    };

    if !value.is_object() {
        return Err(AtsError::malformed(kind, "response", "is not a JSON object"));
    }
    ProfileRecord::from_value(value, kind)
}

pub(crate) fn strip_code_fence(reply: &str) -> String {
    reply
        .trim_matches(|c: char| c == '`' || c.is_whitespace())
        .replacen("json\n", "", 1)
}
