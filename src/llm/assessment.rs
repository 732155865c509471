//! Technical interview questions and graded answers

use crate::config::LlmConfig;
use crate::error::{AtsError, Result};
use crate::llm::client::{GenerationOptions, TextGenerator};
use crate::llm::extraction::strip_code_fence;
use crate::llm::prompts::PromptTemplates;
use crate::processing::formatting::round2;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_QUESTION_COUNT: usize = 5;

/// Grade for one answer: an integer score in 0-100 plus short feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerGrade {
    pub score: u8,
    pub feedback: String,
}

fn review_options(config: &LlmConfig) -> GenerationOptions {
    GenerationOptions {
        model: config.review_model.clone(),
        temperature: None,
        max_tokens: Some(config.max_tokens),
    }
}

pub struct QuestionGenerator<G> {
    generator: G,
    templates: PromptTemplates,
    options: GenerationOptions,
}

impl<G: TextGenerator> QuestionGenerator<G> {
    pub fn new(generator: G, config: &LlmConfig) -> Self {
        Self {
            generator,
            templates: PromptTemplates::default(),
            options: review_options(config),
        }
    }

    /// Question `number` (1-based) about the given tech stack
    pub async fn question(&self, tech_stack: &str, number: usize) -> Result<String> {
        if tech_stack.trim().is_empty() {
            return Err(AtsError::InvalidInput("tech stack is empty".to_string()));
        }
        info!("Requesting technical question {}", number);
        let prompt = self.templates.render_technical_question(tech_stack, number);
        let question = self.generator.generate(&prompt, &self.options).await?;
        Ok(question.trim().to_string())
    }
}

pub struct AnswerGrader<G> {
    generator: G,
    templates: PromptTemplates,
    options: GenerationOptions,
}

impl<G: TextGenerator> AnswerGrader<G> {
    pub fn new(generator: G, config: &LlmConfig) -> Self {
        Self {
            generator,
            templates: PromptTemplates::default(),
            options: review_options(config),
        }
    }

    pub async fn grade(&self, question: &str, answer: &str) -> Result<AnswerGrade> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(AtsError::InvalidInput("answer is empty".to_string()));
        }
        let prompt = self.templates.render_answer_grading(question, answer);
        let reply = self.generator.generate(&prompt, &self.options).await?;
        parse_grade_reply(&reply)
    }
}

/// Parse `{"score": <int 0-100>, "feedback": "..."}`, retrying once without code fences
pub fn parse_grade_reply(reply: &str) -> Result<AnswerGrade> {
    let value = match serde_json::from_str::<Value>(reply) {
        Ok(value) => value,
        Err(first_error) => {
            warn!("Grade reply is not plain JSON ({}), stripping code fences", first_error);
            serde_json::from_str::<Value>(&strip_code_fence(reply))
                .map_err(|e| AtsError::MalformedGrade(format!("reply is not valid JSON: {}", e)))?
        }
    };

    let score = match value.get("score") {
        Some(Value::Number(n)) => n.as_u64().filter(|s| *s <= 100),
        Some(_) => None,
        None => return Err(AtsError::MalformedGrade("'score' is missing".to_string())),
    }
    .ok_or_else(|| AtsError::MalformedGrade(format!("'score' must be an integer in 0-100, got {}", value["score"])))?;

    let feedback = value
        .get("feedback")
        .and_then(Value::as_str)
        .ok_or_else(|| AtsError::MalformedGrade("'feedback' must be a string".to_string()))?;

    Ok(AnswerGrade {
        score: score as u8,
        feedback: feedback.trim().to_string(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentItem {
    pub question: String,
    pub answer: String,
    pub grade: AnswerGrade,
}

/// Questions, answers and grades from one assessment run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub tech_stack: String,
    pub items: Vec<AssessmentItem>,
}

impl AssessmentReport {
    pub fn new(tech_stack: &str) -> Self {
        Self {
            tech_stack: tech_stack.to_string(),
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, question: String, answer: String, grade: AnswerGrade) {
        self.items.push(AssessmentItem { question, answer, grade });
    }

    /// Mean score across graded answers, rounded to 2 decimals; `None` before any answer
    pub fn total_percentage(&self) -> Option<f64> {
        if self.items.is_empty() {
            return None;
        }
        let sum: u32 = self.items.iter().map(|item| u32::from(item.grade.score)).sum();
        Some(round2(f64::from(sum) / self.items.len() as f64))
    }
}
