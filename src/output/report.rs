//! Presentation data derived from a score breakdown

use crate::processing::ats_scorer::{ScoreBreakdown, EXPERIENCE_WEIGHT, FORMATTING_MAX, SKILL_WEIGHT};
use crate::processing::formatting::round2;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scale the soft-skills sub-score is shown against
pub const SOFT_SKILLS_DISPLAY_MAX: f64 = 15.0;

pub const STRONG_FIT_THRESHOLD: f64 = 70.0;
pub const PARTIAL_MATCH_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    StrongFit,
    PartialMatch,
    NeedsImprovement,
}

impl Verdict {
    pub fn from_score(score: f64) -> Self {
        if score >= STRONG_FIT_THRESHOLD {
            Verdict::StrongFit
        } else if score >= PARTIAL_MATCH_THRESHOLD {
            Verdict::PartialMatch
        } else {
            Verdict::NeedsImprovement
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::StrongFit => "Strong Fit",
            Verdict::PartialMatch => "Partial Match",
            Verdict::NeedsImprovement => "Needs Improvement",
        };
        write!(f, "{}", label)
    }
}

/// Each component as a percentage of its own maximum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentPercentages {
    pub skill_match: f64,
    pub experience_match: f64,
    pub formatting: f64,
    pub soft_skills: f64,
}

impl ComponentPercentages {
    pub fn from_breakdown(breakdown: &ScoreBreakdown) -> Self {
        Self {
            skill_match: percent(breakdown.skill_match, SKILL_WEIGHT),
            experience_match: percent(breakdown.experience_match, EXPERIENCE_WEIGHT),
            formatting: percent(breakdown.formatting_readability, FORMATTING_MAX),
            soft_skills: percent(breakdown.soft_skills_clarity, SOFT_SKILLS_DISPLAY_MAX),
        }
    }
}

fn percent(value: f64, max: f64) -> f64 {
    round2(value / max * 100.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub screener_version: String,
    pub embedding_model: String,
    pub resume_file: Option<String>,
    pub job_file: Option<String>,
    pub processing_time_ms: u64,
}

/// Everything a formatter needs to present one screening
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub score: f64,
    pub verdict: Verdict,
    pub percentages: ComponentPercentages,
    pub matched_count: usize,
    pub missing_count: usize,
    pub required_count: usize,
    pub breakdown: ScoreBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    pub metadata: ReportMetadata,
}

impl ScreeningReport {
    pub fn new(score: f64, breakdown: ScoreBreakdown, review: Option<String>, embedding_model: &str) -> Self {
        let matched_count = breakdown.matched_skills.len();
        let missing_count = breakdown.missing_skills.len();

        Self {
            score,
            verdict: Verdict::from_score(score),
            percentages: ComponentPercentages::from_breakdown(&breakdown),
            matched_count,
            missing_count,
            required_count: matched_count + missing_count,
            breakdown,
            review,
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                screener_version: env!("CARGO_PKG_VERSION").to_string(),
                embedding_model: embedding_model.to_string(),
                resume_file: None,
                job_file: None,
                processing_time_ms: 0,
            },
        }
    }

    pub fn with_sources(mut self, resume_file: Option<String>, job_file: Option<String>) -> Self {
        self.metadata.resume_file = resume_file;
        self.metadata.job_file = job_file;
        self
    }

    pub fn with_processing_time(mut self, millis: u64) -> Self {
        self.metadata.processing_time_ms = millis;
        self
    }
}
