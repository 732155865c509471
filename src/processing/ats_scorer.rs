//! Weighted ATS fit score for one resume against one job description

use crate::config::ScoringConfig;
use crate::error::Result;
use crate::processing::embeddings::Embedder;
use crate::processing::formatting::{round2, FormattingAnalyzer, Readability, MIN_WORD_COUNT};
use crate::processing::normalizer::SkillNormalizer;
use crate::processing::records::{CandidateRecord, JobRecord, RecordKind};
use crate::processing::semantic_matcher::SemanticMatcher;
use crate::processing::soft_factors::{SoftFactorScorer, SoftSkillDetails};
use crate::processing::vocabulary::Vocabulary;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const SKILL_WEIGHT: f64 = 50.0;
pub const EXPERIENCE_WEIGHT: f64 = 25.0;
pub const FORMATTING_MAX: f64 = 10.0;
pub const MISSING_PENALTY_WEIGHT: f64 = 5.0;

const FORMATTING_BASE: f64 = 5.0;
const DENSE_TEXT_BONUS: f64 = 3.0;
const DENSE_TEXT_EASE: f64 = 50.0;
const LENGTH_BONUS: f64 = 2.0;

/// Every sub-score behind a final ATS score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(rename = "ATS Score")]
    pub score: f64,
    #[serde(rename = "Raw Score")]
    pub raw_score: f64,
    #[serde(rename = "Skill Match")]
    pub skill_match: f64,
    #[serde(rename = "Experience Match")]
    pub experience_match: f64,
    #[serde(rename = "Formatting & Readability")]
    pub formatting_readability: f64,
    #[serde(rename = "Soft Skills & Clarity")]
    pub soft_skills_clarity: f64,
    #[serde(rename = "Missing Penalty")]
    pub missing_penalty: f64,
    #[serde(rename = "Soft Skill Details")]
    pub soft_skill_details: SoftSkillDetails,
    #[serde(rename = "Formatting Issues")]
    pub formatting_issues: Vec<String>,
    #[serde(rename = "Readability")]
    pub readability: Readability,
    #[serde(rename = "Word Count")]
    pub word_count: usize,
    #[serde(rename = "Matched Skills")]
    pub matched_skills: Vec<String>,
    #[serde(rename = "Missing Skills")]
    pub missing_skills: Vec<String>,
    #[serde(rename = "Extra Skills")]
    pub extra_skills: Vec<String>,
}

/// `min(1, matched / required) * 50`; nothing required scores 0
pub fn skill_score(matched: usize, required: usize) -> f64 {
    if required == 0 {
        return 0.0;
    }
    (matched as f64 / required as f64).min(1.0) * SKILL_WEIGHT
}

pub fn experience_score(candidate_years: f64, required_years: f64) -> f64 {
    if required_years == 0.0 {
        EXPERIENCE_WEIGHT
    } else if candidate_years > required_years {
        (0.8 + (candidate_years - required_years) * 0.05).min(1.0) * EXPERIENCE_WEIGHT
    } else {
        (candidate_years / required_years) * EXPERIENCE_WEIGHT
    }
}

pub fn missing_penalty(missing: usize, required: usize) -> f64 {
    if required == 0 {
        return 0.0;
    }
    (missing as f64 / required as f64) * MISSING_PENALTY_WEIGHT
}

pub fn formatting_score(ease: f64, word_count: usize, issue_count: usize) -> f64 {
    let mut score = FORMATTING_BASE;
    if ease <= DENSE_TEXT_EASE {
        score += DENSE_TEXT_BONUS;
    }
    if word_count >= MIN_WORD_COUNT {
        score += LENGTH_BONUS;
    }
    if issue_count > 10 {
        score -= 5.0;
    } else if issue_count > 5 {
        score -= 2.5;
    }
    score
}

/// Round the raw sum for presentation, optionally clamped to [0, 100]
pub fn final_score(raw: f64, clamp: bool) -> f64 {
    let rounded = round2(raw);
    if clamp {
        rounded.clamp(0.0, 100.0)
    } else {
        rounded
    }
}

pub struct AtsScorer {
    normalizer: SkillNormalizer,
    matcher: SemanticMatcher,
    formatting: FormattingAnalyzer,
    soft_factors: SoftFactorScorer,
    clamp: bool,
}

impl AtsScorer {
    pub fn new(vocabulary: &Vocabulary, embedder: Arc<dyn Embedder>, config: &ScoringConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self::from_parts(
            SkillNormalizer::new(vocabulary.aliases.clone(), config.fuzzy_cutoff),
            SemanticMatcher::new(embedder, config.semantic_threshold),
            FormattingAnalyzer::new(),
            SoftFactorScorer::new(&vocabulary.lists, config.soft_factor_divisor, config.floor_impact_score)?,
            config.clamp_final_score,
        ))
    }

    pub fn from_parts(
        normalizer: SkillNormalizer,
        matcher: SemanticMatcher,
        formatting: FormattingAnalyzer,
        soft_factors: SoftFactorScorer,
        clamp: bool,
    ) -> Self {
        Self {
            normalizer,
            matcher,
            formatting,
            soft_factors,
            clamp,
        }
    }

    /// Score a resume against a job description.
    ///
    /// Both records are validated before any matching work starts; a call
    /// either returns the complete breakdown or an error.
    pub fn score(&self, resume: &CandidateRecord, jd: &JobRecord, text: &str) -> Result<(f64, ScoreBreakdown)> {
        let resume_skills = resume.tech_stack(RecordKind::Candidate)?;
        let candidate_years = resume.years_of_experience(RecordKind::Candidate)?;
        let jd_skills = jd.tech_stack(RecordKind::Job)?;
        let required_years = jd.years_of_experience(RecordKind::Job)?;

        let resume_skills = self.normalizer.normalize(&resume_skills);
        let jd_skills = self.normalizer.normalize(&jd_skills);
        debug!("Normalized resume skills: {:?}", resume_skills);
        debug!("Normalized job skills: {:?}", jd_skills);

        let skills = self.matcher.match_skills(&resume_skills, &jd_skills)?;
        let required = jd_skills.len();

        let skill = skill_score(skills.matched.len(), required);
        let experience = experience_score(candidate_years, required_years);
        let penalty = missing_penalty(skills.missing.len(), required);

        let issues = self.formatting.analyze_formatting(text);
        let readability = self.formatting.readability(text);
        let word_count = self.formatting.word_count(text);
        let formatting = formatting_score(readability.ease, word_count, issues.len());

        let soft = self.soft_factors.score(text);

        let raw = skill + experience + formatting - penalty + soft.total;
        let score = final_score(raw, self.clamp);

        info!(
            "ATS score {:.2} (skills {:.2}, experience {:.2}, formatting {:.2}, soft {:.2}, penalty {:.2})",
            score, skill, experience, formatting, soft.total, penalty
        );

        let breakdown = ScoreBreakdown {
            score,
            raw_score: round2(raw),
            skill_match: round2(skill),
            experience_match: round2(experience),
            formatting_readability: round2(formatting),
            soft_skills_clarity: round2(soft.total),
            missing_penalty: round2(penalty),
            soft_skill_details: soft.details,
            formatting_issues: issues,
            readability,
            word_count,
            matched_skills: skills.matched,
            missing_skills: skills.missing,
            extra_skills: skills.extra,
        };

        Ok((score, breakdown))
    }
}
