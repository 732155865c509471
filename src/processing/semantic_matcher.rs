//! Embedding-based matching of job requirements against resume skills

use crate::error::{AtsError, Result};
use crate::processing::embeddings::{cosine_similarity, Embedder};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of matching one resume skill set against one job skill set.
///
/// `matched` and `missing` partition the job skills; `extra` holds resume
/// skills that do not appear verbatim in `matched`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub extra: Vec<String>,
}

pub struct SemanticMatcher {
    embedder: Arc<dyn Embedder>,
    threshold: f32,
}

impl SemanticMatcher {
    pub fn new(embedder: Arc<dyn Embedder>, threshold: f32) -> Self {
        Self { embedder, threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn match_skills(&self, resume: &[String], jd: &[String]) -> Result<SkillMatch> {
        if jd.is_empty() {
            return Ok(SkillMatch {
                extra: resume.to_vec(),
                ..SkillMatch::default()
            });
        }
        if resume.is_empty() {
            return Ok(SkillMatch {
                missing: jd.to_vec(),
                ..SkillMatch::default()
            });
        }

        let scores = self.similarity_matrix(resume, jd)?;

        let mut result = SkillMatch::default();
        for (jd_skill, row) in jd.iter().zip(&scores) {
            let best = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            debug!("Best similarity for '{}': {:.3}", jd_skill, best);
            if best >= self.threshold {
                result.matched.push(jd_skill.clone());
            } else {
                result.missing.push(jd_skill.clone());
            }
        }

        result.extra = resume
            .iter()
            .filter(|skill| !result.matched.contains(skill))
            .cloned()
            .collect();

        Ok(result)
    }

    /// Cosine similarity of every job skill (rows) against every resume skill (columns)
    pub fn similarity_matrix(&self, resume: &[String], jd: &[String]) -> Result<Vec<Vec<f32>>> {
        let texts: Vec<String> = resume.iter().chain(jd).cloned().collect();
        let embeddings = self.embedder.encode(&texts)?;
        if embeddings.len() != texts.len() {
            return Err(AtsError::ExternalService(format!(
                "{} returned {} embeddings for {} skills",
                self.embedder.model_name(),
                embeddings.len(),
                texts.len()
            )));
        }

        let (resume_vecs, jd_vecs) = embeddings.split_at(resume.len());
        jd_vecs
            .iter()
            .map(|jd_vec| {
                resume_vecs
                    .iter()
                    .map(|resume_vec| cosine_similarity(jd_vec, resume_vec))
                    .collect()
            })
            .collect()
    }
}
