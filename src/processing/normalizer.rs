//! Skill name canonicalization

use crate::processing::similarity::{StringSimilarity, WeightedRatio};
use crate::processing::vocabulary::AliasTable;
use log::debug;
use std::collections::HashSet;
use std::sync::Arc;

/// Maps raw skill tokens onto canonical names from the alias table.
///
/// Exact (case-insensitive) alias hits win; otherwise the closest alias is
/// accepted only when its fuzzy score is strictly above `cutoff`, and the skill
/// is kept verbatim when nothing is close enough.
pub struct SkillNormalizer {
    aliases: Arc<AliasTable>,
    similarity: Box<dyn StringSimilarity>,
    cutoff: f64,
}

impl SkillNormalizer {
    pub fn new(aliases: Arc<AliasTable>, cutoff: f64) -> Self {
        Self::with_similarity(aliases, Box::new(WeightedRatio), cutoff)
    }

    pub fn with_similarity(
        aliases: Arc<AliasTable>,
        similarity: Box<dyn StringSimilarity>,
        cutoff: f64,
    ) -> Self {
        Self {
            aliases,
            similarity,
            cutoff,
        }
    }

    /// Canonicalize and deduplicate, keeping first-occurrence order
    pub fn normalize<S: AsRef<str>>(&self, skills: &[S]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(skills.len());

        for skill in skills {
            let canonical = self.normalize_one(skill.as_ref());
            if seen.insert(canonical.clone()) {
                normalized.push(canonical);
            }
        }

        normalized
    }

    pub fn normalize_one(&self, skill: &str) -> String {
        let key = skill.trim().to_lowercase();

        if let Some(canonical) = self.aliases.canonical_for(&key) {
            return canonical.to_string();
        }

        match self.similarity.best_match(&key, self.aliases.alias_keys()) {
            Some((index, score)) if score > self.cutoff => {
                let canonical = self.aliases.canonical_of_alias(index).unwrap_or(skill);
                debug!("Fuzzy-matched skill '{}' to '{}' ({:.1})", skill, canonical, score);
                canonical.to_string()
            }
            _ => skill.to_string(),
        }
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }
}
