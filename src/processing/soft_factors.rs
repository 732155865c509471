//! Writing-quality scoring: clarity, impact and soft-skill mentions

use crate::error::{AtsError, Result};
use crate::processing::formatting::round2;
use crate::processing::vocabulary::VocabularyLists;
use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};

/// Counts occurrences of a fixed phrase list in one pass over the text.
///
/// Each phrase is counted on its own, non-overlapping and left to right, so
/// "led" inside "tackled" counts and two phrases may share characters.
pub struct PhraseCounter {
    automaton: AhoCorasick,
    /// How many times each unique phrase appears in the source list
    weights: Vec<usize>,
}

impl PhraseCounter {
    pub fn new(phrases: &[String]) -> Result<Self> {
        let mut unique: Vec<&str> = Vec::with_capacity(phrases.len());
        let mut weights: Vec<usize> = Vec::with_capacity(phrases.len());
        for phrase in phrases {
            match unique.iter().position(|p| *p == phrase.as_str()) {
                Some(index) => weights[index] += 1,
                None => {
                    unique.push(phrase.as_str());
                    weights.push(1);
                }
            }
        }

        let automaton = AhoCorasick::new(&unique)
            .map_err(|e| AtsError::Vocabulary(format!("failed to compile phrase list: {}", e)))?;

        Ok(Self { automaton, weights })
    }

    /// Total hits of every phrase in `text`, which must already be lowercase
    pub fn count(&self, text: &str) -> usize {
        let mut last_end = vec![0usize; self.weights.len()];
        let mut total = 0;

        for found in self.automaton.find_overlapping_iter(text) {
            let pattern = found.pattern().as_usize();
            if found.start() >= last_end[pattern] {
                last_end[pattern] = found.end();
                total += self.weights[pattern];
            }
        }

        total
    }
}

/// Category scores behind the soft-factor total
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoftSkillDetails {
    #[serde(rename = "Clarity")]
    pub clarity: f64,
    #[serde(rename = "Impact vs Responsibility")]
    pub impact: f64,
    #[serde(rename = "Soft Skills")]
    pub soft_skills: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftFactors {
    pub total: f64,
    pub details: SoftSkillDetails,
}

pub struct SoftFactorScorer {
    action_verbs: PhraseCounter,
    impact_words: PhraseCounter,
    responsible_words: PhraseCounter,
    soft_skills: PhraseCounter,
    divisor: f64,
    floor_impact: bool,
}

impl SoftFactorScorer {
    pub fn new(lists: &VocabularyLists, divisor: f64, floor_impact: bool) -> Result<Self> {
        if !(divisor > 0.0 && divisor.is_finite()) {
            return Err(AtsError::Configuration(format!(
                "soft factor divisor must be positive, got {}",
                divisor
            )));
        }

        Ok(Self {
            action_verbs: PhraseCounter::new(&lists.action_verbs)?,
            impact_words: PhraseCounter::new(&lists.impact_words)?,
            responsible_words: PhraseCounter::new(&lists.responsible_words)?,
            soft_skills: PhraseCounter::new(&lists.soft_skills)?,
            divisor,
            floor_impact,
        })
    }

    pub fn score(&self, text: &str) -> SoftFactors {
        let lower = text.to_lowercase();

        let details = SoftSkillDetails {
            clarity: self.clarity(text, &lower),
            impact: self.impact(&lower),
            soft_skills: self.soft_skills(&lower),
        };

        SoftFactors {
            total: round2((details.clarity + details.impact + details.soft_skills) / self.divisor),
            details,
        }
    }

    fn clarity(&self, text: &str, lower: &str) -> f64 {
        let verbs = self.action_verbs.count(lower);
        let numbers = text
            .split_whitespace()
            .filter(|token| token.chars().any(char::is_numeric))
            .count();

        if verbs > 10 && numbers > 5 {
            10.0
        } else if verbs > 5 {
            7.0
        } else {
            4.0
        }
    }

    fn impact(&self, lower: &str) -> f64 {
        let impact = self.impact_words.count(lower) as f64;
        let weak = self.responsible_words.count(lower) as f64;

        if impact == 0.0 {
            return 5.0;
        }

        let score = (impact * 2.0 - weak).min(10.0);
        if self.floor_impact {
            score.max(0.0)
        } else {
            score
        }
    }

    fn soft_skills(&self, lower: &str) -> f64 {
        match self.soft_skills.count(lower) {
            n if n >= 5 => 10.0,
            n if n >= 3 => 7.0,
            n if n >= 1 => 5.0,
            _ => 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn lists() -> VocabularyLists {
        VocabularyLists::new(
            list(&["developed", "led", "built"]),
            list(&["increased", "reduced"]),
            list(&["responsible", "helped"]),
            list(&["teamwork", "leadership", "communication"]),
        )
        .unwrap()
    }

    fn scorer() -> SoftFactorScorer {
        SoftFactorScorer::new(&lists(), 2.0, true).unwrap()
    }

    #[test]
    fn test_phrase_counter_matches_substring_counting() {
        let counter = PhraseCounter::new(&list(&["led", "aa", "a"])).unwrap();
        // led: 2, aa: 2 (non-overlapping in "aaaa"), a: 4
        assert_eq!(counter.count("tickled led aaaa"), 8);
    }

    #[test]
    fn test_phrase_counter_duplicate_phrases_count_twice() {
        let counter = PhraseCounter::new(&list(&["built", "built"])).unwrap();
        assert_eq!(counter.count("built it"), 2);
    }

    #[test]
    fn test_no_vocabulary_hits() {
        let result = scorer().score("Plain text without any matching words.");
        assert_eq!(result.details.clarity, 4.0);
        assert_eq!(result.details.impact, 5.0);
        assert_eq!(result.details.soft_skills, 3.0);
        assert_eq!(result.total, 6.0);
    }

    #[test]
    fn test_clarity_tiers() {
        let scorer = scorer();
        let six_verbs = "developed built led developed built led";
        assert_eq!(scorer.score(six_verbs).details.clarity, 7.0);

        let eleven_verbs = format!("{} {} built 1 2 3 4 5 6", six_verbs, "developed built led developed");
        assert_eq!(scorer.score(&eleven_verbs).details.clarity, 10.0);

        let few_numbers = format!("{} {} built 1 2 3 4 5", six_verbs, "developed built led developed");
        assert_eq!(scorer.score(&few_numbers).details.clarity, 7.0);
    }

    #[test]
    fn test_impact_against_responsibility() {
        let scorer = scorer();
        assert_eq!(scorer.score("Increased revenue, helped the team").details.impact, 1.0);
        assert_eq!(
            scorer.score("increased reduced increased reduced increased reduced").details.impact,
            10.0
        );
        assert_eq!(
            scorer.score("increased; responsible helped responsible helped").details.impact,
            0.0
        );
    }

    #[test]
    fn test_impact_floor_can_be_disabled() {
        let scorer = SoftFactorScorer::new(&lists(), 2.0, false).unwrap();
        assert_eq!(
            scorer.score("increased; responsible helped responsible helped").details.impact,
            -2.0
        );
    }

    #[test]
    fn test_soft_skill_tiers() {
        let scorer = scorer();
        assert_eq!(scorer.score("Teamwork").details.soft_skills, 5.0);
        assert_eq!(scorer.score("teamwork leadership communication").details.soft_skills, 7.0);
        assert_eq!(
            scorer.score("teamwork leadership communication teamwork leadership").details.soft_skills,
            10.0
        );
    }

    #[test]
    fn test_divisor_and_rounding() {
        let scorer = SoftFactorScorer::new(&lists(), 3.0, true).unwrap();
        // 4 + 5 + 3 = 12
        assert_eq!(scorer.score("nothing here").total, 4.0);

        let scorer = SoftFactorScorer::new(&lists(), 7.0, true).unwrap();
        assert_eq!(scorer.score("nothing here").total, 1.71);
    }

    #[test]
    fn test_invalid_divisor_rejected() {
        assert!(SoftFactorScorer::new(&lists(), 0.0, true).is_err());
    }

    #[test]
    fn test_details_serialize_with_display_names() {
        let details = scorer().score("").details;
        let json = serde_json::to_value(details).unwrap();
        assert_eq!(json["Clarity"], 4.0);
        assert_eq!(json["Impact vs Responsibility"], 5.0);
        assert_eq!(json["Soft Skills"], 3.0);
    }
}
