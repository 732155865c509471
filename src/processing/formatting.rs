//! Resume structure checks and readability metrics

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

pub const MIN_WORD_COUNT: usize = 200;

const EXPERIENCE_MARKERS: [&str; 5] = ["experience", "internships", "projects", "work", "research"];

/// Flesch reading ease and Flesch-Kincaid grade, rounded to two decimals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Readability {
    pub ease: f64,
    pub grade: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormattingAnalyzer;

impl FormattingAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Human-readable structural problems, in a fixed order
    pub fn analyze_formatting(&self, text: &str) -> Vec<String> {
        let mut issues = Vec::new();
        let lower = text.to_lowercase();

        if !lower.contains("education") {
            issues.push("Missing Education section".to_string());
        }
        if !EXPERIENCE_MARKERS.iter().any(|marker| lower.contains(marker)) {
            issues.push("Missing Experience section".to_string());
        }
        if self.word_count(text) < MIN_WORD_COUNT {
            issues.push(format!("Resume too short (<{} words)", MIN_WORD_COUNT));
        }

        issues
    }

    /// Whitespace-separated token count
    pub fn word_count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }

    pub fn readability(&self, text: &str) -> Readability {
        let words: Vec<&str> = text.unicode_words().filter(|w| is_word(w)).collect();
        let word_count = words.len();

        let (words_per_sentence, syllables_per_word) = if word_count == 0 {
            (0.0, 0.0)
        } else {
            let sentences = text
                .unicode_sentences()
                .filter(|s| s.unicode_words().filter(|w| is_word(w)).count() > 2)
                .count()
                .max(1);
            let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();
            (
                word_count as f64 / sentences as f64,
                syllables as f64 / word_count as f64,
            )
        };

        Readability {
            ease: round2(206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word),
            grade: round2(0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59),
        }
    }
}

fn is_word(token: &str) -> bool {
    token.chars().any(char::is_alphanumeric)
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

/// Vowel-group estimate; a trailing silent `e` is dropped unless it forms `-le`
pub fn count_syllables(word: &str) -> usize {
    let letters: Vec<char> = word
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect();
    if letters.is_empty() {
        return 1;
    }

    let mut count = 0;
    let mut previous_vowel = false;
    for &c in &letters {
        let vowel = is_vowel(c);
        if vowel && !previous_vowel {
            count += 1;
        }
        previous_vowel = vowel;
    }

    let n = letters.len();
    if count > 1 && letters[n - 1] == 'e' {
        let consonant_le = n >= 3 && letters[n - 2] == 'l' && !is_vowel(letters[n - 3]);
        if !consonant_le {
            count -= 1;
        }
    }

    count.max(1)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filler(words: usize) -> String {
        vec!["python"; words].join(" ")
    }

    #[test]
    fn test_all_issues_in_order() {
        let issues = FormattingAnalyzer::new().analyze_formatting("Skills: Rust, Go");
        assert_eq!(
            issues,
            vec![
                "Missing Education section",
                "Missing Experience section",
                "Resume too short (<200 words)"
            ]
        );
    }

    #[test]
    fn test_complete_resume_has_no_issues() {
        let text = format!("EDUCATION BSc. Projects: parser. {}", filler(200));
        assert!(FormattingAnalyzer::new().analyze_formatting(&text).is_empty());
    }

    #[test]
    fn test_any_experience_marker_is_enough() {
        let analyzer = FormattingAnalyzer::new();
        for marker in ["Work", "Research", "internships"] {
            let text = format!("education {} {}", marker, filler(200));
            assert!(analyzer.analyze_formatting(&text).is_empty(), "{}", marker);
        }
    }

    #[test]
    fn test_word_count_boundary() {
        let analyzer = FormattingAnalyzer::new();
        let text = format!("education work {}", filler(197));
        assert_eq!(analyzer.word_count(&text), 199);
        assert_eq!(analyzer.analyze_formatting(&text), vec!["Resume too short (<200 words)"]);

        let text = format!("education work {}", filler(198));
        assert!(analyzer.analyze_formatting(&text).is_empty());
    }

    #[test]
    fn test_readability_simple_text() {
        let readability =
            FormattingAnalyzer::new().readability("The cat sat on the mat. The dog ran far away.");
        assert_eq!(readability.ease, 108.96);
        assert_eq!(readability.grade, -0.57);
    }

    #[test]
    fn test_readability_empty_text() {
        let readability = FormattingAnalyzer::new().readability("   ");
        assert_eq!(readability.ease, 206.84);
        assert_eq!(readability.grade, -15.59);
    }

    #[test]
    fn test_dense_text_reads_harder() {
        let analyzer = FormattingAnalyzer::new();
        let simple = analyzer.readability("I like to code. I work on web apps.");
        let dense = analyzer.readability(
            "Architected distributed microservices infrastructure facilitating \
             organizational interoperability across heterogeneous deployment environments.",
        );
        assert!(dense.ease < simple.ease);
        assert!(dense.grade > simple.grade);
        assert!(dense.ease <= 50.0);
    }

    #[test]
    fn test_syllable_heuristic() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("the"), 1);
        assert_eq!(count_syllables("table"), 2);
        assert_eq!(count_syllables("developed"), 4);
        assert_eq!(count_syllables("2024"), 1);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.345678), 12.35);
        assert_eq!(round2(-2.004), -2.0);
    }
}
