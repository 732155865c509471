//! Approximate string matching for skill names

use std::collections::BTreeSet;

/// Scores string pairs on a 0-100 scale and picks the best candidate.
pub trait StringSimilarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;

    /// Index and score of the highest scoring candidate; the first one wins ties.
    fn best_match(&self, query: &str, candidates: &[String]) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (index, candidate) in candidates.iter().enumerate() {
            let score = self.similarity(query, candidate);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((index, score));
                if score >= 100.0 {
                    break;
                }
            }
        }
        best
    }
}

/// Insertion/deletion ratio `2 * LCS / (len_a + len_b)`, 0-100.
///
/// A swapped pair of letters costs one unmatched character on each side, so
/// "pyhton" vs "python" scores 83.33.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * longest_common_subsequence(&a, &b) as f64 / total as f64
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb { diagonal + 1 } else { above.max(row[j]) };
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Best [`ratio`] of the shorter string against every same-length window of the longer one
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() { (a, b) } else { (b, a) };
    let short_len = short.chars().count();
    let long_chars: Vec<char> = long.chars().collect();

    if short_len == 0 {
        return if long_chars.is_empty() { 100.0 } else { 0.0 };
    }
    if short_len == long_chars.len() {
        return ratio(short, long);
    }

    let mut best: f64 = 0.0;
    for start in 0..=(long_chars.len() - short_len) {
        let window: String = long_chars[start..start + short_len].iter().collect();
        best = best.max(ratio(short, &window));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn tokens(s: &str) -> BTreeSet<&str> {
    s.split_whitespace().collect()
}

fn join(set: &BTreeSet<&str>) -> String {
    set.iter().copied().collect::<Vec<_>>().join(" ")
}

/// Ratio after sorting whitespace tokens
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let mut ta: Vec<&str> = a.split_whitespace().collect();
    let mut tb: Vec<&str> = b.split_whitespace().collect();
    ta.sort_unstable();
    tb.sort_unstable();
    ratio(&ta.join(" "), &tb.join(" "))
}

/// Ratio over the shared and differing token sets
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let ta = tokens(a);
    let tb = tokens(b);
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }

    let shared: BTreeSet<&str> = ta.intersection(&tb).copied().collect();
    let only_a: BTreeSet<&str> = ta.difference(&tb).copied().collect();
    let only_b: BTreeSet<&str> = tb.difference(&ta).copied().collect();

    // One side's tokens are a subset of the other's
    if !shared.is_empty() && (only_a.is_empty() || only_b.is_empty()) {
        return 100.0;
    }

    let shared_str = join(&shared);
    let with_a = format!("{} {}", shared_str, join(&only_a)).trim().to_string();
    let with_b = format!("{} {}", shared_str, join(&only_b)).trim().to_string();

    let mut best = ratio(&with_a, &with_b);
    if !shared_str.is_empty() {
        best = best.max(ratio(&shared_str, &with_a)).max(ratio(&shared_str, &with_b));
    }
    best
}

fn partial_token_ratio(a: &str, b: &str) -> f64 {
    let ta = tokens(a);
    let tb = tokens(b);
    if ta.intersection(&tb).next().is_some() {
        return 100.0;
    }
    partial_ratio(&join(&ta), &join(&tb))
}

/// Weighted blend of full, partial and token ratios, in the style of the
/// common "WRatio" fuzzy scorer. Strings of similar length are compared whole;
/// when one is much longer, substring alignment takes over at a discount.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedRatio;

const UNBASE_SCALE: f64 = 0.95;

impl StringSimilarity for WeightedRatio {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let len_a = a.chars().count() as f64;
        let len_b = b.chars().count() as f64;
        let len_ratio = len_a.max(len_b) / len_a.min(len_b);

        let full = ratio(a, b);
        if len_ratio < 1.5 {
            let token = token_sort_ratio(a, b).max(token_set_ratio(a, b));
            return full.max(token * UNBASE_SCALE);
        }

        let partial_scale = if len_ratio <= 8.0 { 0.9 } else { 0.6 };
        let partial = partial_ratio(a, b) * partial_scale;
        let partial_tokens = partial_token_ratio(a, b) * UNBASE_SCALE * partial_scale;
        full.max(partial).max(partial_tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_bounds() {
        assert_eq!(ratio("python", "python"), 100.0);
        assert_eq!(ratio("", ""), 100.0);
        assert_eq!(ratio("python", ""), 0.0);
        assert_eq!(ratio("python", "java"), 0.0);
    }

    #[test]
    fn test_ratio_counts_transpositions_once_per_side() {
        assert!((ratio("pyhton", "python") - 83.33).abs() < 0.01);
        assert!((ratio("djnago", "django") - 83.33).abs() < 0.01);
        assert_eq!(ratio("kuberentes", "kubernetes"), 90.0);
        assert_eq!(ratio("reatc", "react"), 80.0);
    }

    #[test]
    fn test_partial_ratio_finds_substring() {
        assert_eq!(partial_ratio("react", "reactjs framework"), 100.0);
        assert!(partial_ratio("vue", "angular") < 100.0);
    }

    #[test]
    fn test_token_set_subset() {
        assert_eq!(token_set_ratio("google cloud", "google cloud platform"), 100.0);
        assert_eq!(token_set_ratio("", "aws"), 0.0);
    }

    #[test]
    fn test_weighted_ratio_typo_scores_high() {
        let scorer = WeightedRatio;
        assert!(scorer.similarity("pyhton", "python") > 80.0);
        assert!(scorer.similarity("kuberentes", "kubernetes") > 80.0);
        assert!(scorer.similarity("tensorflw", "tensorflow") > 80.0);
        assert!(scorer.similarity("kubernetes", "excel") < 50.0);
        assert_eq!(scorer.similarity("", "python"), 0.0);
    }

    #[test]
    fn test_weighted_ratio_token_order() {
        let scorer = WeightedRatio;
        assert!(scorer.similarity("platform google cloud", "google cloud platform") >= 95.0);
    }

    #[test]
    fn test_best_match_prefers_first_on_ties() {
        let scorer = WeightedRatio;
        let candidates = vec!["rust".to_string(), "rust".to_string(), "ruby".to_string()];
        let (index, score) = scorer.best_match("rust", &candidates).unwrap();
        assert_eq!(index, 0);
        assert_eq!(score, 100.0);
        assert!(scorer.best_match("rust", &[]).is_none());
    }
}
