// Approximate string matching for the search box
//
// Scores work like bitap matchers do: 0.0 is a perfect match, 1.0 is a total
// mismatch. A score is the share of pattern characters that had to be edited
// plus a penalty for how far from `location` the match starts. Anything above
// `threshold` is not a match.
use serde::{Deserialize, Serialize};

/// Tuning knobs for [`ApproximateMatcher`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyOptions {
    /// Maximum accepted score, 0.3 tolerates roughly 30% edits
    pub threshold: f64,
    /// How many characters away from `location` cost a full 1.0 of score
    pub distance: usize,
    /// Where in the text a match is expected to start
    pub location: usize,
    /// Ignore where the match starts entirely
    pub ignore_location: bool,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            distance: 100,
            location: 0,
            ignore_location: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApproximateMatcher {
    options: FuzzyOptions,
}

impl ApproximateMatcher {
    pub fn new(options: FuzzyOptions) -> Self {
        Self { options }
    }

    /// Best score of `pattern` against any substring of `text`, if within threshold
    ///
    /// Case-insensitive. An empty pattern matches everything with 0.0.
    pub fn score(&self, pattern: &str, text: &str) -> Option<f64> {
        let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
        let text: Vec<char> = text.to_lowercase().chars().collect();

        if pattern.is_empty() || pattern == text {
            return Some(0.0);
        }

        let m = pattern.len();

        // Sellers' algorithm: column i holds the cheapest edit count for
        // pattern[..i] ending at the current text position, and where that
        // alignment started in the text.
        let mut prev_cost: Vec<usize> = (0..=m).collect();
        let mut prev_start: Vec<usize> = vec![0; m + 1];
        let mut cur_cost = vec![0usize; m + 1];
        let mut cur_start = vec![0usize; m + 1];

        let mut best: Option<f64> = None;

        for (j, &tc) in text.iter().enumerate() {
            cur_cost[0] = 0;
            cur_start[0] = j + 1;

            for i in 1..=m {
                let substitution = prev_cost[i - 1] + usize::from(pattern[i - 1] != tc);
                let skip_pattern = cur_cost[i - 1] + 1;
                let skip_text = prev_cost[i] + 1;

                let (cost, start) = if substitution <= skip_pattern && substitution <= skip_text {
                    (substitution, prev_start[i - 1])
                } else if skip_pattern <= skip_text {
                    (skip_pattern, cur_start[i - 1])
                } else {
                    (skip_text, prev_start[i])
                };

                cur_cost[i] = cost;
                cur_start[i] = start;
            }

            let score = self.compute_score(cur_cost[m], m, cur_start[m]);
            if score <= self.options.threshold && best.map_or(true, |b| score < b) {
                best = Some(score);
            }

            std::mem::swap(&mut prev_cost, &mut cur_cost);
            std::mem::swap(&mut prev_start, &mut cur_start);
        }

        best
    }

    fn compute_score(&self, errors: usize, pattern_len: usize, start: usize) -> f64 {
        let accuracy = errors as f64 / pattern_len as f64;

        if self.options.ignore_location {
            return accuracy;
        }

        let proximity = start.abs_diff(self.options.location);

        if self.options.distance == 0 {
            // Any drift at all is fatal without a distance budget
            return if proximity > 0 { 1.0 } else { accuracy };
        }

        accuracy + proximity as f64 / self.options.distance as f64
    }
}

/// Length normalisation for a field: long descriptions weigh less than names
pub fn field_norm(text: &str) -> f64 {
    let tokens = text.split_whitespace().count().max(1);
    let norm = 1.0 / (tokens as f64).sqrt();
    (norm * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> ApproximateMatcher {
        ApproximateMatcher::default()
    }

    #[test]
    fn test_exact_and_prefix_matches_score_zero() {
        assert_eq!(matcher().score("a/b", "a/b"), Some(0.0));
        assert_eq!(matcher().score("tokio", "tokio-rs/tokio"), Some(0.0));
        assert_eq!(matcher().score("TOKIO", "tokio"), Some(0.0));
    }

    #[test]
    fn test_typos_within_tolerance() {
        // one edit in ten characters
        assert!(matcher().score("ratatuiiii", "ratatuiii").is_some());
        assert!(matcher().score("serde_jsn", "serde_json").is_some());
        // two edits in three characters is way over 30%
        assert!(matcher().score("a/b", "c/d").is_none());
    }

    #[test]
    fn test_location_penalty() {
        let text = format!("{}needle", " ".repeat(50));
        // starts 50 characters in: 0.5 penalty with the default distance
        assert!(matcher().score("needle", &text).is_none());

        let relaxed = ApproximateMatcher::new(FuzzyOptions {
            ignore_location: true,
            ..FuzzyOptions::default()
        });
        assert_eq!(relaxed.score("needle", &text), Some(0.0));
    }

    #[test]
    fn test_close_to_start_is_fine() {
        let score = matcher().score("async", "an async runtime").unwrap();
        assert!((score - 0.03).abs() < 1e-9);
    }

    #[test]
    fn test_zero_distance() {
        let strict = ApproximateMatcher::new(FuzzyOptions {
            distance: 0,
            ..FuzzyOptions::default()
        });
        assert!(strict.score("web", "webapp").is_some());
        assert!(strict.score("app", "webapp").is_none());
    }

    #[test]
    fn test_field_norm() {
        assert_eq!(field_norm("tokio"), 1.0);
        assert_eq!(field_norm("a fast async runtime"), 0.5);
        assert_eq!(field_norm(""), 1.0);
    }
}
