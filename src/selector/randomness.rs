use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// ============================================================================
// Randomness heuristic
// ============================================================================

static INTERIOR_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]\d+[A-Za-z]").expect("valid regex"));

/// Tunable thresholds for classifying class names, ids and attribute values
/// as generated (hashes, build artifacts, framework ids) or human-authored.
///
/// This is a heuristic, not a proof: false positives and negatives are
/// expected. All conditions are OR-ed; any single hit marks the token random.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomnessHeuristic {
    /// Minimum length of an alphanumeric run that gets inspected.
    #[serde(default = "default_min_run_len")]
    pub min_run_len: usize,

    /// A run of this many consecutive digits marks a token random.
    #[serde(default = "default_digit_run")]
    pub digit_run: usize,

    /// Runs at least this long with no vowel are random.
    #[serde(default = "default_vowelless_len")]
    pub vowelless_len: usize,
}

impl Default for RandomnessHeuristic {
    fn default() -> Self {
        Self {
            min_run_len: default_min_run_len(),
            digit_run: default_digit_run(),
            vowelless_len: default_vowelless_len(),
        }
    }
}

fn default_min_run_len() -> usize { 5 }
fn default_digit_run() -> usize { 3 }
fn default_vowelless_len() -> usize { 8 }

impl RandomnessHeuristic {
    /// Classify a token. Empty input is never random.
    pub fn is_random(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }

        self.has_random_run(token) || self.has_digit_run(token)
    }

    fn has_random_run(&self, token: &str) -> bool {
        alphanumeric_runs(token)
            .into_iter()
            .filter(|run| run.len() >= self.min_run_len)
            .any(|run| {
                self.has_irregular_digits(run)
                    || is_mixed_case_random(run)
                    || (run.len() >= self.vowelless_len && !run.chars().any(is_vowel))
            })
    }

    /// Interior digits (`a1b`), a long digit run, or a leading digit.
    fn has_irregular_digits(&self, run: &str) -> bool {
        INTERIOR_DIGITS.is_match(run)
            || self.has_digit_run(run)
            || run.starts_with(|c: char| c.is_ascii_digit())
    }

    fn has_digit_run(&self, s: &str) -> bool {
        if self.digit_run == 0 {
            return true;
        }

        let mut current = 0;
        for c in s.chars() {
            if c.is_ascii_digit() {
                current += 1;
                if current >= self.digit_run {
                    return true;
                }
            } else {
                current = 0;
            }
        }
        false
    }
}

/// Classify a token with the default thresholds.
pub fn is_random_selector(token: &str) -> bool {
    RandomnessHeuristic::default().is_random(token)
}

/// Maximal ASCII alphanumeric substrings of `s`.
fn alphanumeric_runs(s: &str) -> Vec<&str> {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|run| !run.is_empty())
        .collect()
}

/// Inconsistent camel casing typical of hashes: at least half-minus-one of the
/// letters uppercase while at least one is lowercase.
fn is_mixed_case_random(run: &str) -> bool {
    let letters = run.chars().filter(|c| c.is_ascii_alphabetic());
    let (mut upper, mut lower, mut count) = (0i64, 0i64, 0i64);

    for c in letters {
        count += 1;
        if c.is_ascii_uppercase() {
            upper += 1;
        } else {
            lower += 1;
        }
    }

    let half_up = (count + 1) / 2;
    upper >= half_up - 1 && lower >= 1
}

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}
