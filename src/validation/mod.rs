//! # Validation Module
//!
//! Cheap pre-filter that decides whether free text is a plausible
//! testing-related request before any model call is spent on it.
//!
//! The check is a single pass over the text:
//!
//! 1. absent, or shorter than 5 characters after trimming: reject
//! 2. at least 3 whitespace tokens and fewer than 30% "meaningful words"
//!    (ASCII-alphabetic tokens of length ≥ 3): reject as garbled
//! 3. any testing keyword as a case-insensitive substring: accept
//! 4. otherwise accept only if the trimmed text is longer than 15 characters
//!
//! False positives and negatives are expected; it only has to be cheaper than
//! the call it guards.
//!
//! ## Example
//!
//! ```rust
//! use bdd_forge::validation::{RequestValidator, Verdict};
//!
//! let validator = RequestValidator::default();
//! assert!(validator.is_valid(Some("verify the login page")));
//! assert_eq!(validator.assess(Some("asdf")), Verdict::TooShort);
//! assert_eq!(validator.assess(Some("x7! #$ 9@ qq")), Verdict::Garbled);
//! ```

mod verdict;

pub use verdict::Verdict;

/// Minimum trimmed length, in characters.
pub const MIN_LENGTH: usize = 5;
/// Trimmed length above which keyword-free text is still accepted.
pub const VAGUE_LENGTH: usize = 15;
/// Minimum share of meaningful words once a text has [`GARBLE_MIN_TOKENS`] tokens.
pub const MEANINGFUL_RATIO: f64 = 0.3;
pub const GARBLE_MIN_TOKENS: usize = 3;

/// Vocabulary that marks a text as testing-related.
pub const TEST_KEYWORDS: &[&str] = &[
    "test", "login", "page", "user", "password", "click", "button", "input", "field", "verify",
    "check", "validate", "scenario", "feature", "given", "when", "then", "selenium", "script",
    "generate",
];

/// Heuristic request validator.
#[derive(Debug, Clone)]
pub struct RequestValidator {
    keywords: Vec<String>,
}

impl RequestValidator {
    pub fn new() -> Self {
        Self::with_keywords(TEST_KEYWORDS.iter().copied())
    }

    /// Use a custom keyword set. Keywords are matched case-insensitively.
    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Accept/reject decision.
    pub fn is_valid(&self, text: Option<&str>) -> bool {
        self.assess(text).is_accepted()
    }

    /// Decision plus the rule that produced it.
    pub fn assess(&self, text: Option<&str>) -> Verdict {
        let Some(text) = text else {
            return Verdict::Empty;
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Verdict::Empty;
        }
        let length = trimmed.chars().count();
        if length < MIN_LENGTH {
            return Verdict::TooShort;
        }

        let tokens: Vec<&str> = text.split_whitespace().collect();
        let meaningful = tokens.iter().filter(|t| is_meaningful_word(t)).count();
        if tokens.len() >= GARBLE_MIN_TOKENS
            && (meaningful as f64) / (tokens.len() as f64) < MEANINGFUL_RATIO
        {
            return Verdict::Garbled;
        }

        let lower = text.to_lowercase();
        if let Some(keyword) = self.keywords.iter().find(|k| lower.contains(k.as_str())) {
            return Verdict::KeywordMatch(keyword.clone());
        }

        if length > VAGUE_LENGTH {
            Verdict::LongEnough
        } else {
            Verdict::TooVague
        }
    }
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// A token of at least three ASCII letters and nothing else.
pub fn is_meaningful_word(token: &str) -> bool {
    token.len() >= 3 && token.chars().all(|c| c.is_ascii_alphabetic())
}
