//! Validator outcome

use std::fmt;

/// Outcome of [`RequestValidator::assess`](super::RequestValidator::assess).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No text, or whitespace only.
    Empty,
    /// Fewer than five characters after trimming.
    TooShort,
    /// Too few meaningful words to be a real request.
    Garbled,
    /// Contains the given testing keyword.
    KeywordMatch(String),
    /// No keyword, but long enough to pass.
    LongEnough,
    /// No keyword and too short to pass.
    TooVague,
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::KeywordMatch(_) | Verdict::LongEnough)
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Verdict::Empty => "empty",
            Verdict::TooShort => "too_short",
            Verdict::Garbled => "garbled",
            Verdict::KeywordMatch(_) => "keyword_match",
            Verdict::LongEnough => "long_enough",
            Verdict::TooVague => "too_vague",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::KeywordMatch(k) => write!(f, "ACCEPTED (keyword: {})", k),
            Verdict::LongEnough => write!(f, "ACCEPTED (long enough)"),
            other => write!(f, "REJECTED ({})", other.reason()),
        }
    }
}
