//! Content coverage: how many reference sentences does the answer touch?

use serde::{Deserialize, Serialize};

use crate::text::sentences;

/// Words this short carry too little meaning to count as coverage.
const MIN_MEANINGFUL_WORD_CHARS: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageScore {
    /// `covered / total`, or 0 without qualifying sentences.
    pub score: f64,
    pub covered: usize,
    pub total: usize,
}

impl CoverageScore {
    /// True when fewer than half of the reference sentences were touched.
    /// Never true for a reference without qualifying sentences.
    pub fn is_thin(&self) -> bool {
        self.covered * 2 < self.total
    }
}

/// A reference sentence is covered when any of its words longer than three
/// characters appears, case-insensitively, as a substring of the answer.
pub fn score_coverage(user_answer: &str, reference_answer: &str) -> CoverageScore {
    let reference_sentences = sentences(reference_answer);
    if reference_sentences.is_empty() {
        return CoverageScore::default();
    }

    let user = user_answer.to_lowercase();
    let covered = reference_sentences
        .iter()
        .filter(|sentence| {
            sentence
                .to_lowercase()
                .split_whitespace()
                .filter(|word| word.chars().count() >= MIN_MEANINGFUL_WORD_CHARS)
                .any(|word| user.contains(word))
        })
        .count();
    let total = reference_sentences.len();

    CoverageScore {
        score: covered as f64 / total as f64,
        covered,
        total,
    }
}
