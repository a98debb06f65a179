//! Answer adequacy from length and punctuation.

use serde::{Deserialize, Serialize};

use crate::text::{has_terminator, word_count};

/// Assumed reference length when no reference text is available.
pub const DEFAULT_REFERENCE_WORDS: usize = 50;

/// Answers need not exceed this many words to earn full length credit.
pub const MIN_EXPECTED_WORDS: f64 = 20.0;

/// Share of the reference length that earns full length credit.
pub const REFERENCE_LENGTH_RATIO: f64 = 0.3;

const PUNCTUATED_SCORE: f64 = 0.8;
const UNPUNCTUATED_SCORE: f64 = 0.4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureScore {
    /// Mean of `length` and `segmentation`.
    pub score: f64,
    pub length: f64,
    pub segmentation: f64,
    pub word_count: usize,
}

/// Score answer length relative to the reference, and whether the answer is
/// split into sentences. A blank answer scores 0 outright.
pub fn score_structure(user_answer: &str, reference_answer: Option<&str>) -> StructureScore {
    let words = word_count(user_answer);
    if words == 0 {
        return StructureScore::default();
    }

    let reference_words = match reference_answer.map(word_count) {
        Some(n) if n > 0 => n,
        _ => DEFAULT_REFERENCE_WORDS,
    };
    let expected = (reference_words as f64 * REFERENCE_LENGTH_RATIO).max(MIN_EXPECTED_WORDS);
    let length = (words as f64 / expected).min(1.0);

    let segmentation = if has_terminator(user_answer) {
        PUNCTUATED_SCORE
    } else {
        UNPUNCTUATED_SCORE
    };

    StructureScore {
        score: (length + segmentation) / 2.0,
        length,
        segmentation,
        word_count: words,
    }
}
