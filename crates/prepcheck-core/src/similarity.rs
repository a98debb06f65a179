//! Lexical closeness between the user answer and the reference answer.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::text::Similarity;

/// A reference token is covered when some answer token is closer than this.
pub const TOKEN_MATCH_THRESHOLD: f64 = 0.7;

/// Token overlap alone overstates coherence, so it is discounted.
pub const TOKEN_SCORE_DISCOUNT: f64 = 0.8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScore {
    /// `max(whole, token * 0.8)`.
    pub score: f64,
    /// Whole-string similarity of the lowercased texts.
    pub whole: f64,
    /// Fraction of reference tokens covered by some answer token.
    pub token: f64,
}

/// Score lexical similarity. An empty reference scores 0.
pub fn score_similarity(
    user_answer: &str,
    reference_answer: &str,
    similarity: &dyn Similarity,
) -> SimilarityScore {
    let reference = reference_answer.trim().to_lowercase();
    if reference.is_empty() {
        return SimilarityScore::default();
    }
    let user = user_answer.trim().to_lowercase();
    if user.is_empty() {
        return SimilarityScore::default();
    }

    let whole = similarity.similarity(&user, &reference).clamp(0.0, 1.0);

    let user_tokens: HashSet<&str> = user.split_whitespace().collect();
    let reference_tokens: Vec<&str> = reference.split_whitespace().collect();

    // Repeated reference tokens only need one comparison pass, and a token
    // the answer contains verbatim needs none.
    let mut seen: HashMap<&str, bool> = HashMap::new();
    let covered = reference_tokens
        .iter()
        .filter(|&&token| {
            *seen.entry(token).or_insert_with(|| {
                user_tokens.contains(token)
                    || user_tokens
                        .iter()
                        .any(|u| similarity.similarity(u, token) > TOKEN_MATCH_THRESHOLD)
            })
        })
        .count();
    let token = covered as f64 / reference_tokens.len() as f64;

    SimilarityScore {
        score: whole.max(token * TOKEN_SCORE_DISCOUNT).clamp(0.0, 1.0),
        whole,
        token,
    }
}
