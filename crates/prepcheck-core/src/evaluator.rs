//! The answer evaluator: four sub-scores blended into a final grade.
//!
//! Evaluation is pure and synchronous. An [`Evaluator`] holds only read-only
//! state (strategies and a concept table), so one instance can be shared
//! across any number of concurrent request handlers.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::concepts::ConceptTable;
use crate::coverage::{score_coverage, CoverageScore};
use crate::error::EvalError;
use crate::keywords::{match_keywords, KeywordMatch};
use crate::model::{
    CheckRequest, CheckResponse, ConfidenceTier, EvaluationResult, ReferenceAnswer,
    ScoreBreakdown,
};
use crate::similarity::score_similarity;
use crate::structure::{score_structure, StructureScore};
use crate::text::{DiceSimilarity, Similarity, SnowballStemmer, Stemmer};

pub const KEYWORD_WEIGHT: f64 = 0.4;
pub const SIMILARITY_WEIGHT: f64 = 0.2;
pub const COVERAGE_WEIGHT: f64 = 0.3;
pub const STRUCTURE_WEIGHT: f64 = 0.1;

/// Detail lines suggest expanding answers shorter than this.
const SHORT_ANSWER_WORDS: usize = 20;
const STRUCTURE_SUGGESTION_BELOW: f64 = 0.6;

/// Heuristic free-text answer evaluator.
pub struct Evaluator {
    concepts: Arc<ConceptTable>,
    stemmer: Box<dyn Stemmer>,
    similarity: Box<dyn Similarity>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(ConceptTable::shared())
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("concept_groups", &self.concepts.len())
            .finish_non_exhaustive()
    }
}

impl Evaluator {
    /// An evaluator with the default strategies and the given concept table.
    pub fn new(concepts: Arc<ConceptTable>) -> Self {
        Self {
            concepts,
            stemmer: Box::new(SnowballStemmer::english()),
            similarity: Box::new(DiceSimilarity),
        }
    }

    pub fn with_stemmer(mut self, stemmer: impl Stemmer + 'static) -> Self {
        self.stemmer = Box::new(stemmer);
        self
    }

    pub fn with_similarity(mut self, similarity: impl Similarity + 'static) -> Self {
        self.similarity = Box::new(similarity);
        self
    }

    pub fn concepts(&self) -> &ConceptTable {
        &self.concepts
    }

    /// Evaluate `user_answer` against `reference`. Never fails: empty or
    /// missing reference data degrades the affected sub-scores to 0.
    pub fn evaluate(&self, user_answer: &str, reference: &ReferenceAnswer) -> EvaluationResult {
        let keywords = match_keywords(
            user_answer,
            &reference.keywords,
            self.stemmer.as_ref(),
            self.similarity.as_ref(),
            &self.concepts,
        );
        let similarity = score_similarity(user_answer, &reference.text, self.similarity.as_ref());
        let coverage = score_coverage(user_answer, &reference.text);
        let structure = score_structure(user_answer, Some(reference.text.as_str()));

        let breakdown = ScoreBreakdown {
            keyword: keywords.score,
            similarity: similarity.score,
            coverage: coverage.score,
            structure: structure.score,
        };
        let final_score = blend(&breakdown);
        tracing::debug!(
            keyword = breakdown.keyword,
            similarity = breakdown.similarity,
            coverage = breakdown.coverage,
            structure = breakdown.structure,
            final_score,
            "answer evaluated"
        );

        let (summary_feedback, detailed_feedback) =
            feedback(final_score, &keywords, &coverage, &structure);

        EvaluationResult {
            final_score,
            confidence: ConfidenceTier::from_score(final_score),
            matched_keywords: keywords.matched,
            missing_keywords: keywords.missing,
            summary_feedback,
            detailed_feedback,
            breakdown,
            covered_sentences: coverage.covered,
            total_sentences: coverage.total,
            word_count: structure.word_count,
        }
    }

    /// Evaluate a wire-level request. Rejects a missing or non-string
    /// `userAnswer`; absent reference fields are treated as empty.
    pub fn evaluate_request(&self, request: &CheckRequest) -> Result<EvaluationResult, EvalError> {
        let user_answer = match &request.user_answer {
            Some(Value::String(answer)) => answer.as_str(),
            None | Some(Value::Null) => {
                return Err(EvalError::InvalidInput("userAnswer is required".into()))
            }
            Some(other) => {
                return Err(EvalError::InvalidInput(format!(
                    "userAnswer must be a string, got {}",
                    json_kind(other)
                )))
            }
        };
        let reference = ReferenceAnswer {
            text: request.reference_answer.clone().unwrap_or_default(),
            keywords: request.keywords.clone().unwrap_or_default(),
        };
        Ok(self.evaluate(user_answer, &reference))
    }

    /// [`evaluate_request`](Self::evaluate_request) shaped as the wire response.
    pub fn check(&self, request: &CheckRequest) -> Result<CheckResponse, EvalError> {
        self.evaluate_request(request)
            .map(|result| CheckResponse::from(&result))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Weighted blend of the sub-scores as an integer percentage.
pub fn blend(breakdown: &ScoreBreakdown) -> u8 {
    let weighted = KEYWORD_WEIGHT * breakdown.keyword.clamp(0.0, 1.0)
        + SIMILARITY_WEIGHT * breakdown.similarity.clamp(0.0, 1.0)
        + COVERAGE_WEIGHT * breakdown.coverage.clamp(0.0, 1.0)
        + STRUCTURE_WEIGHT * breakdown.structure.clamp(0.0, 1.0);
    (weighted * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Summary line and ordered detail lines for a final score.
pub fn feedback(
    score: u8,
    keywords: &KeywordMatch,
    coverage: &CoverageScore,
    structure: &StructureScore,
) -> (String, Vec<String>) {
    let mut detailed = Vec::new();

    let summary = if score >= 90 {
        detailed.push("Excellent coverage of all major concepts".to_string());
        detailed.push("Clear and well-structured explanation".to_string());
        format!("Excellent! ({score}%) You demonstrated comprehensive understanding of all key concepts.")
    } else if score >= 70 {
        detailed.push("Good understanding of core concepts".to_string());
        if !keywords.missing.is_empty() {
            detailed.push(format!("Consider mentioning: {}", top(&keywords.missing, 3)));
        }
        format!("Good job! ({score}%) You covered the main concepts well but missed some details.")
    } else if score >= 50 {
        detailed.push("Basic understanding present".to_string());
        if !keywords.missing.is_empty() {
            detailed.push(format!(
                "Important concepts missing: {}",
                top(&keywords.missing, 5)
            ));
        }
        format!("Fair attempt ({score}%). You have the basic idea but need to expand on key points.")
    } else {
        detailed.push("Review the fundamental concepts".to_string());
        if !keywords.matched.is_empty() {
            detailed.push(format!("Good start with: {}", keywords.matched.join(", ")));
        }
        if !keywords.missing.is_empty() {
            detailed.push(format!("Focus on: {}", top(&keywords.missing, 5)));
        }
        format!("Needs improvement ({score}%). Review the key concepts and try again.")
    };

    if coverage.is_thin() {
        detailed.push("Try to cover more aspects of the topic in your answer".to_string());
    }
    if structure.score < STRUCTURE_SUGGESTION_BELOW {
        detailed.push("Structure your answer with clear points and examples".to_string());
    }
    if structure.word_count < SHORT_ANSWER_WORDS {
        detailed.push("Try to provide more detailed explanations".to_string());
    }

    (summary, detailed)
}

fn top(terms: &[String], n: usize) -> String {
    terms
        .iter()
        .take(n)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
