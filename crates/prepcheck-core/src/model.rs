//! Core data model types for prepcheck.
//!
//! Questions and banks are loaded from TOML; everything an evaluation
//! produces is request-scoped and owned by the caller.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A stored interview question with its reference answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier for this question.
    pub id: String,
    /// Job role the question targets (e.g. "Frontend Developer").
    #[serde(default)]
    pub role: String,
    /// Topic within the role (e.g. "React Core").
    #[serde(default)]
    pub topic: String,
    /// The question as shown to the candidate.
    pub text: String,
    /// Sample answer the user's answer is scored against.
    #[serde(default)]
    pub answer: String,
    /// Key terms a good answer mentions.
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Suggested answering time in seconds.
    #[serde(default)]
    pub estimated_time_secs: Option<u32>,
}

impl Question {
    /// The reference half of an evaluation for this question.
    pub fn reference(&self) -> ReferenceAnswer {
        ReferenceAnswer {
            text: self.answer.clone(),
            keywords: self.keywords.clone(),
        }
    }
}

/// Question difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" | "easy" => Ok(Difficulty::Beginner),
            "intermediate" | "medium" => Ok(Difficulty::Intermediate),
            "advanced" | "hard" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A named collection of questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// The reference side of an evaluation: sample text plus key terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceAnswer {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl ReferenceAnswer {
    pub fn new(text: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            text: text.into(),
            keywords,
        }
    }
}

/// Coarse bucketing of the final score for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    /// `high` from 70, `medium` from 40, `low` below.
    pub fn from_score(score: u8) -> Self {
        if score >= 70 {
            ConfidenceTier::High
        } else if score >= 40 {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceTier::Low => write!(f, "low"),
            ConfidenceTier::Medium => write!(f, "medium"),
            ConfidenceTier::High => write!(f, "high"),
        }
    }
}

/// The four sub-scores that feed the final score, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub keyword: f64,
    pub similarity: f64,
    pub coverage: f64,
    pub structure: f64,
}

/// Outcome of evaluating one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Weighted score, 0–100.
    pub final_score: u8,
    pub confidence: ConfidenceTier,
    /// Keywords found in the answer, in keyword-list order.
    pub matched_keywords: Vec<String>,
    /// Keywords not found, in keyword-list order.
    pub missing_keywords: Vec<String>,
    /// One-line summary.
    pub summary_feedback: String,
    /// Ordered detail lines.
    pub detailed_feedback: Vec<String>,
    pub breakdown: ScoreBreakdown,
    /// Reference sentences touched by the answer.
    pub covered_sentences: usize,
    /// Qualifying reference sentences.
    pub total_sentences: usize,
    /// Whitespace-separated words in the answer.
    pub word_count: usize,
}

/// One user's answer to one stored question, as found in a submission file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub question_id: String,
    /// Who answered; used for per-user progress statistics.
    #[serde(default)]
    pub user: Option<String>,
    /// Kept untyped so a non-string answer is reported, not rejected at load.
    #[serde(default)]
    pub answer: serde_json::Value,
}

/// Wire-level evaluation input, as posted by a route handler.
///
/// `user_answer` is kept untyped so a non-string value can be reported as
/// [`EvalError::InvalidInput`](crate::error::EvalError::InvalidInput) rather
/// than failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    #[serde(default)]
    pub user_answer: Option<serde_json::Value>,
    #[serde(default)]
    pub reference_answer: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

impl CheckRequest {
    pub fn new(user_answer: &str, reference: &ReferenceAnswer) -> Self {
        Self {
            user_answer: Some(serde_json::Value::String(user_answer.to_string())),
            reference_answer: Some(reference.text.clone()),
            keywords: Some(reference.keywords.clone()),
        }
    }
}

/// Wire-level evaluation output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub percent: u8,
    pub feedback: String,
    pub keywords_matched: usize,
    pub total_keywords: usize,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub detailed_feedback: Vec<String>,
    pub confidence: ConfidenceTier,
}

impl From<&EvaluationResult> for CheckResponse {
    fn from(result: &EvaluationResult) -> Self {
        Self {
            percent: result.final_score,
            feedback: result.summary_feedback.clone(),
            keywords_matched: result.matched_keywords.len(),
            total_keywords: result.matched_keywords.len() + result.missing_keywords.len(),
            matched_keywords: result.matched_keywords.clone(),
            missing_keywords: result.missing_keywords.clone(),
            detailed_feedback: result.detailed_feedback.clone(),
            confidence: result.confidence,
        }
    }
}
