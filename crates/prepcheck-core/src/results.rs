//! Per-submission grading outcomes.

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, StoreError};
use crate::model::EvaluationResult;

/// A submission that was graded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedSubmission {
    pub submission_id: String,
    pub question_id: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub topic: String,
    pub result: EvaluationResult,
}

/// A submission that could not be graded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedSubmission {
    pub submission_id: String,
    pub question_id: String,
    pub kind: FailureKind,
    pub message: String,
}

/// Why a submission failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    QuestionNotFound,
    InvalidInput,
    StoreUnavailable,
    Other,
}

impl FailureKind {
    /// Classify an error by downcasting to the crate's error types.
    pub fn classify(error: &anyhow::Error) -> Self {
        if let Some(store) = error.downcast_ref::<StoreError>() {
            return match store {
                StoreError::NotFound(_) => FailureKind::QuestionNotFound,
                StoreError::Unavailable(_) => FailureKind::StoreUnavailable,
            };
        }
        if error.downcast_ref::<EvalError>().is_some() {
            return FailureKind::InvalidInput;
        }
        FailureKind::Other
    }
}
