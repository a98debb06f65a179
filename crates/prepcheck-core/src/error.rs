//! Error types for evaluation and question lookup.
//!
//! Defined in `prepcheck-core` so the batch engine can downcast and classify
//! failures without string matching.

use thiserror::Error;

/// Errors raised by the answer evaluator.
///
/// Everything other than a missing or non-string answer degrades to a valid
/// result instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The user answer was absent, `null`, or not a string.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors that can occur when looking up questions.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No question with the given identifier exists.
    #[error("question not found: {0}")]
    NotFound(String),

    /// The backing store could not be read.
    #[error("question store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns `true` if retrying the lookup cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
