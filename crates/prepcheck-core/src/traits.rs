//! Collaborator traits.
//!
//! The evaluator itself is synchronous and needs no collaborators; the batch
//! engine looks questions up through [`QuestionStore`], implemented by the
//! `prepcheck-store` crate.

use async_trait::async_trait;

use crate::model::Question;

/// Source of stored questions with their reference answers.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Human-readable store name (e.g. "bank").
    fn name(&self) -> &str;

    /// Fetch one question. Fails with
    /// [`StoreError::NotFound`](crate::error::StoreError::NotFound) for an
    /// unknown id.
    async fn fetch(&self, id: &str) -> anyhow::Result<Question>;

    /// All questions in the store.
    async fn list(&self) -> anyhow::Result<Vec<Question>>;
}
