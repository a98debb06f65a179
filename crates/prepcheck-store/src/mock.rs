//! Mock question store for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use prepcheck_core::model::Question;
use prepcheck_core::traits::QuestionStore;
use prepcheck_core::StoreError;

/// A store with fixed questions that records how it was called.
///
/// Ids listed in `unavailable` fail with [`StoreError::Unavailable`], which
/// lets tests exercise the batch engine's failure classification.
pub struct MockStore {
    questions: HashMap<String, Question>,
    unavailable: Vec<String>,
    fetch_count: AtomicU32,
    last_fetch: Mutex<Option<String>>,
}

impl MockStore {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions: questions.into_iter().map(|q| (q.id.clone(), q)).collect(),
            unavailable: Vec::new(),
            fetch_count: AtomicU32::new(0),
            last_fetch: Mutex::new(None),
        }
    }

    /// Make fetches of `id` fail as if the backing store were down.
    pub fn with_unavailable(mut self, id: &str) -> Self {
        self.unavailable.push(id.to_string());
        self
    }

    /// Number of `fetch` calls made.
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::Relaxed)
    }

    /// The id passed to the most recent `fetch`.
    pub fn last_fetch(&self) -> Option<String> {
        self.last_fetch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl QuestionStore for MockStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, id: &str) -> anyhow::Result<Question> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_fetch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(id.to_string());

        if self.unavailable.iter().any(|u| u == id) {
            return Err(StoreError::Unavailable(format!("mock store refused '{id}'")).into());
        }
        self.questions
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow::Error::new(StoreError::NotFound(id.to_string())))
    }

    async fn list(&self) -> anyhow::Result<Vec<Question>> {
        let mut questions: Vec<Question> = self.questions.values().cloned().collect();
        questions.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(questions)
    }
}
