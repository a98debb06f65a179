//! Batch grading orchestrator.
//!
//! Fetches each submission's question from a [`QuestionStore`], grades the
//! answer with a shared [`Evaluator`], and collects the outcomes into a
//! [`GradingReport`]. Store lookups run concurrently up to `parallelism`,
//! and a lookup that fails transiently is retried before the submission is
//! recorded as failed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::error::StoreError;
use crate::evaluator::Evaluator;
use crate::model::{CheckRequest, Question, Submission};
use crate::report::GradingReport;
use crate::results::{FailedSubmission, FailureKind, GradedSubmission};
use crate::statistics::compute_aggregate_stats;
use crate::traits::QuestionStore;

/// Configuration for a batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum concurrent submissions in flight.
    pub parallelism: usize,
    /// Extra lookup attempts after a transient store failure.
    pub max_retries: u32,
    /// Delay between lookup attempts in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallelism: 4,
            max_retries: 2,
            retry_delay_ms: 200,
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_submission_start(&self, submission_id: &str, question_id: &str);
    fn on_submission_complete(&self, graded: &GradedSubmission);
    fn on_submission_error(&self, failure: &FailedSubmission);
    fn on_batch_complete(&self, total: usize, graded: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_submission_start(&self, _: &str, _: &str) {}
    fn on_submission_complete(&self, _: &GradedSubmission) {}
    fn on_submission_error(&self, _: &FailedSubmission) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// Grades many submissions against questions from one store.
pub struct BatchGrader {
    store: Arc<dyn QuestionStore>,
    evaluator: Arc<Evaluator>,
    config: BatchConfig,
}

impl BatchGrader {
    pub fn new(
        store: Arc<dyn QuestionStore>,
        evaluator: Arc<Evaluator>,
        config: BatchConfig,
    ) -> Self {
        Self {
            store,
            evaluator,
            config,
        }
    }

    /// Grade a single submission.
    pub async fn grade_one(&self, submission: &Submission) -> Result<GradedSubmission> {
        grade(self.store.as_ref(), &self.evaluator, &self.config, submission).await
    }

    /// Grade every submission. Per-submission failures are recorded in the
    /// report rather than aborting the run.
    pub async fn run(
        &self,
        submissions: &[Submission],
        progress: &dyn ProgressReporter,
    ) -> Result<GradingReport> {
        let start = Instant::now();
        tracing::info!(
            submissions = submissions.len(),
            store = self.store.name(),
            parallelism = self.config.parallelism,
            "starting batch"
        );
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism.max(1)));
        let config = &self.config;

        let mut futures = FuturesUnordered::new();
        for (index, submission) in submissions.iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let store = Arc::clone(&self.store);
            let evaluator = Arc::clone(&self.evaluator);

            futures.push(async move {
                let outcome = async {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;
                    progress.on_submission_start(&submission.id, &submission.question_id);
                    grade(store.as_ref(), &evaluator, config, submission).await
                }
                .await;
                (index, submission, outcome)
            });
        }

        let total = futures.len();
        let mut graded = Vec::with_capacity(total);
        let mut failures = Vec::new();

        while let Some((index, submission, outcome)) = futures.next().await {
            match outcome {
                Ok(result) => {
                    progress.on_submission_complete(&result);
                    graded.push((index, result));
                }
                Err(e) => {
                    let kind = FailureKind::classify(&e);
                    tracing::error!(
                        submission = %submission.id,
                        question = %submission.question_id,
                        ?kind,
                        "grading failed: {e:#}"
                    );
                    let failure = FailedSubmission {
                        submission_id: submission.id.clone(),
                        question_id: submission.question_id.clone(),
                        kind,
                        message: format!("{e:#}"),
                    };
                    progress.on_submission_error(&failure);
                    failures.push((index, failure));
                }
            }
        }

        graded.sort_by_key(|(index, _)| *index);
        failures.sort_by_key(|(index, _)| *index);
        let results: Vec<GradedSubmission> = graded.into_iter().map(|(_, r)| r).collect();
        let failures: Vec<FailedSubmission> = failures.into_iter().map(|(_, f)| f).collect();

        let elapsed = start.elapsed();
        progress.on_batch_complete(total, results.len(), failures.len(), elapsed);
        tracing::info!(
            total,
            graded = results.len(),
            failed = failures.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "batch complete"
        );

        let aggregate = compute_aggregate_stats(&results, failures.len());

        Ok(GradingReport {
            id: Uuid::new_v4(),
            created_at: chrono::Utc::now(),
            source: self.store.name().to_string(),
            results,
            failures,
            aggregate,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}

async fn grade(
    store: &dyn QuestionStore,
    evaluator: &Evaluator,
    config: &BatchConfig,
    submission: &Submission,
) -> Result<GradedSubmission> {
    let question = fetch_question(store, &submission.question_id, config)
        .await
        .with_context(|| format!("fetching question '{}'", submission.question_id))?;

    let request = CheckRequest {
        user_answer: Some(submission.answer.clone()),
        reference_answer: Some(question.answer.clone()),
        keywords: Some(question.keywords.clone()),
    };
    let result = evaluator.evaluate_request(&request)?;

    Ok(GradedSubmission {
        submission_id: submission.id.clone(),
        question_id: question.id,
        user: submission.user.clone(),
        role: question.role,
        topic: question.topic,
        result,
    })
}

/// Fetch a question, retrying store failures that are not permanent.
async fn fetch_question(
    store: &dyn QuestionStore,
    id: &str,
    config: &BatchConfig,
) -> Result<Question> {
    let mut attempt = 0;
    loop {
        match store.fetch(id).await {
            Ok(question) => return Ok(question),
            Err(e) => {
                let transient = e
                    .downcast_ref::<StoreError>()
                    .is_some_and(|store_error| !store_error.is_permanent());
                if !transient || attempt >= config.max_retries {
                    return Err(e);
                }
                attempt += 1;
                tracing::warn!(question = id, attempt, "store lookup failed, retrying: {e}");
                tokio::time::sleep(Duration::from_millis(config.retry_delay_ms)).await;
            }
        }
    }
}
