//! Grading report types with JSON persistence and regression detection.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::results::{FailedSubmission, GradedSubmission};
use crate::statistics::AggregateStats;

/// A complete batch grading report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Name of the question store the questions came from.
    pub source: String,
    /// Graded submissions, in input order.
    pub results: Vec<GradedSubmission>,
    /// Submissions that could not be graded.
    #[serde(default)]
    pub failures: Vec<FailedSubmission>,
    pub aggregate: AggregateStats,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl GradingReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GradingReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this report against a baseline, submission by submission.
    ///
    /// `threshold` is in score points; changes within it count as unchanged.
    pub fn compare(&self, baseline: &GradingReport, threshold: f64) -> RegressionReport {
        let score_map = |report: &GradingReport| -> HashMap<String, (String, u8)> {
            report
                .results
                .iter()
                .map(|r| {
                    (
                        r.submission_id.clone(),
                        (r.question_id.clone(), r.result.final_score),
                    )
                })
                .collect()
        };

        let baseline_scores = score_map(baseline);
        let current_scores = score_map(self);

        let mut regressions = Vec::new();
        let mut improvements = Vec::new();
        let mut unchanged = 0usize;
        let mut new_submissions = 0usize;

        let mut ids: Vec<&String> = current_scores.keys().collect();
        ids.sort();

        for id in ids {
            let (question_id, current) = &current_scores[id];
            let Some((_, baseline_score)) = baseline_scores.get(id) else {
                new_submissions += 1;
                continue;
            };
            let delta = *current as i32 - *baseline_score as i32;
            let change = ScoreChange {
                submission_id: id.clone(),
                question_id: question_id.clone(),
                baseline_score: *baseline_score,
                current_score: *current,
                delta,
            };
            if (delta as f64) < -threshold {
                regressions.push(change);
            } else if (delta as f64) > threshold {
                improvements.push(change);
            } else {
                unchanged += 1;
            }
        }

        let removed_submissions = baseline_scores
            .keys()
            .filter(|k| !current_scores.contains_key(*k))
            .count();

        RegressionReport {
            regressions,
            improvements,
            unchanged,
            new_submissions,
            removed_submissions,
        }
    }
}

/// Result of comparing two reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionReport {
    /// Submissions whose score went down.
    pub regressions: Vec<ScoreChange>,
    /// Submissions whose score went up.
    pub improvements: Vec<ScoreChange>,
    pub unchanged: usize,
    /// Submissions in current but not baseline.
    pub new_submissions: usize,
    /// Submissions in baseline but not current.
    pub removed_submissions: usize,
}

/// A score change for one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreChange {
    pub submission_id: String,
    pub question_id: String,
    pub baseline_score: u8,
    pub current_score: u8,
    pub delta: i32,
}

impl RegressionReport {
    /// Format the regression report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} regressions, {} improvements, {} unchanged\n\n",
            self.regressions.len(),
            self.improvements.len(),
            self.unchanged
        ));

        for (title, changes) in [
            ("Regressions", &self.regressions),
            ("Improvements", &self.improvements),
        ] {
            if changes.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Submission | Question | Baseline | Current | Delta |\n");
            md.push_str("|------------|----------|----------|---------|-------|\n");
            for c in changes {
                md.push_str(&format!(
                    "| {} | {} | {}% | {}% | {:+} |\n",
                    c.submission_id, c.question_id, c.baseline_score, c.current_score, c.delta
                ));
            }
            md.push('\n');
        }

        md
    }

    /// Returns true if there are any regressions.
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }
}
