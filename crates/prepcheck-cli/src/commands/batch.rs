//! The `prepcheck batch` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use comfy_table::{Cell, Table};

use prepcheck_core::engine::{BatchConfig, BatchGrader, ProgressReporter};
use prepcheck_core::parser::load_submissions;
use prepcheck_core::report::GradingReport;
use prepcheck_core::results::{FailedSubmission, GradedSubmission};
use prepcheck_core::statistics::leaderboard;
use prepcheck_store::config::{build_evaluator, load_config_from, open_store};

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_submission_start(&self, _: &str, _: &str) {}

    fn on_submission_complete(&self, graded: &GradedSubmission) {
        eprintln!(
            "  Graded: {} :: {} {}% ({})",
            graded.submission_id,
            graded.question_id,
            graded.result.final_score,
            graded.result.confidence
        );
    }

    fn on_submission_error(&self, failure: &FailedSubmission) {
        eprintln!(
            "  ERROR: {} :: {}: {}",
            failure.submission_id, failure.question_id, failure.message
        );
    }

    fn on_batch_complete(&self, total: usize, graded: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {graded}/{total} graded, {failed} failed ({:.2}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(
    submissions_path: PathBuf,
    output: Option<PathBuf>,
    parallelism: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let parallelism = parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    let submissions = load_submissions(&submissions_path)?;
    let store = Arc::new(open_store(&config)?);
    let evaluator = Arc::new(build_evaluator(&config)?);

    eprintln!(
        "prepcheck v{}: grading {} submissions against {} questions",
        env!("CARGO_PKG_VERSION"),
        submissions.len(),
        store.len()
    );
    eprintln!();

    let batch_config = BatchConfig {
        parallelism,
        max_retries: config.max_retries,
        retry_delay_ms: config.retry_delay_ms,
    };
    let grader = BatchGrader::new(store, evaluator, batch_config);
    let report = grader.run(&submissions, &ConsoleReporter).await?;

    print_summary(&report);

    std::fs::create_dir_all(&output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    let path = output.join(format!("report-{timestamp}.json"));
    report.save_json(&path)?;
    eprintln!("Results saved to: {}", path.display());

    Ok(())
}

fn print_summary(report: &GradingReport) {
    let stats = &report.aggregate;

    let mut questions = Table::new();
    questions.set_header(vec!["Question", "Attempts", "Mean", "Best", "Most missed"]);
    for (id, q) in &stats.per_question {
        let missed: Vec<String> = q
            .most_missed
            .iter()
            .map(|(keyword, count)| format!("{keyword} ({count})"))
            .collect();
        questions.add_row(vec![
            Cell::new(id),
            Cell::new(q.attempts),
            Cell::new(format!("{:.1}%", q.mean_score)),
            Cell::new(format!("{}%", q.best_score)),
            Cell::new(missed.join(", ")),
        ]);
    }
    eprintln!("\n{questions}");

    let ranked = leaderboard(stats);
    if !ranked.is_empty() {
        let mut users = Table::new();
        users.set_header(vec!["#", "User", "Attempts", "Questions", "Mean", "Best"]);
        for (rank, u) in ranked.iter().enumerate() {
            users.add_row(vec![
                Cell::new(rank + 1),
                Cell::new(&u.user),
                Cell::new(u.attempts),
                Cell::new(u.questions_attempted),
                Cell::new(format!("{:.1}%", u.mean_score)),
                Cell::new(format!("{}%", u.best_score)),
            ]);
        }
        eprintln!("{users}");
    }

    println!(
        "Graded {} submissions ({} failed): mean {:.1}%, median {:.1}%, low/medium/high {}/{}/{}",
        stats.graded,
        stats.failed,
        stats.mean_score,
        stats.median_score,
        stats.tiers.low,
        stats.tiers.medium,
        stats.tiers.high
    );
}
