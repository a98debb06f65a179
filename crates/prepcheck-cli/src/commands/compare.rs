//! The `prepcheck compare` command.

use std::path::PathBuf;

use anyhow::Result;

use prepcheck_core::report::{GradingReport, ScoreChange};
use prepcheck_store::config::load_config_from;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: Option<f64>,
    fail_on_regression: bool,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let threshold = match threshold {
        Some(t) => t,
        None => load_config_from(config_path.as_deref())?.regression_threshold,
    };
    anyhow::ensure!(threshold >= 0.0, "threshold must not be negative");

    let baseline = GradingReport::load_json(&baseline_path)?;
    let current = GradingReport::load_json(&current_path)?;

    let report = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!(
                "Comparison: {} regressions, {} improvements, {} unchanged",
                report.regressions.len(),
                report.improvements.len(),
                report.unchanged
            );
            print_changes("Regressions", &report.regressions);
            print_changes("Improvements", &report.improvements);

            if report.new_submissions > 0 {
                println!("\n{} new submission(s)", report.new_submissions);
            }
            if report.removed_submissions > 0 {
                println!("{} removed submission(s)", report.removed_submissions);
            }
        }
    }

    if fail_on_regression && report.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}

fn print_changes(title: &str, changes: &[ScoreChange]) {
    if changes.is_empty() {
        return;
    }
    println!("\n{title}:");
    for c in changes {
        println!(
            "  {} ({}) {}% -> {}% ({:+})",
            c.submission_id, c.question_id, c.baseline_score, c.current_score, c.delta
        );
    }
}
