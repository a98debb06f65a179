//! The `prepcheck check` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use prepcheck_core::model::{CheckRequest, CheckResponse, EvaluationResult, Question};
use prepcheck_core::traits::QuestionStore;
use prepcheck_store::config::{build_evaluator, load_config_from, open_store};

pub async fn execute(
    question_id: String,
    answer: Option<String>,
    answer_file: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let answer = match (answer, answer_file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read answer from {}", path.display()))?,
        (None, None) => anyhow::bail!("either --answer or --answer-file is required"),
    };

    let config = load_config_from(config_path.as_deref())?;
    let store = open_store(&config)?;
    let evaluator = build_evaluator(&config)?;

    let question = store.fetch(&question_id).await?;
    tracing::debug!(question = %question.id, words = answer.split_whitespace().count(), "grading answer");
    let request = CheckRequest::new(&answer, &question.reference());
    let result = evaluator.evaluate_request(&request)?;

    match format.as_str() {
        "json" => {
            let response = CheckResponse::from(&result);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        _ => print_text(&question, &result),
    }

    Ok(())
}

fn print_text(question: &Question, result: &EvaluationResult) {
    println!("{}", question.text);
    println!();
    println!("Score: {}% ({} confidence)", result.final_score, result.confidence);
    println!("{}", result.summary_feedback);

    if !result.detailed_feedback.is_empty() {
        println!();
        for line in &result.detailed_feedback {
            println!("  - {line}");
        }
    }

    println!();
    println!(
        "Keywords matched: {}/{}",
        result.matched_keywords.len(),
        result.matched_keywords.len() + result.missing_keywords.len()
    );
    if !result.matched_keywords.is_empty() {
        println!("  matched: {}", result.matched_keywords.join(", "));
    }
    if !result.missing_keywords.is_empty() {
        println!("  missing: {}", result.missing_keywords.join(", "));
    }

    let b = &result.breakdown;
    println!(
        "Breakdown: keyword {:.2}, similarity {:.2}, coverage {:.2} ({}/{} sentences), structure {:.2}",
        b.keyword,
        b.similarity,
        b.coverage,
        result.covered_sentences,
        result.total_sentences,
        b.structure
    );
}
