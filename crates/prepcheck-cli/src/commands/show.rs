//! The `prepcheck show` command.

use std::path::PathBuf;

use anyhow::Result;

use prepcheck_core::traits::QuestionStore;
use prepcheck_store::config::{load_config_from, open_store};

pub async fn execute(question_id: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = open_store(&config)?;
    let question = store.fetch(&question_id).await?;

    println!("[{}] {}", question.id, question.text);
    println!(
        "Role: {}  Topic: {}  Difficulty: {}",
        question.role, question.topic, question.difficulty
    );
    if let Some(secs) = question.estimated_time_secs {
        println!("Suggested time: {secs}s");
    }
    println!();
    println!("Sample answer:");
    println!("{}", question.answer);
    println!();
    println!("Keywords: {}", question.keywords.join(", "));

    Ok(())
}
