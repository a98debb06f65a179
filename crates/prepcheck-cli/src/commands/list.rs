//! The `prepcheck list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use prepcheck_store::config::{load_config_from, open_store};

pub fn execute(
    role: Option<String>,
    topic: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = open_store(&config)?;

    let questions = store.filter(role.as_deref(), topic.as_deref());
    if questions.is_empty() {
        println!("No questions match.");
        println!("Roles: {}", store.roles().join(", "));
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Role", "Topic", "Difficulty", "Question"]);
    for q in &questions {
        table.add_row(vec![
            Cell::new(&q.id),
            Cell::new(&q.role),
            Cell::new(&q.topic),
            Cell::new(q.difficulty),
            Cell::new(&q.text),
        ]);
    }

    println!("{table}");
    println!("{} question(s)", questions.len());
    Ok(())
}
