//! The `prepcheck init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("prepcheck.toml").exists() {
        println!("prepcheck.toml already exists, skipping.");
    } else {
        std::fs::write("prepcheck.toml", SAMPLE_CONFIG)?;
        println!("Created prepcheck.toml");
    }

    std::fs::create_dir_all("question-banks")?;
    let example_path = Path::new("question-banks/example.toml");
    if example_path.exists() {
        println!("question-banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created question-banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: prepcheck validate");
    println!("  2. Run: prepcheck show --question closures");
    println!("  3. Run: prepcheck check --question closures --answer \"...\"");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# prepcheck configuration

# Question bank file, or a directory of bank files.
question_bank = "question-banks"

# Optional concept table replacing the built-in synonym groups.
# concepts = "concepts.toml"

parallelism = 4

# Retries after a transient question-store failure.
max_retries = 2
retry_delay_ms = 200

output_dir = "./prepcheck-results"

# Score change, in points, that `prepcheck compare` reports.
regression_threshold = 5.0
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Question Bank"
description = "A small bank to get started"
default_role = "Frontend Developer"

[[questions]]
id = "closures"
topic = "JavaScript"
text = "What is a closure in JavaScript?"
answer = """
A closure is a function bundled together with references to its surrounding lexical environment. \
It lets an inner function access variables from an outer function scope even after the outer function has returned. \
Closures are commonly used for data privacy, factory functions, and callbacks that need to remember state."""
keywords = ["closure", "lexical environment", "scope", "inner function", "data privacy"]
difficulty = "intermediate"
estimated_time_secs = 90

[[questions]]
id = "event-loop"
topic = "JavaScript"
text = "Explain the JavaScript event loop."
answer = """
The event loop lets single-threaded JavaScript handle asynchronous work. \
Synchronous code runs on the call stack, while callbacks wait in the task queue. \
When the stack is empty, the event loop moves the next callback onto it, and microtasks such as promise callbacks run before the next task."""
keywords = ["event loop", "call stack", "task queue", "microtasks", "asynchronous"]
difficulty = "intermediate"
estimated_time_secs = 120
"#;
