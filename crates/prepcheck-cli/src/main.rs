//! prepcheck CLI — grade free-text interview answers from the command line.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "prepcheck", version, about = "Heuristic interview answer grader")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade one answer against a stored question
    Check {
        /// Question id
        #[arg(long)]
        question: String,

        /// Answer text
        #[arg(long, conflicts_with = "answer_file", required_unless_present = "answer_file")]
        answer: Option<String>,

        /// Read the answer from a file
        #[arg(long)]
        answer_file: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade a file of submissions and write a report
    Batch {
        /// Submissions file (.json or .toml)
        #[arg(long)]
        submissions: PathBuf,

        /// Output directory (default from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Max concurrent submissions (default from config)
        #[arg(long)]
        parallelism: Option<usize>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question bank TOML files
    Validate {
        /// Bank file or directory (default from config)
        #[arg(long)]
        question_bank: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two batch reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Score change in points treated as significant (default from config)
        #[arg(long)]
        threshold: Option<f64>,

        /// Exit code 1 if regressions found
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List stored questions
    List {
        /// Only questions for this role
        #[arg(long)]
        role: Option<String>,

        /// Only questions on this topic
        #[arg(long)]
        topic: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show a question with its sample answer and keywords
    Show {
        /// Question id
        #[arg(long)]
        question: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example question bank
    Init,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("prepcheck=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            question,
            answer,
            answer_file,
            format,
            config,
        } => commands::check::execute(question, answer, answer_file, format, config).await,
        Commands::Batch {
            submissions,
            output,
            parallelism,
            config,
        } => commands::batch::execute(submissions, output, parallelism, config).await,
        Commands::Validate {
            question_bank,
            config,
        } => commands::validate::execute(question_bank, config),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
            config,
        } => commands::compare::execute(
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
            config,
        ),
        Commands::List {
            role,
            topic,
            config,
        } => commands::list::execute(role, topic, config),
        Commands::Show { question, config } => commands::show::execute(question, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
