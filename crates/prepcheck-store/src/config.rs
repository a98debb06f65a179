//! Configuration loading and store factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use prepcheck_core::concepts::ConceptTable;
use prepcheck_core::Evaluator;

use crate::bank::BankStore;

/// Environment variable that overrides `question_bank`.
pub const QUESTION_BANK_ENV: &str = "PREPCHECK_QUESTION_BANK";

/// Top-level prepcheck configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepcheckConfig {
    /// Question bank file, or a directory of bank files.
    #[serde(default = "default_question_bank")]
    pub question_bank: PathBuf,
    /// Custom concept table replacing the built-in one.
    #[serde(default)]
    pub concepts: Option<PathBuf>,
    /// Max concurrent submissions during batch grading.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Max retries after a transient store failure.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay between retries in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Output directory for batch reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Score change, in points, that `compare` treats as significant.
    #[serde(default = "default_regression_threshold")]
    pub regression_threshold: f64,
}

fn default_question_bank() -> PathBuf {
    PathBuf::from("question-banks")
}
fn default_parallelism() -> usize {
    4
}
fn default_retries() -> u32 {
    2
}
fn default_retry_delay() -> u64 {
    200
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./prepcheck-results")
}
fn default_regression_threshold() -> f64 {
    5.0
}

impl Default for PrepcheckConfig {
    fn default() -> Self {
        Self {
            question_bank: default_question_bank(),
            concepts: None,
            parallelism: default_parallelism(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            output_dir: default_output_dir(),
            regression_threshold: default_regression_threshold(),
        }
    }
}

impl PrepcheckConfig {
    /// Apply environment overrides and expand `${VAR}` references in paths.
    fn resolve(mut self, env: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(bank) = env(QUESTION_BANK_ENV).filter(|b| !b.is_empty()) {
            self.question_bank = PathBuf::from(bank);
        }
        let expand = |p: &Path| PathBuf::from(resolve_env_vars(&p.to_string_lossy(), &env));
        self.question_bank = expand(&self.question_bank);
        self.output_dir = expand(&self.output_dir);
        self.concepts = self.concepts.as_deref().map(expand);
        self
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Unset variables expand to nothing.
fn resolve_env_vars(s: &str, env: impl Fn(&str) -> Option<String>) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = env(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
        from = start + value.len();
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `prepcheck.toml` in the current directory
/// 2. `~/.config/prepcheck/config.toml`
///
/// `PREPCHECK_QUESTION_BANK` overrides the bank path.
pub fn load_config() -> Result<PrepcheckConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<PrepcheckConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("prepcheck.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            parse_config(&path)?
        }
        None => PrepcheckConfig::default(),
    };

    Ok(config.resolve(|name| std::env::var(name).ok()))
}

fn parse_config(path: &Path) -> Result<PrepcheckConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<PrepcheckConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("prepcheck"))
}

/// Build the question store named by the configuration.
pub fn open_store(config: &PrepcheckConfig) -> Result<BankStore> {
    BankStore::load(&config.question_bank).with_context(|| {
        format!(
            "failed to open question bank: {}",
            config.question_bank.display()
        )
    })
}

/// The concept table to evaluate with: the configured file, or the built-in table.
pub fn load_concepts(config: &PrepcheckConfig) -> Result<Arc<ConceptTable>> {
    match &config.concepts {
        Some(path) => Ok(Arc::new(ConceptTable::load(path)?)),
        None => Ok(ConceptTable::shared()),
    }
}

/// An evaluator using the configured concept table.
pub fn build_evaluator(config: &PrepcheckConfig) -> Result<Evaluator> {
    Ok(Evaluator::new(load_concepts(config)?))
}
