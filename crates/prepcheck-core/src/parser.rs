//! Question bank and submission file parsing.
//!
//! Loads question banks from TOML files and directories, validates them,
//! and reads submission files for batch grading.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::concepts::ConceptTable;
use crate::keywords::match_keywords;
use crate::model::{Difficulty, Question, QuestionBank, Submission};
use crate::text::{sentences, DiceSimilarity, SnowballStemmer};

/// Intermediate TOML structure for parsing question bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    default_role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    topic: String,
    text: String,
    #[serde(default)]
    answer: String,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    estimated_time_secs: Option<u32>,
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_question_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_question_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank`.
pub fn parse_question_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let default_role = parsed.bank.default_role.unwrap_or_default();

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let difficulty = q
                .difficulty
                .map(|d| d.parse::<Difficulty>().map_err(|e| anyhow::anyhow!("{}: {e}", q.id)))
                .transpose()?
                .unwrap_or_default();

            Ok(Question {
                id: q.id,
                role: q.role.unwrap_or_else(|| default_role.clone()),
                topic: q.topic,
                text: q.text,
                answer: q.answer,
                keywords: q.keywords,
                difficulty,
                estimated_time_secs: q.estimated_time_secs,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        questions,
    })
}

/// Recursively load all `.toml` question banks from a directory.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_question_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// Load a bank file, or every bank under a directory.
pub fn load_banks(path: &Path) -> Result<Vec<QuestionBank>> {
    if path.is_dir() {
        load_bank_directory(path)
    } else {
        Ok(vec![parse_question_bank(path)?])
    }
}

/// A warning from question bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    pub message: String,
}

impl ValidationWarning {
    fn question(id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate a question bank for issues that silently degrade scoring.
pub fn validate_question_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for q in &bank.questions {
        if !seen_ids.insert(&q.id) {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!("duplicate question ID: {}", q.id),
            ));
        }
    }

    let stemmer = SnowballStemmer::english();
    let concepts = ConceptTable::shared();

    for q in &bank.questions {
        if q.text.trim().is_empty() {
            warnings.push(ValidationWarning::question(&q.id, "question text is empty"));
        }

        if q.answer.trim().is_empty() {
            warnings.push(ValidationWarning::question(
                &q.id,
                "sample answer is empty; similarity and coverage will score 0",
            ));
        } else if sentences(&q.answer).is_empty() {
            warnings.push(ValidationWarning::question(
                &q.id,
                "sample answer has no sentence long enough for coverage scoring",
            ));
        }

        if q.keywords.is_empty() {
            warnings.push(ValidationWarning::question(
                &q.id,
                "no keywords; keyword score will be 0",
            ));
        } else if !q.answer.trim().is_empty() {
            // A keyword the sample answer itself misses can never be earned
            // by repeating the sample answer.
            let own = match_keywords(&q.answer, &q.keywords, &stemmer, &DiceSimilarity, &concepts);
            for keyword in &own.missing {
                warnings.push(ValidationWarning::question(
                    &q.id,
                    format!("keyword '{keyword}' is not found in the sample answer"),
                ));
            }
        }
    }

    warnings
}

#[derive(Debug, Deserialize)]
struct TomlSubmissionFile {
    #[serde(default)]
    submissions: Vec<Submission>,
}

/// Load submissions from a JSON array or a TOML file of `[[submissions]]`.
pub fn load_submissions(path: &Path) -> Result<Vec<Submission>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read submissions: {}", path.display()))?;

    if path.extension().is_some_and(|ext| ext == "toml") {
        let parsed: TomlSubmissionFile = toml::from_str(&content)
            .with_context(|| format!("failed to parse TOML: {}", path.display()))?;
        Ok(parsed.submissions)
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[bank]
id = "frontend"
name = "Frontend Developer"
description = "React and CSS questions"
default_role = "Frontend Developer"

[[questions]]
id = "react-hooks"
topic = "React Core"
text = "What are React hooks and why were they introduced?"
answer = """
React hooks were introduced in React 16.8 to allow using state without writing classes. \
Key hooks include useState for state management and useEffect for side effects.
"""
keywords = ["hooks", "useState", "useEffect"]
difficulty = "intermediate"
estimated_time_secs = 120
"#;

    #[test]
    fn parse_valid_toml() {
        let bank = parse_question_bank_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(bank.id, "frontend");
        assert_eq!(bank.questions.len(), 1);
        let q = &bank.questions[0];
        assert_eq!(q.role, "Frontend Developer");
        assert_eq!(q.keywords, vec!["hooks", "useState", "useEffect"]);
        assert_eq!(q.difficulty, Difficulty::Intermediate);
        assert_eq!(q.estimated_time_secs, Some(120));
        assert!(validate_question_bank(&bank).is_empty());
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[bank]
id = "minimal"
name = "Minimal"

[[questions]]
id = "q1"
text = "Explain ownership."
"#;
        let bank = parse_question_bank_str(toml, &PathBuf::from("test.toml")).unwrap();
        let q = &bank.questions[0];
        assert_eq!(q.difficulty, Difficulty::Intermediate);
        assert!(q.answer.is_empty());
        assert!(q.keywords.is_empty());
        assert!(q.role.is_empty());
    }

    #[test]
    fn reject_unknown_difficulty() {
        let toml = r#"
[bank]
id = "bad"
name = "Bad"

[[questions]]
id = "q1"
text = "?"
difficulty = "legendary"
"#;
        let err = parse_question_bank_str(toml, &PathBuf::from("test.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("legendary"));
    }

    #[test]
    fn validate_flags_degraded_questions() {
        let toml = r#"
[bank]
id = "warn"
name = "Warnings"

[[questions]]
id = "same"
text = "First"
answer = "Indexes speed up lookups at the cost of slower writes."
keywords = ["index", "sharding"]

[[questions]]
id = "same"
text = "Second"

[[questions]]
id = "tiny"
text = "Third"
answer = "Yes. No."
keywords = ["yes"]
"#;
        let bank = parse_question_bank_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_question_bank(&bank);
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("duplicate")));
        assert!(messages.iter().any(|m| m.contains("'sharding'")));
        assert!(!messages.iter().any(|m| m.contains("'index'")));
        assert!(messages.iter().any(|m| m.contains("sample answer is empty")));
        assert!(messages.iter().any(|m| m.contains("no keywords")));
        assert!(messages.iter().any(|m| m.contains("no sentence long enough")));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_question_bank_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn load_directory_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not [toml").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(
            nested.join("b.toml"),
            VALID_TOML.replace("id = \"frontend\"", "id = \"frontend-2\""),
        )
        .unwrap();

        let banks = load_bank_directory(dir.path()).unwrap();
        let ids: Vec<&str> = banks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["frontend", "frontend-2"]);
        assert_eq!(load_banks(dir.path()).unwrap().len(), 2);
        assert!(load_bank_directory(&dir.path().join("a.toml")).is_err());
    }

    #[test]
    fn load_json_submissions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subs.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "s1", "question_id": "react-hooks", "user": "ada", "answer": "Hooks manage state."},
                {"id": "s2", "question_id": "react-hooks", "answer": null}
            ]"#,
        )
        .unwrap();
        let subs = load_submissions(&path).unwrap();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].user.as_deref(), Some("ada"));
        assert!(subs[1].answer.is_null());
    }

    #[test]
    fn load_toml_submissions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subs.toml");
        std::fs::write(
            &path,
            r#"
[[submissions]]
id = "s1"
question_id = "react-hooks"
answer = "Hooks manage state."
"#,
        )
        .unwrap();
        let subs = load_submissions(&path).unwrap();
        assert_eq!(subs[0].answer, serde_json::json!("Hooks manage state."));
        assert!(subs[0].user.is_none());
    }
}
