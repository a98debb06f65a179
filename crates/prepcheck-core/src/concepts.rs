//! Concept groups for synonym-aware keyword matching.
//!
//! A [`ConceptTable`] is read-only once built. The built-in table is created
//! on first use and shared process-wide; callers that need a different table
//! build their own and hand it to the evaluator.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One domain idea and the interchangeable terms that express it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptGroup {
    /// Concept name, used for display and diagnostics.
    pub name: String,
    /// Related terms. A keyword listed here is synonym-matched, and any of
    /// them in an answer signals the concept.
    pub terms: Vec<String>,
}

impl ConceptGroup {
    pub fn new(name: &str, terms: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            terms: terms.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Whether `text` mentions any of this group's terms, ignoring case.
    pub fn mentioned_in(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.terms
            .iter()
            .filter(|t| !t.trim().is_empty())
            .any(|t| text.contains(&t.to_lowercase()))
    }
}

/// An ordered, immutable set of concept groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptTable {
    #[serde(default)]
    groups: Vec<ConceptGroup>,
}

impl ConceptTable {
    pub fn new(groups: Vec<ConceptGroup>) -> Self {
        Self { groups }
    }

    /// The built-in table covering the bundled question bank's topics.
    pub fn builtin() -> Self {
        Self::new(vec![
            ConceptGroup::new(
                "hooks",
                &["hooks", "useState", "useEffect", "useContext", "custom hooks"],
            ),
            ConceptGroup::new(
                "virtual dom",
                &["virtual dom", "vdom", "reconciliation", "diffing"],
            ),
            ConceptGroup::new(
                "state management",
                &["state", "useState", "redux", "context", "stateful"],
            ),
            ConceptGroup::new("components", &["components", "functional", "class", "jsx"]),
            ConceptGroup::new(
                "performance",
                &["performance", "optimization", "memo", "useMemo", "useCallback"],
            ),
            ConceptGroup::new("flexbox", &["flexbox", "flex", "flex container", "flex item"]),
            ConceptGroup::new(
                "css grid",
                &["css grid", "grid", "grid template", "grid area"],
            ),
            ConceptGroup::new(
                "responsive",
                &["responsive", "media queries", "breakpoints", "mobile"],
            ),
            ConceptGroup::new("rest", &["rest", "restful", "http methods", "endpoints"]),
            ConceptGroup::new("graphql", &["graphql", "query", "mutation", "schema"]),
            ConceptGroup::new(
                "rate limiting",
                &["rate limiting", "throttling", "api limits", "429"],
            ),
            ConceptGroup::new("sql", &["sql", "query", "database", "select", "join"]),
            ConceptGroup::new(
                "window functions",
                &["window functions", "over", "partition by", "rank"],
            ),
            ConceptGroup::new(
                "bias variance",
                &["bias", "variance", "overfitting", "underfitting"],
            ),
            ConceptGroup::new(
                "regularization",
                &["regularization", "l1", "l2", "lasso", "ridge"],
            ),
            ConceptGroup::new(
                "cross validation",
                &["cross validation", "k-fold", "train test split"],
            ),
        ])
    }

    /// The process-wide built-in table, initialized once.
    pub fn shared() -> Arc<ConceptTable> {
        static SHARED: OnceLock<Arc<ConceptTable>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(ConceptTable::builtin())))
    }

    /// Parse a table from TOML (`[[groups]]` with `name` and `terms`).
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: ConceptTable =
            toml::from_str(content).context("failed to parse concept table TOML")?;
        for group in &table.groups {
            anyhow::ensure!(
                !group.name.trim().is_empty(),
                "concept group with empty name"
            );
        }
        Ok(table)
    }

    /// Load a table from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read concept table: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid concept table: {}", path.display()))
    }

    /// The first group whose term list contains the lowercased `keyword`.
    ///
    /// Terms are compared as written, so a mixed-case term such as
    /// `useEffect` never registers a keyword. It still counts when
    /// mentioned in an answer.
    pub fn lookup(&self, keyword: &str) -> Option<&ConceptGroup> {
        let wanted = keyword.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.groups
            .iter()
            .find(|g| g.terms.iter().any(|t| *t == wanted))
    }

    pub fn groups(&self) -> &[ConceptGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
