//! In-memory question store backed by parsed question banks.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use prepcheck_core::model::{Question, QuestionBank};
use prepcheck_core::parser::load_banks;
use prepcheck_core::traits::QuestionStore;
use prepcheck_core::StoreError;

/// Serves questions from one or more loaded banks.
///
/// Question ids are global across banks. When two banks define the same id,
/// the first one loaded wins.
#[derive(Debug, Clone)]
pub struct BankStore {
    name: String,
    questions: Vec<Question>,
    index: HashMap<String, usize>,
}

impl BankStore {
    pub fn new(name: impl Into<String>, banks: Vec<QuestionBank>) -> Self {
        let mut questions = Vec::new();
        let mut index = HashMap::new();

        for bank in banks {
            for question in bank.questions {
                if index.contains_key(&question.id) {
                    tracing::warn!(
                        bank = %bank.id,
                        question = %question.id,
                        "duplicate question id, keeping the first definition"
                    );
                    continue;
                }
                index.insert(question.id.clone(), questions.len());
                questions.push(question);
            }
        }

        Self {
            name: name.into(),
            questions,
            index,
        }
    }

    /// Load a bank file or a directory of banks.
    pub fn load(path: &Path) -> Result<Self> {
        let banks = load_banks(path)?;
        tracing::debug!(banks = banks.len(), path = %path.display(), "loaded question banks");
        Ok(Self::new(format!("bank:{}", path.display()), banks))
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Questions matching the given role and topic, case-insensitively.
    /// `None` matches everything.
    pub fn filter(&self, role: Option<&str>, topic: Option<&str>) -> Vec<&Question> {
        let matches = |wanted: Option<&str>, actual: &str| {
            wanted.map_or(true, |w| w.eq_ignore_ascii_case(actual))
        };
        self.questions
            .iter()
            .filter(|q| matches(role, &q.role) && matches(topic, &q.topic))
            .collect()
    }

    /// Distinct roles, in first-seen order.
    pub fn roles(&self) -> Vec<&str> {
        let mut roles: Vec<&str> = Vec::new();
        for q in &self.questions {
            if !q.role.is_empty() && !roles.contains(&q.role.as_str()) {
                roles.push(&q.role);
            }
        }
        roles
    }
}

#[async_trait]
impl QuestionStore for BankStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, id: &str) -> Result<Question> {
        match self.index.get(id) {
            Some(&i) => Ok(self.questions[i].clone()),
            None => {
                tracing::warn!(question = id, "question not found");
                Err(StoreError::NotFound(id.to_string()).into())
            }
        }
    }

    async fn list(&self) -> Result<Vec<Question>> {
        Ok(self.questions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prepcheck_core::model::Difficulty;

    fn question(id: &str, role: &str, topic: &str, answer: &str) -> Question {
        Question {
            id: id.into(),
            role: role.into(),
            topic: topic.into(),
            text: format!("Question {id}?"),
            answer: answer.into(),
            keywords: vec![],
            difficulty: Difficulty::Intermediate,
            estimated_time_secs: None,
        }
    }

    fn bank(id: &str, questions: Vec<Question>) -> QuestionBank {
        QuestionBank {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            questions,
        }
    }

    fn store() -> BankStore {
        BankStore::new(
            "test",
            vec![
                bank(
                    "frontend",
                    vec![
                        question("react-hooks", "Frontend Developer", "React Core", "first"),
                        question("closures", "Frontend Developer", "JavaScript", ""),
                    ],
                ),
                bank(
                    "backend",
                    vec![
                        question("rest", "Backend Developer", "APIs", ""),
                        question("react-hooks", "Backend Developer", "Other", "second"),
                    ],
                ),
            ],
        )
    }

    #[tokio::test]
    async fn fetch_and_list() {
        let store = store();
        assert_eq!(store.name(), "test");
        assert_eq!(store.len(), 3);

        let q = store.fetch("rest").await.unwrap();
        assert_eq!(q.topic, "APIs");

        let all = store.list().await.unwrap();
        let ids: Vec<&str> = all.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["react-hooks", "closures", "rest"]);
    }

    #[tokio::test]
    async fn duplicate_ids_keep_first() {
        let q = store().fetch("react-hooks").await.unwrap();
        assert_eq!(q.answer, "first");
        assert_eq!(q.role, "Frontend Developer");
    }

    #[tokio::test]
    async fn missing_question_is_not_found() {
        let err = store().fetch("nope").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::NotFound(id)) if id == "nope"
        ));
    }

    #[test]
    fn filter_by_role_and_topic() {
        let store = store();
        assert_eq!(store.filter(None, None).len(), 3);
        assert_eq!(store.filter(Some("frontend developer"), None).len(), 2);
        let js = store.filter(Some("Frontend Developer"), Some("javascript"));
        assert_eq!(js.len(), 1);
        assert_eq!(js[0].id, "closures");
        assert!(store.filter(Some("Designer"), None).is_empty());
    }

    #[test]
    fn roles_in_order() {
        assert_eq!(
            store().roles(),
            vec!["Frontend Developer", "Backend Developer"]
        );
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.toml"),
            r#"
[bank]
id = "a"
name = "A"
default_role = "Frontend Developer"

[[questions]]
id = "q1"
topic = "React Core"
text = "What is JSX?"
answer = "JSX is a syntax extension for JavaScript."
keywords = ["syntax extension"]
"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not [valid").unwrap();

        let store = BankStore::load(dir.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.filter(Some("Frontend Developer"), None)[0].id, "q1");
        assert!(store.name().starts_with("bank:"));
    }
}
