//! Keyword matching: which reference keywords does an answer mention?
//!
//! A keyword counts as present when a run of stemmed answer tokens is
//! lexically close to the stemmed keyword, or when the keyword is listed in
//! a concept group and the answer mentions one of the group's terms.

use serde::{Deserialize, Serialize};

use crate::concepts::ConceptTable;
use crate::text::{stemmed_tokens, Similarity, Stemmer};

/// Stemmed keyword and answer window must be strictly closer than this.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.8;

/// Partition of the keyword list into matched and missing terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    /// `matched / keywords`, or 0 for an empty keyword list.
    pub score: f64,
}

/// Classify every keyword as matched or missing, preserving list order.
pub fn match_keywords(
    user_answer: &str,
    keywords: &[String],
    stemmer: &dyn Stemmer,
    similarity: &dyn Similarity,
    concepts: &ConceptTable,
) -> KeywordMatch {
    let user_stems = stemmed_tokens(user_answer, stemmer);

    let mut matched = Vec::new();
    let mut missing = Vec::new();

    for keyword in keywords {
        let keyword_stems = stemmed_tokens(keyword, stemmer);
        let fuzzy = fuzzy_match(&user_stems, &keyword_stems, similarity);
        let semantic = concepts
            .lookup(keyword)
            .is_some_and(|group| group.mentioned_in(user_answer));

        if fuzzy || semantic {
            matched.push(keyword.clone());
        } else {
            missing.push(keyword.clone());
        }
    }

    let score = if keywords.is_empty() {
        0.0
    } else {
        matched.len() as f64 / keywords.len() as f64
    };

    KeywordMatch {
        matched,
        missing,
        score,
    }
}

/// Compare the keyword against every window of as many consecutive answer
/// tokens as the keyword has.
fn fuzzy_match(user_stems: &[String], keyword_stems: &[String], similarity: &dyn Similarity) -> bool {
    let width = keyword_stems.len();
    if width == 0 || user_stems.len() < width {
        return false;
    }
    let needle = keyword_stems.join(" ");
    user_stems
        .windows(width)
        .any(|window| similarity.similarity(&window.join(" "), &needle) > FUZZY_MATCH_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{DiceSimilarity, SnowballStemmer};

    fn run(answer: &str, keywords: &[&str]) -> KeywordMatch {
        let keywords: Vec<String> = keywords.iter().map(|k| k.to_string()).collect();
        match_keywords(
            answer,
            &keywords,
            &SnowballStemmer::english(),
            &DiceSimilarity,
            &ConceptTable::builtin(),
        )
    }

    #[test]
    fn react_hooks_answer() {
        let result = run(
            "React hooks like useState let you manage state",
            &["hooks", "useState", "useEffect", "useContext"],
        );
        assert_eq!(result.matched, vec!["hooks", "useState"]);
        assert_eq!(result.missing, vec!["useEffect", "useContext"]);
        assert!((result.score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn inflections_match() {
        let result = run("We tested every branch", &["testing"]);
        assert_eq!(result.matched, vec!["testing"]);
    }

    #[test]
    fn small_typos_match() {
        let result = run("React performs reconcilation of trees", &["reconciliation"]);
        assert_eq!(result.matched, vec!["reconciliation"]);
    }

    #[test]
    fn multi_word_keyword_matches_consecutive_tokens() {
        let result = run(
            "Hooks let you reuse stateful logic across components",
            &["stateful logic", "class hierarchy"],
        );
        assert_eq!(result.matched, vec!["stateful logic"]);
        assert_eq!(result.missing, vec!["class hierarchy"]);
    }

    #[test]
    fn concept_name_matches_through_related_term() {
        let result = run("React runs reconciliation by diffing two trees", &["virtual dom"]);
        assert_eq!(result.matched, vec!["virtual dom"]);
    }

    #[test]
    fn listed_term_matches_through_its_group() {
        let result = run(
            "High variance and underfitting; RESTful http methods",
            &["bias", "endpoints"],
        );
        assert_eq!(result.matched, vec!["bias", "endpoints"]);
        assert!(result.missing.is_empty());
    }

    #[test]
    fn bias_is_matched_by_variance_alone() {
        let result = run("The model has high variance on new data", &["bias"]);
        assert_eq!(result.matched, vec!["bias"]);
    }

    #[test]
    fn mixed_case_term_keyword_gets_no_synonym_credit() {
        // useEffect is a hooks term, but only a close mention earns it.
        let result = run("Custom hooks wrap useState", &["useEffect"]);
        assert_eq!(result.missing, vec!["useEffect"]);
    }

    #[test]
    fn unregistered_absent_keyword_is_missing() {
        let result = run(
            "Containers package an application with its dependencies",
            &["kubernetes"],
        );
        assert!(result.matched.is_empty());
        assert_eq!(result.missing, vec!["kubernetes"]);
    }

    #[test]
    fn empty_keyword_list() {
        let result = run("anything at all", &[]);
        assert!(result.matched.is_empty());
        assert!(result.missing.is_empty());
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn empty_answer_misses_everything() {
        let result = run("", &["hooks", "virtual dom", "redux"]);
        assert!(result.matched.is_empty());
        assert_eq!(result.missing, vec!["hooks", "virtual dom", "redux"]);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn punctuation_only_keyword_never_matches() {
        let result = run("a perfectly normal answer", &["!!!"]);
        assert_eq!(result.missing, vec!["!!!"]);
    }

    #[test]
    fn duplicates_are_classified_per_occurrence() {
        let result = run("hooks everywhere", &["hooks", "hooks", "redux"]);
        assert_eq!(result.matched, vec!["hooks", "hooks"]);
        assert_eq!(result.missing, vec!["redux"]);
    }

    #[test]
    fn partition_is_complete_and_disjoint() {
        let answers = [
            "",
            "SQL joins combine rows; window functions use OVER with PARTITION BY",
            "Regularization like lasso and ridge reduces overfitting",
            "Flexbox is one-dimensional while CSS grid is two-dimensional",
        ];
        let keywords = [
            "sql",
            "window functions",
            "regularization",
            "bias variance",
            "flexbox",
            "css grid",
            "one-dimensional",
            "kubernetes",
        ];
        for answer in answers {
            let result = run(answer, &keywords);
            assert_eq!(result.matched.len() + result.missing.len(), keywords.len());
            for keyword in keywords {
                let in_matched = result.matched.iter().any(|k| k == keyword);
                let in_missing = result.missing.iter().any(|k| k == keyword);
                assert!(in_matched ^ in_missing, "{keyword} in {answer:?}");
            }
        }
    }

    #[test]
    fn custom_concept_table_is_honoured() {
        let table = ConceptTable::new(vec![crate::concepts::ConceptGroup::new(
            "ownership",
            &["ownership", "borrow checker"],
        )]);
        let keywords = vec!["ownership".to_string()];
        let result = match_keywords(
            "the borrow checker enforces aliasing rules",
            &keywords,
            &SnowballStemmer::english(),
            &DiceSimilarity,
            &table,
        );
        assert_eq!(result.matched, vec!["ownership"]);
    }
}
