//! Text-analysis strategies and tokenization helpers.
//!
//! The evaluator only talks to [`Stemmer`] and [`Similarity`], so the
//! stemming algorithm and the lexical-similarity measure can be swapped
//! without touching any scorer.

use rust_stemmers::Algorithm;

/// Sentence fragments shorter than this (in characters) are ignored.
pub const MIN_SENTENCE_CHARS: usize = 10;

/// Punctuation that ends a sentence.
pub const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

// ---------------------------------------------------------------------------
// Strategy traits
// ---------------------------------------------------------------------------

/// Reduces a word to a root form so inflections compare equal.
pub trait Stemmer: Send + Sync {
    fn stem(&self, token: &str) -> String;
}

/// Lexical closeness of two strings in `[0, 1]`, independent of meaning.
/// Identical non-empty strings score 1.
pub trait Similarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Porter-style English stemmer (Snowball "english").
pub struct SnowballStemmer {
    inner: rust_stemmers::Stemmer,
}

impl SnowballStemmer {
    pub fn english() -> Self {
        Self {
            inner: rust_stemmers::Stemmer::create(Algorithm::English),
        }
    }
}

impl Default for SnowballStemmer {
    fn default() -> Self {
        Self::english()
    }
}

impl Stemmer for SnowballStemmer {
    fn stem(&self, token: &str) -> String {
        self.inner.stem(token).into_owned()
    }
}

/// Character-bigram Sørensen–Dice coefficient, whitespace ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiceSimilarity;

impl Similarity for DiceSimilarity {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        strsim::sorensen_dice(a, b).clamp(0.0, 1.0)
    }
}

/// Jaro-Winkler similarity; favours shared prefixes, useful for typos.
#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinklerSimilarity;

impl Similarity for JaroWinklerSimilarity {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        strsim::jaro_winkler(a, b).clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Tokenization
// ---------------------------------------------------------------------------

/// Lowercased word tokens, split on anything that is not alphanumeric or `_`.
pub fn word_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Word tokens reduced with `stemmer`.
pub fn stemmed_tokens(text: &str, stemmer: &dyn Stemmer) -> Vec<String> {
    word_tokens(text)
        .iter()
        .map(|t| stemmer.stem(t))
        .collect()
}

/// Number of whitespace-separated words. Blank text has zero words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Whether `text` contains at least one sentence terminator.
pub fn has_terminator(text: &str) -> bool {
    text.contains(SENTENCE_TERMINATORS)
}

/// Trimmed sentences of at least [`MIN_SENTENCE_CHARS`] characters.
pub fn sentences(text: &str) -> Vec<&str> {
    text.split(SENTENCE_TERMINATORS)
        .map(str::trim)
        .filter(|s| s.chars().count() >= MIN_SENTENCE_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stemmer_collapses_inflections() {
        let stemmer = SnowballStemmer::english();
        let root = stemmer.stem("testing");
        assert_eq!(stemmer.stem("tested"), root);
        assert_eq!(stemmer.stem("tests"), root);
        assert_eq!(stemmer.stem("running"), "run");
        assert_eq!(stemmer.stem("hooks"), "hook");
    }

    #[test]
    fn dice_bounds() {
        let dice = DiceSimilarity;
        assert!((dice.similarity("reconciliation", "reconciliation") - 1.0).abs() < 1e-9);
        assert_eq!(dice.similarity("abc", "xyz"), 0.0);
        let partial = dice.similarity("night", "nacht");
        assert!(partial > 0.0 && partial < 1.0, "got {partial}");
    }

    #[test]
    fn dice_ignores_whitespace() {
        let dice = DiceSimilarity;
        assert!((dice.similarity("virtual dom", "virtualdom") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn jaro_winkler_prefers_shared_prefix() {
        let jw = JaroWinklerSimilarity;
        assert!(jw.similarity("useState", "useStat") > jw.similarity("useState", "stateUse"));
        assert!(jw.similarity("", "abc") <= 1.0);
    }

    #[test]
    fn word_tokens_strip_punctuation() {
        assert_eq!(
            word_tokens("React's useState, useEffect!"),
            vec!["react", "s", "usestate", "useeffect"]
        );
        assert!(word_tokens("  ... ").is_empty());
    }

    #[test]
    fn stemmed_tokens_lowercase_first() {
        let stemmer = SnowballStemmer::english();
        assert_eq!(stemmed_tokens("Hooks RUNNING", &stemmer), vec!["hook", "run"]);
    }

    #[test]
    fn word_count_blank_is_zero() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n\t"), 0);
        assert_eq!(word_count("one two  three"), 3);
    }

    #[test]
    fn sentence_split_drops_short_fragments() {
        let text = "Hooks were added in React 16.8 to share logic. Short one! Classes confuse people?";
        assert_eq!(
            sentences(text),
            vec![
                "Hooks were added in React 16",
                "8 to share logic",
                "Classes confuse people"
            ]
        );
        assert!(sentences("").is_empty());
    }

    #[test]
    fn terminators() {
        assert!(has_terminator("done."));
        assert!(has_terminator("really?"));
        assert!(!has_terminator("no punctuation here"));
    }
}
