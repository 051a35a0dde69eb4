//! Stopword filtering and tokenisation.

use lazy_static::lazy_static;
use std::collections::HashSet;

const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "or", "that", "the", "to", "was", "were", "will", "with", "this", "they",
    "but", "have", "had", "what", "when", "where", "who", "which", "why", "how", "all", "each",
    "every", "both", "few", "more", "most", "other", "some", "such", "no", "nor", "not", "only",
    "own", "same", "so", "than", "too", "very", "can", "just", "should", "now", "also", "been",
    "being", "do", "does", "did", "doing", "would", "could", "might", "must", "shall", "about",
    "above", "after", "again", "against", "am", "any", "before", "below", "between", "into",
    "through", "during", "out", "over", "under", "up", "down", "then", "once", "here", "there",
    "if", "else", "while", "because", "until", "we", "you", "your", "our", "their", "him", "her",
    "them", "me", "my", "myself", "itself", "those", "these", "his", "she", "i", "said", "says",
];

lazy_static! {
    static ref ENGLISH: HashSet<String> =
        ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect();
}

/// An immutable set of lower-case words excluded from phrases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// The built-in English list
    pub fn english() -> Self {
        Self {
            words: ENGLISH.clone(),
        }
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// The English list plus `extra`
    pub fn english_with<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stopwords = Self::english();
        stopwords.words.extend(Self::from_words(extra).words);
        stopwords
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::english()
    }
}

/// Lower-case `text`, strip everything but word characters and whitespace,
/// split on whitespace and drop stopwords.
///
/// Word characters are Unicode alphanumerics and `_`.
pub fn tokenize(text: &str, stopwords: &StopWords) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| !stopwords.contains(token))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        let tokens = tokenize("Hello World", &StopWords::english());
        assert_eq!(tokens, vec!["hello", "world"]);
    }

    #[test]
    fn test_tokenize_removes_stop_words() {
        let tokens = tokenize("The quick brown fox", &StopWords::english());
        assert_eq!(tokens, vec!["quick", "brown", "fox"]);
    }

    #[test]
    fn test_tokenize_strips_punctuation_inside_words() {
        let tokens = tokenize("Verstappen's car: re-built!", &StopWords::english());
        assert_eq!(tokens, vec!["verstappens", "car", "rebuilt"]);
    }

    #[test]
    fn test_tokenize_keeps_numbers_and_underscores() {
        let tokens = tokenize("Q3 2024 snake_case", &StopWords::english());
        assert_eq!(tokens, vec!["q3", "2024", "snake_case"]);
    }

    #[test]
    fn test_custom_stopwords() {
        let stopwords = StopWords::english_with(["Reuters", " "]);
        assert!(stopwords.contains("reuters"));
        assert!(stopwords.contains("the"));
        assert_eq!(stopwords.len(), StopWords::english().len() + 1);

        let none = StopWords::from_words(Vec::<String>::new());
        assert!(none.is_empty());
        assert_eq!(tokenize("the end", &none), vec!["the", "end"]);
    }
}
