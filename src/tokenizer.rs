use std::collections::{BTreeMap, HashSet};

lazy_static::lazy_static! {
    static ref STOPWORDS: HashSet<String> = {
        [
            "and", "to", "the", "of", "in", "with", "for", "a", "is", "on", "at", "by",
            "an", "be", "as", "from",
        ]
        .iter()
        .map(|w| w.to_string())
        .collect()
    };
}

/// Whitespace tokenizer with a fixed stop-word set
///
/// The stop-word set never changes after construction; it is shared by the
/// document side and the query side of scoring.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: HashSet<String>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            stopwords: STOPWORDS.clone(),
        }
    }

    /// Build a tokenizer with a custom stop-word list
    pub fn with_stopwords<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stopwords: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(&token.to_lowercase())
    }

    /// Split text into raw whitespace tokens
    pub fn tokens<'a>(&self, text: &'a str) -> impl Iterator<Item = &'a str> {
        text.split_whitespace()
    }

    /// Document length: token count before stop-word removal
    pub fn token_count(&self, text: &str) -> usize {
        self.tokens(text).count()
    }

    /// Lowercased, stop-word free terms in order of appearance
    pub fn terms(&self, text: &str) -> Vec<String> {
        self.tokens(text)
            .map(|t| t.to_lowercase())
            .filter(|t| !self.stopwords.contains(t))
            .collect()
    }

    /// Count term frequencies, ordered by term so scores sum in a fixed order
    pub fn term_frequencies(&self, text: &str) -> BTreeMap<String, usize> {
        let mut frequencies = BTreeMap::new();
        for term in self.terms(text) {
            *frequencies.entry(term).or_insert(0) += 1;
        }
        frequencies
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
