use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Loaded from the persisted resume collection
    Corpus,
    /// Supplied with the ranking request
    Submitted,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Corpus => f.write_str("corpus"),
            Source::Submitted => f.write_str("submitted"),
        }
    }
}

/// Document represents a normalized resume
///
/// Fields are private so a document can only exist in normalized form:
/// non-blank id, non-empty text, uppercased category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    id: String,
    text: String,
    category: String,
    source: Source,
}

impl Document {
    /// Normalize raw fields into a document.
    ///
    /// Returns `None` when the id is blank or the text normalizes to nothing.
    pub fn new(id: &str, raw_text: &str, category: &str, source: Source) -> Option<Self> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }

        let text = normalize_text(raw_text);
        if text.is_empty() {
            return None;
        }

        Some(Self {
            id: id.to_string(),
            text,
            category: normalize_category(category),
            source,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn source(&self) -> Source {
        self.source
    }
}

/// Normalize document or query text.
///
/// Newlines, tabs and commas become spaces, anything outside `[a-zA-Z0-9 ]`
/// is dropped, the result is lowercased and runs of spaces are collapsed.
pub fn normalize_text(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter_map(|c| match c {
            '\n' | '\r' | '\t' | ',' | ' ' => Some(' '),
            c if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase()),
            _ => None,
        })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn normalize_category(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// A document's relevance for one ranking pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDocument {
    pub id: String,
    pub category: String,
    pub source: Source,
    pub score: f64,
}

impl ScoredDocument {
    pub fn new(doc: &Document, score: f64) -> Self {
        Self {
            id: doc.id.clone(),
            category: doc.category.clone(),
            source: doc.source,
            score,
        }
    }
}
