use crate::document::{Document, Source};
use crate::error::{RankError, Result};
use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Average length reported by an empty corpus, keeps length normalization
/// free of a zero divisor.
pub const EMPTY_CORPUS_AVG_LENGTH: f64 = 1.0;

/// How a document is counted as containing a term
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DfMatch {
    /// Term occurs anywhere in the normalized text ("manage" hits "management")
    #[default]
    Substring,
    /// Term is one of the document's whitespace tokens
    Token,
}

/// Documents ranked together, in load order
#[derive(Debug, Clone)]
pub struct Corpus {
    documents: Vec<Document>,
    avg_doc_length: f64,
    df_match: DfMatch,
}

impl Corpus {
    /// Build a corpus and compute its average document length.
    ///
    /// Ids must be unique within the corpus.
    pub fn new(documents: Vec<Document>, df_match: DfMatch, tokenizer: &Tokenizer) -> Result<Self> {
        let mut seen = HashSet::new();
        for doc in &documents {
            if !seen.insert(doc.id()) {
                return Err(RankError::DuplicateId(doc.id().to_string()));
            }
        }

        let avg_doc_length = if documents.is_empty() {
            EMPTY_CORPUS_AVG_LENGTH
        } else {
            documents
                .iter()
                .map(|d| tokenizer.token_count(d.text()))
                .sum::<usize>() as f64
                / documents.len() as f64
        };

        Ok(Self {
            documents,
            avg_doc_length,
            df_match,
        })
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn avg_doc_length(&self) -> f64 {
        self.avg_doc_length
    }

    pub fn df_match(&self) -> DfMatch {
        self.df_match
    }

    /// Number of documents containing `term`, by a full scan
    pub fn document_frequency(&self, term: &str) -> usize {
        self.documents
            .iter()
            .filter(|doc| match self.df_match {
                DfMatch::Substring => doc.text().contains(term),
                DfMatch::Token => doc.text().split_whitespace().any(|t| t == term),
            })
            .count()
    }

    pub fn stats(&self) -> CorpusStats {
        CorpusStats {
            total_documents: self.documents.len(),
            submitted_documents: self
                .documents
                .iter()
                .filter(|d| d.source() == Source::Submitted)
                .count(),
            avg_doc_length: self.avg_doc_length,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusStats {
    pub total_documents: usize,
    pub submitted_documents: usize,
    pub avg_doc_length: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, text: &str) -> Document {
        Document::new(id, text, "SALES", Source::Corpus).unwrap()
    }

    #[test]
    fn test_avg_doc_length() -> Result<()> {
        let corpus = Corpus::new(
            vec![doc("1", "sales manager with retail"), doc("2", "chef")],
            DfMatch::Substring,
            &Tokenizer::new(),
        )?;
        // Stop-words count towards length
        assert_eq!(corpus.avg_doc_length(), 2.5);
        Ok(())
    }

    #[test]
    fn test_empty_corpus_sentinel() -> Result<()> {
        let corpus = Corpus::new(Vec::new(), DfMatch::Substring, &Tokenizer::new())?;
        assert!(corpus.is_empty());
        assert_eq!(corpus.avg_doc_length(), EMPTY_CORPUS_AVG_LENGTH);
        assert_eq!(corpus.document_frequency("sales"), 0);
        Ok(())
    }

    #[test]
    fn test_document_frequency_modes() -> Result<()> {
        let docs = vec![doc("1", "project management"), doc("2", "manage a team")];
        let tokenizer = Tokenizer::new();

        let substring = Corpus::new(docs.clone(), DfMatch::Substring, &tokenizer)?;
        assert_eq!(substring.document_frequency("manage"), 2);

        let token = Corpus::new(docs, DfMatch::Token, &tokenizer)?;
        assert_eq!(token.document_frequency("manage"), 1);
        Ok(())
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Corpus::new(
            vec![doc("1", "sales"), doc("1", "retail")],
            DfMatch::Substring,
            &Tokenizer::new(),
        );
        assert!(matches!(result, Err(RankError::DuplicateId(id)) if id == "1"));
    }
}
