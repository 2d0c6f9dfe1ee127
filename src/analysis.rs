//! Corpus summaries shown alongside a ranking.

use crate::document::{normalize_text, Document};
use crate::tokenizer::Tokenizer;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

/// Most frequent terms per category.
///
/// Terms with equal counts keep the order in which they were first seen.
pub fn relevant_terms_per_category(
    documents: &[Document],
    tokenizer: &Tokenizer,
    top_n: usize,
) -> BTreeMap<String, Vec<TermCount>> {
    // term -> (count, first seen)
    let mut per_category: BTreeMap<&str, HashMap<String, (usize, usize)>> = BTreeMap::new();

    for doc in documents {
        let counts = per_category.entry(doc.category()).or_default();
        for term in tokenizer.terms(doc.text()) {
            let next = counts.len();
            counts.entry(term).or_insert((0, next)).0 += 1;
        }
    }

    per_category
        .into_iter()
        .map(|(category, counts)| {
            let mut terms: Vec<(String, (usize, usize))> = counts.into_iter().collect();
            terms.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
            let top = terms
                .into_iter()
                .take(top_n)
                .map(|(term, (count, _))| TermCount { term, count })
                .collect();
            (category.to_string(), top)
        })
        .collect()
}

/// Query terms a document never mentions, in query order
pub fn missing_terms(query: &str, document_text: &str, tokenizer: &Tokenizer) -> Vec<String> {
    let present: HashSet<&str> = tokenizer.tokens(document_text).collect();
    let mut seen = HashSet::new();

    tokenizer
        .terms(&normalize_text(query))
        .into_iter()
        .filter(|term| !present.contains(term.as_str()))
        .filter(|term| seen.insert(term.clone()))
        .collect()
}
