use crate::corpus::Corpus;
use crate::document::{Document, ScoredDocument};
use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// BM25 parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25Params {
    pub k1: f64,
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: 1.5, // Term frequency saturation parameter
            b: 0.75, // Length normalization parameter
        }
    }
}

/// Stateless BM25 scorer
///
/// Document frequencies are recomputed with a corpus scan for every matched
/// query term, so one ranking pass costs O(terms x documents) scans. Fine for
/// per-request corpora of a few thousand resumes.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    params: Bm25Params,
    tokenizer: Tokenizer,
}

impl Scorer {
    pub fn new(params: Bm25Params, tokenizer: Tokenizer) -> Self {
        Self { params, tokenizer }
    }

    pub fn params(&self) -> Bm25Params {
        self.params
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Inverse document frequency, zero for a term no document contains
    pub fn idf(&self, doc_freq: usize, total_docs: usize) -> f64 {
        if doc_freq == 0 {
            return 0.0;
        }
        let df = doc_freq as f64;
        let n = total_docs as f64;
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    /// Saturated, length-normalized term frequency
    pub fn term_weight(&self, tf: usize, doc_length: usize, avg_doc_length: f64) -> f64 {
        let Bm25Params { k1, b } = self.params;
        let tf = tf as f64;
        let length_ratio = doc_length as f64 / avg_doc_length;

        ((k1 + 1.0) * tf) / (k1 * ((1.0 - b) + b * length_ratio) + tf)
    }

    /// Calculate the BM25 score of one document against query term frequencies
    pub fn score(
        &self,
        document: &Document,
        query_terms: &BTreeMap<String, usize>,
        corpus: &Corpus,
    ) -> f64 {
        let doc_terms = self.tokenizer.term_frequencies(document.text());
        let doc_length = self.tokenizer.token_count(document.text());
        let mut score = 0.0;

        for (term, &qf) in query_terms {
            let tf = doc_terms.get(term).copied().unwrap_or(0);

            // Skipping also avoids the df scan for absent terms
            if tf == 0 {
                continue;
            }

            let idf = self.idf(corpus.document_frequency(term), corpus.len());
            let weight = self.term_weight(tf, doc_length, corpus.avg_doc_length());

            score += idf * weight * qf as f64;
        }

        score
    }

    /// Score every document and sort by descending score.
    ///
    /// Ties keep corpus order. The corpus is left untouched.
    pub fn rank(&self, corpus: &Corpus, query: &str) -> Vec<ScoredDocument> {
        if corpus.is_empty() {
            return Vec::new();
        }

        let query_terms = self.tokenizer.term_frequencies(query);

        let mut scored: Vec<ScoredDocument> = corpus
            .documents()
            .iter()
            .map(|doc| ScoredDocument::new(doc, self.score(doc, &query_terms, corpus)))
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::DfMatch;
    use crate::document::Source;

    fn corpus(texts: &[(&str, &str)]) -> Corpus {
        let docs = texts
            .iter()
            .map(|(id, text)| Document::new(id, text, "SALES", Source::Corpus).unwrap())
            .collect();
        Corpus::new(docs, DfMatch::Substring, &Tokenizer::new()).unwrap()
    }

    fn ids(ranked: &[ScoredDocument]) -> Vec<&str> {
        ranked.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_sales_experience_scenario() {
        let scorer = Scorer::default();
        let corpus = corpus(&[
            ("1", "python developer with sales experience"),
            ("2", "sales manager retail experience"),
            ("3", "chef with culinary arts background"),
        ]);

        let ranked = scorer.rank(&corpus, "sales experience");

        // Both match both terms; the shorter document 2 wins on length normalization
        assert_eq!(ids(&ranked), vec!["2", "1", "3"]);
        assert!(ranked[0].score > ranked[1].score);
        assert!(ranked[1].score > 0.0);
        assert_eq!(ranked[2].score, 0.0);

        // df = 2 of N = 3, avgdl = 14 / 3, doc 2 has length 4
        let idf = (1.0f64 + 1.5 / 2.5).ln();
        let weight = 2.5 / (1.5 * (0.25 + 0.75 * 4.0 / (14.0 / 3.0)) + 1.0);
        assert!((ranked[0].score - 2.0 * idf * weight).abs() < 1e-12);
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let scorer = Scorer::default();
        let corpus = corpus(&[
            ("a", "retail sales associate"),
            ("b", "sales sales lead"),
            ("c", "warehouse associate"),
        ]);

        let first = scorer.rank(&corpus, "sales associate");
        let second = scorer.rank(&corpus, "sales associate");
        assert_eq!(first, second);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let scorer = Scorer::default();
        let corpus = corpus(&[
            ("z", "plumber"),
            ("y", "electrician"),
            ("x", "carpenter"),
        ]);

        let ranked = scorer.rank(&corpus, "accountant");
        assert_eq!(ids(&ranked), vec!["z", "y", "x"]);
        assert!(ranked.iter().all(|d| d.score == 0.0));
    }

    #[test]
    fn test_empty_corpus_ranks_nothing() {
        let scorer = Scorer::default();
        let empty = Corpus::new(Vec::new(), DfMatch::Substring, &Tokenizer::new()).unwrap();
        assert!(scorer.rank(&empty, "sales").is_empty());
    }

    #[test]
    fn test_stopwords_do_not_affect_score() {
        let scorer = Scorer::default();
        let corpus = corpus(&[
            ("1", "sales experience"),
            ("2", "marketing lead"),
        ]);

        let plain = scorer.rank(&corpus, "sales");
        let padded = scorer.rank(&corpus, "the sales and of the of with");
        assert_eq!(plain, padded);

        // A query made only of stop-words scores nothing
        let only_stopwords = scorer.rank(&corpus, "and the of");
        assert!(only_stopwords.iter().all(|d| d.score == 0.0));
    }

    #[test]
    fn test_term_weight_is_monotone_in_tf() {
        let scorer = Scorer::default();
        let mut previous = 0.0;
        for tf in 1..20 {
            let weight = scorer.term_weight(tf, 30, 25.0);
            assert!(weight >= previous);
            previous = weight;
        }
    }

    #[test]
    fn test_query_frequency_multiplies_contribution() {
        let scorer = Scorer::default();
        let corpus = corpus(&[("1", "sales experience"), ("2", "chef")]);

        let once = scorer.rank(&corpus, "sales");
        let twice = scorer.rank(&corpus, "sales sales");
        assert!((twice[0].score - 2.0 * once[0].score).abs() < 1e-12);
    }

    #[test]
    fn test_scores_are_non_negative() {
        let scorer = Scorer::new(Bm25Params { k1: 1.2, b: 1.0 }, Tokenizer::new());
        // Every document contains the term, the idf floor still keeps scores positive
        let corpus = corpus(&[
            ("1", "sales"),
            ("2", "sales sales"),
            ("3", "sales manager sales"),
        ]);

        for doc in scorer.rank(&corpus, "sales manager") {
            assert!(doc.score > 0.0);
        }
    }

    #[test]
    fn test_idf_zero_document_frequency() {
        let scorer = Scorer::default();
        assert_eq!(scorer.idf(0, 10), 0.0);
        assert!(scorer.idf(10, 10) > 0.0);
    }
}
