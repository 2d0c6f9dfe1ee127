// Re-export main components
pub mod analysis;
pub mod api;
pub mod config;
pub mod corpus;
pub mod document;
pub mod engine;
pub mod error;
pub mod loader;
pub mod ranking;
pub mod tokenizer;

// Re-export commonly used types
pub use config::RankerConfig;
pub use corpus::{Corpus, DfMatch};
pub use document::{Document, ScoredDocument, Source};
pub use engine::{Placement, RankOutcome, RankRequest, Ranking, ResumeRanker, Submission};
pub use error::{RankError, Result};
pub use loader::CategoryFilter;
pub use ranking::{Bm25Params, Scorer};
pub use tokenizer::Tokenizer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_workflow() -> Result<()> {
        let ranker = ResumeRanker::default();

        let resumes = vec![
            Document::new("1", "Retail sales manager", "SALES", Source::Corpus),
            Document::new("2", "Pastry chef", "CHEF", Source::Corpus),
        ]
        .into_iter()
        .flatten()
        .collect();

        let request = RankRequest::new("sales manager").submit(Submission::new("Sales intern"));
        let outcome = ranker.rank_combined(resumes, request)?;

        let ranking = outcome.ranking().expect("corpus is not empty");
        assert_eq!(ranking.ranked.len(), 3);
        assert_eq!(ranking.ranked[0].id, "1");
        assert_eq!(ranking.focus.map(|p| p.rank), Some(2));

        Ok(())
    }
}
