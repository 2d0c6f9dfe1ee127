use crate::config::RankerConfig;
use crate::corpus::{Corpus, CorpusStats};
use crate::document::{normalize_text, Document, ScoredDocument, Source};
use crate::error::{RankError, Result};
use crate::loader::{self, CategoryFilter};
use crate::ranking::Scorer;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

pub const DEFAULT_SUBMISSION_ID: &str = "uploaded";
pub const DEFAULT_SUBMISSION_CATEGORY: &str = "UPLOADED";

/// A resume supplied with the ranking request
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: String,
    pub text: String,
    pub category: String,
}

impl Submission {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: DEFAULT_SUBMISSION_ID.to_string(),
            text: text.into(),
            category: DEFAULT_SUBMISSION_CATEGORY.to_string(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    fn into_document(self) -> Result<Document> {
        Document::new(&self.id, &self.text, &self.category, Source::Submitted)
            .ok_or(RankError::EmptySubmission(self.id))
    }
}

/// Ranking request options
#[derive(Debug, Clone, Default)]
pub struct RankRequest {
    pub query: String,
    pub categories: CategoryFilter,
    pub submissions: Vec<Submission>,
    /// Defaults to the first submission
    pub focus: Option<String>,
}

impl RankRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_categories(mut self, categories: CategoryFilter) -> Self {
        self.categories = categories;
        self
    }

    pub fn submit(mut self, submission: Submission) -> Self {
        self.submissions.push(submission);
        self
    }

    pub fn with_focus(mut self, id: impl Into<String>) -> Self {
        self.focus = Some(id.into());
        self
    }
}

/// Rank position of one document, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub rank: usize,
    pub score: f64,
}

/// Result of a ranking pass over a combined corpus
#[derive(Debug, Clone, Serialize)]
pub struct Ranking {
    /// All documents, best first
    pub ranked: Vec<ScoredDocument>,
    /// Submitted documents only, in rank order
    pub submitted: Vec<ScoredDocument>,
    /// Placement of the focus document, `None` when it is not ranked
    pub focus: Option<Placement>,
    pub stats: CorpusStats,
}

impl Ranking {
    fn new(ranked: Vec<ScoredDocument>, focus_id: Option<&str>, stats: CorpusStats) -> Self {
        let submitted = ranked
            .iter()
            .filter(|d| d.source == Source::Submitted)
            .cloned()
            .collect();

        let mut ranking = Self {
            ranked,
            submitted,
            focus: None,
            stats,
        };
        ranking.focus = focus_id.and_then(|id| ranking.submitted_placement(id));
        ranking
    }

    /// First `n` ranked documents
    pub fn top(&self, n: usize) -> &[ScoredDocument] {
        &self.ranked[..n.min(self.ranked.len())]
    }

    /// Placement of any document by id
    pub fn placement(&self, id: &str) -> Option<Placement> {
        self.placement_where(|d| d.id == id)
    }

    fn submitted_placement(&self, id: &str) -> Option<Placement> {
        self.placement_where(|d| d.source == Source::Submitted && d.id == id)
    }

    fn placement_where(&self, pred: impl Fn(&ScoredDocument) -> bool) -> Option<Placement> {
        self.ranked
            .iter()
            .position(pred)
            .map(|index| Placement {
                rank: index + 1,
                score: self.ranked[index].score,
            })
    }
}

/// Outcome of a combined ranking
#[derive(Debug, Clone)]
pub enum RankOutcome {
    Ranked(Ranking),
    /// No persisted document survived category filtering
    NoDocuments,
}

impl RankOutcome {
    pub fn ranking(&self) -> Option<&Ranking> {
        match self {
            RankOutcome::Ranked(ranking) => Some(ranking),
            RankOutcome::NoDocuments => None,
        }
    }
}

/// Ranks persisted resumes together with submitted ones
///
/// Holds only immutable configuration; every call builds its own corpus,
/// so one ranker can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct ResumeRanker {
    config: RankerConfig,
    scorer: Scorer,
}

impl ResumeRanker {
    pub fn new(config: RankerConfig) -> Result<Self> {
        config.validate()?;
        let scorer = Scorer::new(config.params(), config.tokenizer());
        Ok(Self { config, scorer })
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Rank persisted documents and submissions as one corpus.
    ///
    /// Submissions bypass the category filter and are appended after the
    /// persisted documents, so they also shift the corpus statistics.
    pub fn rank_combined(
        &self,
        persisted: Vec<Document>,
        request: RankRequest,
    ) -> Result<RankOutcome> {
        let RankRequest {
            query,
            categories,
            submissions,
            focus,
        } = request;

        let mut documents: Vec<Document> = persisted
            .into_iter()
            .filter(|d| d.source() == Source::Corpus && categories.matches(d.category()))
            .collect();

        if documents.is_empty() {
            tracing::info!("No resumes found for categories: {}", categories);
            return Ok(RankOutcome::NoDocuments);
        }

        let focus = focus.or_else(|| submissions.first().map(|s| s.id.trim().to_string()));
        for submission in submissions {
            documents.push(submission.into_document()?);
        }

        let corpus = Corpus::new(documents, self.config.df_match, self.scorer.tokenizer())?;
        let ranked = self.scorer.rank(&corpus, &normalize_text(&query));
        let ranking = Ranking::new(ranked, focus.as_deref(), corpus.stats());

        tracing::info!(
            "Ranked {} resumes ({} submitted), avg length {:.2}",
            ranking.stats.total_documents,
            ranking.stats.submitted_documents,
            ranking.stats.avg_doc_length
        );
        for doc in ranking.top(self.config.top_n) {
            tracing::debug!("Resume ID: {}, Score: {}", doc.id, doc.score);
        }

        Ok(RankOutcome::Ranked(ranking))
    }

    /// Load persisted resumes from CSV, then rank
    pub fn rank_csv<R: Read>(&self, reader: R, request: RankRequest) -> Result<RankOutcome> {
        let persisted = loader::load_documents(reader, &request.categories, Source::Corpus)?;
        self.rank_combined(persisted, request)
    }

    pub fn rank_csv_path<P: AsRef<Path>>(&self, path: P, request: RankRequest) -> Result<RankOutcome> {
        let persisted = loader::load_documents_from_path(path, &request.categories, Source::Corpus)?;
        self.rank_combined(persisted, request)
    }
}

impl Default for ResumeRanker {
    fn default() -> Self {
        Self {
            config: RankerConfig::default(),
            scorer: Scorer::default(),
        }
    }
}
