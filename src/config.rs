use crate::corpus::DfMatch;
use crate::error::{RankError, Result};
use crate::loader::CategoryFilter;
use crate::ranking::Bm25Params;
use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ranker configuration, usually read from a TOML file
///
/// ```toml
/// k1 = 1.2
/// b = 0.75
/// top_n = 10
/// categories = ["SALES", "HR"]   # or "all"
/// df_match = "substring"         # or "token"
/// stopwords = ["and", "the"]     # replaces the built-in list
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankerConfig {
    pub k1: f64,
    pub b: f64,
    pub top_n: usize,
    pub categories: CategoryFilter,
    pub df_match: DfMatch,
    pub stopwords: Option<Vec<String>>,
}

impl Default for RankerConfig {
    fn default() -> Self {
        let params = Bm25Params::default();
        Self {
            k1: params.k1,
            b: params.b,
            top_n: 10,
            categories: CategoryFilter::All,
            df_match: DfMatch::default(),
            stopwords: None,
        }
    }
}

impl RankerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| RankError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.k1.is_finite() || self.k1 < 0.0 {
            return Err(RankError::Config(format!("k1 must be >= 0, got {}", self.k1)));
        }
        if !self.b.is_finite() || !(0.0..=1.0).contains(&self.b) {
            return Err(RankError::Config(format!("b must be within [0, 1], got {}", self.b)));
        }
        if self.top_n == 0 {
            return Err(RankError::Config("top_n must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn params(&self) -> Bm25Params {
        Bm25Params {
            k1: self.k1,
            b: self.b,
        }
    }

    pub fn tokenizer(&self) -> Tokenizer {
        match &self.stopwords {
            Some(words) => Tokenizer::with_stopwords(words),
            None => Tokenizer::new(),
        }
    }
}
