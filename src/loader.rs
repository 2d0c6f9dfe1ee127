use crate::document::{normalize_category, Document, Source};
use crate::error::{RankError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

const REQUIRED_COLUMNS: [&str; 4] = ["ID", "Resume_str", "Resume_html", "Category"];

/// One row of the resume table
#[derive(Debug, Clone, Deserialize)]
pub struct ResumeRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Resume_str")]
    pub resume_str: String,
    // Not used for scoring
    #[serde(rename = "Resume_html")]
    pub resume_html: String,
    #[serde(rename = "Category")]
    pub category: String,
}

impl ResumeRecord {
    pub fn into_document(self, source: Source) -> Option<Document> {
        let text = self.resume_str.replace('"', "");
        Document::new(&self.id, &text, &self.category, source)
    }
}

/// Which categories take part in a ranking
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Uppercased category names
    Only(BTreeSet<String>),
}

impl CategoryFilter {
    pub fn only<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: BTreeSet<String> = categories
            .into_iter()
            .map(|c| normalize_category(c.as_ref()))
            .filter(|c| !c.is_empty())
            .collect();

        if set.is_empty() {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(set)
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(set) => set.contains(&normalize_category(category)),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = RankError;

    /// Parse `"all"` or a comma-separated list such as `"SALES, hr"`
    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        match CategoryFilter::only(s.split(',')) {
            CategoryFilter::All => Err(RankError::Config(format!(
                "no categories given in '{}'",
                s
            ))),
            filter => Ok(filter),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(set) => {
                let names: Vec<&str> = set.iter().map(String::as_str).collect();
                f.write_str(&names.join(", "))
            }
        }
    }
}

impl<'de> Deserialize<'de> for CategoryFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Keyword(String),
            List(Vec<String>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Keyword(s) => s.parse().map_err(serde::de::Error::custom),
            Raw::List(list) => Ok(CategoryFilter::only(list)),
        }
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CategoryFilter::All => serializer.serialize_str("all"),
            CategoryFilter::Only(set) => set.serialize(serializer),
        }
    }
}

/// Read resume records from CSV, failing on missing columns
pub fn read_records<R: Read>(reader: R) -> Result<Vec<ResumeRecord>> {
    let mut reader = csv::Reader::from_reader(reader);

    let headers = reader.headers()?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h.trim() == *col))
        .collect();
    if !missing.is_empty() {
        return Err(RankError::DataFormat(format!(
            "missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    for row in reader.deserialize::<ResumeRecord>() {
        records.push(row?);
    }
    Ok(records)
}

/// Turn records into documents, keeping only the wanted categories.
///
/// Rows with a blank id or no usable text are dropped.
pub fn into_documents(
    records: Vec<ResumeRecord>,
    filter: &CategoryFilter,
    source: Source,
) -> Vec<Document> {
    let total = records.len();
    let mut documents = Vec::new();

    for record in records {
        if !filter.matches(&record.category) {
            continue;
        }
        let id = record.id.clone();
        match record.into_document(source) {
            Some(doc) => documents.push(doc),
            None => tracing::debug!("Dropping row '{}': blank id or empty text", id),
        }
    }

    tracing::info!(
        "Loaded {} of {} resumes for categories: {}",
        documents.len(),
        total,
        filter
    );
    documents
}

/// Load documents from a CSV reader
pub fn load_documents<R: Read>(
    reader: R,
    filter: &CategoryFilter,
    source: Source,
) -> Result<Vec<Document>> {
    let records = read_records(reader)?;
    Ok(into_documents(records, filter, source))
}

/// Load documents from a CSV file
pub fn load_documents_from_path<P: AsRef<Path>>(
    path: P,
    filter: &CategoryFilter,
    source: Source,
) -> Result<Vec<Document>> {
    let file = File::open(path.as_ref())?;
    load_documents(file, filter, source)
}
