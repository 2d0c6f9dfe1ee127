use thiserror::Error;

pub type Result<T> = std::result::Result<T, RankError>;

/// Errors raised while loading documents or ranking them.
///
/// An empty corpus after category filtering is not an error; it is reported
/// as [`crate::engine::RankOutcome::NoDocuments`].
#[derive(Debug, Error)]
pub enum RankError {
    /// Malformed input: missing columns, broken CSV, bad encoding.
    #[error("data format error: {0}")]
    DataFormat(String),

    #[error("duplicate document id: {0}")]
    DuplicateId(String),

    /// A submitted document had no text left after normalization.
    #[error("submitted document '{0}' is empty after normalization")]
    EmptySubmission(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RankError {
    /// True when the caller supplied bad input, as opposed to a broken data
    /// source or configuration.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::EmptySubmission(_) | Self::DuplicateId(_))
    }
}

impl From<csv::Error> for RankError {
    fn from(err: csv::Error) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => Self::Io(io),
            _ => Self::DataFormat(message),
        }
    }
}
