//! Error types for season loading

use thiserror::Error;

/// Result type alias for season loading
pub type Result<T> = std::result::Result<T, SeasonDataError>;

/// Errors that can occur while fetching or parsing season data
#[derive(Error, Debug)]
pub enum SeasonDataError {
    /// The provider answered but had no rows for the requested seasons
    #[error("No data for season(s) {seasons}")]
    NoDataForSeason { seasons: String },

    /// An empty season set was requested
    #[error("No seasons requested")]
    NoSeasonsRequested,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A column the row model cannot do without is absent from the source
    #[error("Missing required column `{0}`")]
    MissingColumn(String),

    #[error("Invalid record at line {line}: {message}")]
    InvalidRecord { line: u64, message: String },
}

impl SeasonDataError {
    /// Create a new invalid record error
    pub fn invalid_record(line: u64, msg: impl Into<String>) -> Self {
        Self::InvalidRecord { line, message: msg.into() }
    }
}
