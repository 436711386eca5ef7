//! Error types for scoring formats

use crate::format::WeightKey;
use thiserror::Error;

/// Errors raised while building, validating or looking up scoring formats
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("Scoring format `{name}` is missing weights for: {}", join_keys(.missing))]
    IncompleteScoringFormat { name: String, missing: Vec<WeightKey> },

    #[error("Unknown scoring weight `{0}`")]
    UnknownWeightKey(String),

    #[error("Scoring format `{name}` has a non-finite weight for {key}")]
    InvalidWeight { name: String, key: WeightKey },

    #[error("Scoring format `{0}` is already registered")]
    DuplicateFormat(String),

    #[error("Scoring format `{0}` is not registered")]
    UnknownFormat(String),
}

fn join_keys(keys: &[WeightKey]) -> String {
    keys.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
}
