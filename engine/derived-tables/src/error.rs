//! Error types for the derived-table graph

use scoring_engine::ScoringError;
use season_store::SeasonDataError;
use stat_aggregation::{AggregationError, Scope, WeekRange};
use thiserror::Error;

/// Result type alias for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Why one player scope could not be derived. Recorded on the scope; the
/// scope keeps its previous tables.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScopeError {
    #[error("No data for player `{name}` in {weeks}")]
    NoDataForPlayer { name: String, weeks: WeekRange },

    #[error("No data for position `{position}` in {weeks}")]
    NoDataForPosition { position: String, weeks: WeekRange },
}

impl From<AggregationError> for ScopeError {
    fn from(err: AggregationError) -> Self {
        match err {
            AggregationError::NoDataForScope(Scope::Player { name, weeks }) => {
                Self::NoDataForPlayer { name, weeks }
            }
            AggregationError::NoDataForScope(Scope::Position { position, weeks }) => {
                Self::NoDataForPosition { position, weeks }
            }
        }
    }
}

/// Errors returned by [`crate::DerivedTableGraph`] operations
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("No data for season(s) {seasons}")]
    NoDataForSeason { seasons: String },

    #[error("Season data error: {0}")]
    Season(SeasonDataError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("Player `{name}` does not appear in season(s) {seasons}")]
    UnknownPlayer { name: String, seasons: String },

    #[error("Scope index {index} out of range ({len} scopes)")]
    ScopeOutOfRange { index: usize, len: usize },

    #[error("No season is loaded; call initialize first")]
    NotInitialized,
}

impl From<SeasonDataError> for GraphError {
    fn from(err: SeasonDataError) -> Self {
        match err {
            SeasonDataError::NoDataForSeason { seasons } => Self::NoDataForSeason { seasons },
            other => Self::Season(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregation_error_maps_to_scope_error() {
        let weeks = WeekRange::new(1, 2);
        let err: ScopeError =
            AggregationError::NoDataForScope(Scope::player("Bijan Robinson", weeks)).into();
        assert_eq!(err, ScopeError::NoDataForPlayer { name: "Bijan Robinson".into(), weeks });

        let err: ScopeError = AggregationError::NoDataForScope(Scope::position("K", weeks)).into();
        assert_eq!(err.to_string(), "No data for position `K` in weeks 1-2");
    }

    #[test]
    fn test_season_no_data_is_lifted() {
        let err: GraphError = SeasonDataError::NoDataForSeason { seasons: "1990".into() }.into();
        assert!(matches!(err, GraphError::NoDataForSeason { ref seasons } if seasons == "1990"));

        let err: GraphError = SeasonDataError::MissingColumn("week".into()).into();
        assert!(matches!(err, GraphError::Season(_)));
    }
}
