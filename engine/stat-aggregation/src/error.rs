//! Error types for aggregation

use crate::scope::Scope;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregationError {
    /// Filtering left nothing to aggregate
    #[error("No data for {0}")]
    NoDataForScope(Scope),
}
