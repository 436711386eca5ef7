//! Scoring Engine
//!
//! Scoring formats (named, complete sets of per-category point weights), the
//! catalog that maps raw stat columns onto scoring categories, and the points
//! engine that turns player-week rows into fantasy points.

pub mod catalog;
pub mod error;
pub mod format;
pub mod points;
pub mod registry;

pub use catalog::StatCatalog;
pub use error::ScoringError;
pub use format::{ScoringFormat, WeightKey, PPR_FORMAT, STANDARD_FORMAT};
pub use points::{round2, PointsByCategory, PointsEngine, PointsTable, POINTS_COLUMN};
pub use registry::FormatRegistry;
