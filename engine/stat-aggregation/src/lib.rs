//! # Stat Aggregation
//!
//! Grouped totals and averages per player, dense descending ranks per stat
//! column, and the week/player/position filters that define a scope.

pub mod aggregation;
pub mod error;
pub mod filter;
pub mod rank;
pub mod scope;

pub use aggregation::{group_mean, group_sum, AggregateKind, AggregateRow, AggregateTable};
pub use error::AggregationError;
pub use filter::{filter_player, filter_position, filter_weeks};
pub use rank::{dense_rank_desc, RankRow, RankTable};
pub use scope::{Scope, WeekRange};
