//! Season Store
//!
//! Loads weekly NFL player statistics (one row per player-week) from an
//! external provider and memoizes the resulting season tables by season set.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod store;

pub use config::{DataSource, FetcherConfig};
pub use error::{Result, SeasonDataError};
pub use fetcher::{
    parse_weekly_csv, provider_from_config, CsvDirectoryProvider, NflverseFetcher, SeasonProvider,
};
pub use models::{SeasonKey, SeasonTable, StatRow};
pub use store::RawSeasonStore;
