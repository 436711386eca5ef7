//! # Derived Tables
//!
//! Turns a user selection (season, scoring format, players, week range) into
//! scored season tables and per-player scopes, rebuilding only what a change
//! invalidates.

pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod kpi;
pub mod logging;
pub mod players;
pub mod scope;
pub mod selection;

pub use config::{CustomFormatConfig, DashboardConfig, LoggingConfig, SelectionDefaults};
pub use error::{GraphError, Result, ScopeError};
pub use graph::{DerivedTableGraph, GraphState, Recompute};
pub use kpi::{kpi_cards, position_kpis, DisplayMode, KpiCard, KpiGroup, KpiSpec};
pub use players::{PlayerIndex, PlayerSummary};
pub use scope::{PlayerHeader, PlayerScope, ScopeTables};
pub use selection::{PlayerSelection, Selection};
