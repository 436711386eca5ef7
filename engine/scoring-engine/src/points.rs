use crate::catalog::StatCatalog;
use crate::format::{ScoringFormat, WeightKey};
use season_store::{SeasonKey, SeasonTable, StatRow};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Column that carries computed fantasy points. Kept distinct from the
/// source's own `fantasy_points` columns so those survive untouched.
pub const POINTS_COLUMN: &str = "calc_fantasy_points";

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Season rows with a computed points column under one scoring format
#[derive(Debug, Clone, PartialEq)]
pub struct PointsTable {
    key: SeasonKey,
    format: ScoringFormat,
    rows: Vec<StatRow>,
}

impl PointsTable {
    pub fn key(&self) -> &SeasonKey {
        &self.key
    }

    /// Format the points column was computed under
    pub fn format(&self) -> &ScoringFormat {
        &self.format
    }

    pub fn rows(&self) -> &[StatRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Computed points, in row order
    pub fn points(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|row| row.stat(POINTS_COLUMN).unwrap_or(0.0))
    }
}

/// Per-category contribution to fantasy points
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PointsByCategory(BTreeMap<WeightKey, f64>);

impl PointsByCategory {
    pub fn get(&self, key: WeightKey) -> Option<f64> {
        self.0.get(&key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (WeightKey, f64)> + '_ {
        self.0.iter().map(|(key, value)| (*key, *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum across categories
    pub fn total(&self) -> f64 {
        round2(self.0.values().sum())
    }

    /// Categories with readable names, for breakdown views
    pub fn labeled(&self) -> Vec<(&'static str, f64)> {
        self.iter().map(|(key, value)| (key.label(), value)).collect()
    }
}

/// Computes fantasy points from raw stat rows using a [`StatCatalog`]
#[derive(Debug, Clone, Default)]
pub struct PointsEngine {
    catalog: StatCatalog,
}

impl PointsEngine {
    pub fn new(catalog: StatCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &StatCatalog {
        &self.catalog
    }

    /// Fantasy points for one row, rounded to two decimals. Catalog columns
    /// the row lacks are skipped.
    pub fn points_for_row(&self, row: &StatRow, format: &ScoringFormat) -> f64 {
        let total: f64 = self
            .catalog
            .iter()
            .filter_map(|(column, key)| row.stat(column).map(|value| value * format.weight_of(key)))
            .sum();
        round2(total)
    }

    /// Score every row of a season table in one pass
    pub fn points_for_table(&self, table: &SeasonTable, format: &ScoringFormat) -> PointsTable {
        let weights: Vec<(&str, f64)> =
            self.catalog.iter().map(|(column, key)| (column, format.weight_of(key))).collect();

        let missing: Vec<&str> = weights
            .iter()
            .map(|(column, _)| *column)
            .filter(|column| !table.has_column(column))
            .collect();
        if !missing.is_empty() {
            warn!(
                "Schema drift: {} catalog column(s) absent from season {}: {:?}",
                missing.len(),
                table.key(),
                missing
            );
        }

        let rows: Vec<StatRow> = table
            .rows()
            .iter()
            .map(|row| {
                let total: f64 = weights
                    .iter()
                    .filter_map(|(column, weight)| row.stat(column).map(|value| value * weight))
                    .sum();
                row.clone().with_stat(POINTS_COLUMN, round2(total))
            })
            .collect();

        debug!("Scored {} rows for season {} under {}", rows.len(), table.key(), format.name());

        PointsTable { key: table.key().clone(), format: format.clone(), rows }
    }

    /// Points contributed by each category across `rows`. Categories whose
    /// columns appear in none of the rows are omitted.
    pub fn points_by_category(&self, rows: &[StatRow], format: &ScoringFormat) -> PointsByCategory {
        let mut totals: BTreeMap<WeightKey, f64> = BTreeMap::new();

        for (column, key) in self.catalog.iter() {
            if !rows.iter().any(|row| row.has_stat(column)) {
                continue;
            }
            let weight = format.weight_of(key);
            let contribution: f64 =
                rows.iter().filter_map(|row| row.stat(column)).map(|value| value * weight).sum();
            *totals.entry(key).or_insert(0.0) += contribution;
        }

        PointsByCategory(totals.into_iter().map(|(key, value)| (key, round2(value))).collect())
    }
}
