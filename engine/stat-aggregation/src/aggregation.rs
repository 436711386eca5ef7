//! # Grouped Aggregation
//!
//! Collapses player-week rows into one row per player, summing or averaging
//! every numeric column. Only the group key survives from the identity
//! columns.

use crate::error::AggregationError;
use crate::scope::Scope;
use season_store::StatRow;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// How grouped values were combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AggregateKind {
    Sum,
    Mean,
}

/// One player's aggregated statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub player_display_name: String,
    /// Number of player-week rows that were grouped
    pub games: usize,
    pub values: BTreeMap<String, f64>,
}

impl AggregateRow {
    pub fn value(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }
}

/// Totals or averages, one row per player, ordered by player name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateTable {
    kind: AggregateKind,
    scope: Scope,
    rows: Vec<AggregateRow>,
}

impl AggregateTable {
    pub fn kind(&self) -> AggregateKind {
        self.kind
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn rows(&self) -> &[AggregateRow] {
        &self.rows
    }

    /// Row for a player
    pub fn row(&self, player_display_name: &str) -> Option<&AggregateRow> {
        self.rows.iter().find(|row| row.player_display_name == player_display_name)
    }

    pub fn value(&self, player_display_name: &str, column: &str) -> Option<f64> {
        self.row(player_display_name).and_then(|row| row.value(column))
    }

    /// Every numeric column present in at least one row
    pub fn columns(&self) -> BTreeSet<&str> {
        self.rows.iter().flat_map(|row| row.values.keys().map(String::as_str)).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Running sum and count for one column of one group
#[derive(Debug, Default)]
struct ColumnAccumulator {
    sum: f64,
    count: usize,
}

#[derive(Debug, Default)]
struct GroupAccumulator {
    games: usize,
    columns: BTreeMap<String, ColumnAccumulator>,
}

/// Sum every numeric column per player
pub fn group_sum(rows: &[StatRow], scope: Scope) -> Result<AggregateTable, AggregationError> {
    aggregate(rows, scope, AggregateKind::Sum)
}

/// Arithmetic mean of every numeric column per player, over the rows that
/// carry the column
pub fn group_mean(rows: &[StatRow], scope: Scope) -> Result<AggregateTable, AggregationError> {
    aggregate(rows, scope, AggregateKind::Mean)
}

fn aggregate(
    rows: &[StatRow],
    scope: Scope,
    kind: AggregateKind,
) -> Result<AggregateTable, AggregationError> {
    if rows.is_empty() {
        return Err(AggregationError::NoDataForScope(scope));
    }

    let mut groups: BTreeMap<&str, GroupAccumulator> = BTreeMap::new();
    for row in rows {
        let group = groups.entry(row.player_display_name.as_str()).or_default();
        group.games += 1;
        for (column, value) in &row.stats {
            let acc = group.columns.entry(column.clone()).or_default();
            acc.sum += value;
            acc.count += 1;
        }
    }

    let rows: Vec<AggregateRow> = groups
        .into_iter()
        .map(|(name, group)| AggregateRow {
            player_display_name: name.to_string(),
            games: group.games,
            values: group
                .columns
                .into_iter()
                .map(|(column, acc)| {
                    let value = match kind {
                        AggregateKind::Sum => acc.sum,
                        AggregateKind::Mean => acc.sum / acc.count as f64,
                    };
                    (column, value)
                })
                .collect(),
        })
        .collect();

    debug!("Aggregated {:?} for {} into {} rows", kind, scope, rows.len());

    Ok(AggregateTable { kind, scope, rows })
}
