use crate::aggregation::{AggregateKind, AggregateTable};
use crate::scope::Scope;
use serde::Serialize;
use std::collections::BTreeMap;

/// One player's rank in every column of an aggregate table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankRow {
    pub player_display_name: String,
    pub ranks: BTreeMap<String, u32>,
}

/// Dense descending ranks per column of an [`AggregateTable`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankTable {
    kind: AggregateKind,
    scope: Scope,
    rows: Vec<RankRow>,
}

impl RankTable {
    /// Kind of the aggregate the ranks were computed from
    pub fn kind(&self) -> AggregateKind {
        self.kind
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn rows(&self) -> &[RankRow] {
        &self.rows
    }

    pub fn row(&self, player_display_name: &str) -> Option<&RankRow> {
        self.rows.iter().find(|row| row.player_display_name == player_display_name)
    }

    pub fn rank_of(&self, player_display_name: &str, column: &str) -> Option<u32> {
        self.row(player_display_name).and_then(|row| row.ranks.get(column).copied())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rank every numeric column independently, largest value first.
///
/// Dense ranking: equal values share a rank and the next distinct value
/// takes the next integer, so `[10, 10, 7, 5]` ranks as `[1, 1, 2, 3]`.
/// Rows without a value for a column (or with NaN) get no rank for it.
pub fn dense_rank_desc(table: &AggregateTable) -> RankTable {
    let mut rows: Vec<RankRow> = table
        .rows()
        .iter()
        .map(|row| RankRow {
            player_display_name: row.player_display_name.clone(),
            ranks: BTreeMap::new(),
        })
        .collect();

    for column in table.columns() {
        let mut distinct: Vec<f64> = table
            .rows()
            .iter()
            .filter_map(|row| row.value(column))
            .filter(|value| !value.is_nan())
            .collect();
        distinct.sort_by(|a, b| b.total_cmp(a));
        distinct.dedup();

        for (source, ranked) in table.rows().iter().zip(rows.iter_mut()) {
            let Some(value) = source.value(column).filter(|v| !v.is_nan()) else {
                continue;
            };
            let rank = distinct.partition_point(|d| *d > value) + 1;
            ranked.ranks.insert(column.to_string(), rank as u32);
        }
    }

    RankTable { kind: table.kind(), scope: table.scope().clone(), rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::group_sum;
    use crate::scope::WeekRange;
    use season_store::StatRow;

    fn totals(values: &[(&str, f64)]) -> AggregateTable {
        let rows: Vec<StatRow> = values
            .iter()
            .map(|(name, yards)| {
                StatRow::new(*name, *name, "WR", "FA", 2024, 1).with_stat("receiving_yards", *yards)
            })
            .collect();
        group_sum(&rows, Scope::position("WR", WeekRange::default())).unwrap()
    }

    #[test]
    fn test_dense_rank_ties_leave_no_gap() {
        let table = totals(&[("A", 10.0), ("B", 10.0), ("C", 7.0), ("D", 5.0)]);
        let ranks = dense_rank_desc(&table);

        let got: Vec<u32> = ["A", "B", "C", "D"]
            .iter()
            .map(|name| ranks.rank_of(name, "receiving_yards").unwrap())
            .collect();
        assert_eq!(got, vec![1, 1, 2, 3]);
    }

    #[test]
    fn test_columns_ranked_independently() {
        let rows = vec![
            StatRow::new("1", "Puka Nacua", "WR", "LA", 2024, 1)
                .with_stat("receiving_yards", 110.0)
                .with_stat("receptions", 4.0),
            StatRow::new("2", "Cooper Kupp", "WR", "LA", 2024, 1)
                .with_stat("receiving_yards", 37.0)
                .with_stat("receptions", 14.0),
            StatRow::new("3", "Demarcus Robinson", "WR", "LA", 2024, 1)
                .with_stat("receiving_yards", 2.0),
        ];
        let table = group_sum(&rows, Scope::position("WR", WeekRange::default())).unwrap();
        let ranks = dense_rank_desc(&table);

        assert_eq!(ranks.rank_of("Puka Nacua", "receiving_yards"), Some(1));
        assert_eq!(ranks.rank_of("Puka Nacua", "receptions"), Some(2));
        assert_eq!(ranks.rank_of("Cooper Kupp", "receptions"), Some(1));
        assert_eq!(ranks.rank_of("Demarcus Robinson", "receiving_yards"), Some(3));
        // No value, no rank
        assert_eq!(ranks.rank_of("Demarcus Robinson", "receptions"), None);
        assert_eq!(ranks.len(), 3);
    }

    #[test]
    fn test_negative_values_rank_below_zero() {
        let table = totals(&[("A", -3.0), ("B", 0.0), ("C", 0.0)]);
        let ranks = dense_rank_desc(&table);
        assert_eq!(ranks.rank_of("B", "receiving_yards"), Some(1));
        assert_eq!(ranks.rank_of("C", "receiving_yards"), Some(1));
        assert_eq!(ranks.rank_of("A", "receiving_yards"), Some(2));
    }
}
