//! # Player Scopes
//!
//! A scope is one selected player plus the positional context around them.
//! Its tables are derived from the week-filtered points table: the player's
//! own rows, totals, averages and category breakdown, and the totals,
//! averages and dense ranks of everyone at the player's position.

use crate::error::ScopeError;
use crate::selection::PlayerSelection;
use scoring_engine::{PointsByCategory, PointsEngine, ScoringFormat};
use season_store::StatRow;
use serde::Serialize;
use stat_aggregation::{
    dense_rank_desc, filter_player, filter_position, group_mean, group_sum, AggregateRow,
    AggregateTable, RankTable, WeekRange,
};

/// Identity shown above a player's tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerHeader {
    pub name: String,
    pub position: String,
    /// Team on the most recent week in range
    pub team: String,
    pub headshot_url: Option<String>,
}

impl PlayerHeader {
    /// Build from a player's rows; `None` when there are none
    pub fn from_rows(rows: &[StatRow]) -> Option<Self> {
        let latest = rows.iter().max_by_key(|row| (row.season, row.week))?;
        let headshot_url = latest
            .headshot_url
            .clone()
            .or_else(|| rows.iter().find_map(|row| row.headshot_url.clone()));

        Some(Self {
            name: latest.player_display_name.clone(),
            position: latest.position.clone(),
            team: latest.recent_team.clone(),
            headshot_url,
        })
    }
}

/// Every table derived for one player scope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopeTables {
    pub player: PlayerSelection,
    pub weeks: WeekRange,
    pub header: PlayerHeader,
    /// The player's rows inside the week range
    pub player_rows: Vec<StatRow>,
    pub totals: AggregateTable,
    pub averages: AggregateTable,
    pub points_by_category: PointsByCategory,
    pub position_totals: AggregateTable,
    pub position_averages: AggregateTable,
    pub position_total_ranks: RankTable,
    pub position_average_ranks: RankTable,
}

impl ScopeTables {
    /// Derive a scope from rows already restricted to `weeks`
    pub fn derive(
        week_rows: &[StatRow],
        player: &PlayerSelection,
        weeks: WeekRange,
        engine: &PointsEngine,
        format: &ScoringFormat,
    ) -> Result<Self, ScopeError> {
        let player_rows = filter_player(week_rows, &player.name);
        let header = PlayerHeader::from_rows(&player_rows)
            .ok_or_else(|| ScopeError::NoDataForPlayer { name: player.name.clone(), weeks })?;

        let positional_rows = filter_position(week_rows, &player.position);

        let totals = group_sum(&player_rows, player.player_scope(weeks))?;
        let averages = group_mean(&player_rows, player.player_scope(weeks))?;
        let points_by_category = engine.points_by_category(&player_rows, format);

        let position_totals = group_sum(&positional_rows, player.position_scope(weeks))?;
        let position_averages = group_mean(&positional_rows, player.position_scope(weeks))?;
        let position_total_ranks = dense_rank_desc(&position_totals);
        let position_average_ranks = dense_rank_desc(&position_averages);

        Ok(Self {
            player: player.clone(),
            weeks,
            header,
            player_rows,
            totals,
            averages,
            points_by_category,
            position_totals,
            position_averages,
            position_total_ranks,
            position_average_ranks,
        })
    }

    pub fn total_row(&self) -> Option<&AggregateRow> {
        self.totals.row(&self.player.name)
    }

    pub fn average_row(&self) -> Option<&AggregateRow> {
        self.averages.row(&self.player.name)
    }

    pub fn total(&self, column: &str) -> Option<f64> {
        self.totals.value(&self.player.name, column)
    }

    pub fn average(&self, column: &str) -> Option<f64> {
        self.averages.value(&self.player.name, column)
    }

    /// The player's rank at their position by season-to-date total
    pub fn total_rank(&self, column: &str) -> Option<u32> {
        self.position_total_ranks.rank_of(&self.player.name, column)
    }

    /// The player's rank at their position by per-game average
    pub fn average_rank(&self, column: &str) -> Option<u32> {
        self.position_average_ranks.rank_of(&self.player.name, column)
    }

    pub fn games(&self) -> usize {
        self.player_rows.len()
    }
}

/// One slot in the selection: the player, the last tables derived for it
/// and the error from the latest attempt, if it failed
#[derive(Debug, Clone)]
pub struct PlayerScope {
    player: PlayerSelection,
    tables: Option<ScopeTables>,
    error: Option<ScopeError>,
}

impl PlayerScope {
    pub fn new(player: PlayerSelection) -> Self {
        Self { player, tables: None, error: None }
    }

    pub fn player(&self) -> &PlayerSelection {
        &self.player
    }

    /// Latest successfully derived tables. After a failed rebuild these are
    /// the previous tables, which may belong to an earlier selection.
    pub fn tables(&self) -> Option<&ScopeTables> {
        self.tables.as_ref()
    }

    pub fn error(&self) -> Option<&ScopeError> {
        self.error.as_ref()
    }

    /// Tables exist and match the current selection
    pub fn is_current(&self) -> bool {
        self.error.is_none() && self.tables.as_ref().is_some_and(|t| t.player == self.player)
    }

    pub(crate) fn set_player(&mut self, player: PlayerSelection) {
        self.player = player;
    }

    pub(crate) fn commit(&mut self, tables: ScopeTables) {
        self.tables = Some(tables);
        self.error = None;
    }

    pub(crate) fn fail(&mut self, error: ScopeError) {
        self.error = Some(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoring_engine::POINTS_COLUMN;

    fn week(name: &str, position: &str, week: u32, yards: f64, points: f64) -> StatRow {
        StatRow::new(name, name, position, "SF", 2024, week)
            .with_stat("receiving_yards", yards)
            .with_stat(POINTS_COLUMN, points)
    }

    fn rows() -> Vec<StatRow> {
        let mut kittle = week("George Kittle", "TE", 1, 76.0, 7.6);
        kittle.headshot_url = Some("https://static.example/kittle.png".into());
        vec![
            kittle,
            week("George Kittle", "TE", 2, 40.0, 10.0),
            week("Trey McBride", "TE", 1, 30.0, 3.0),
            week("Trey McBride", "TE", 2, 100.0, 10.0),
            week("Deebo Samuel", "WR", 1, 10.0, 1.0),
        ]
    }

    #[test]
    fn test_derive_scope() {
        let player = PlayerSelection::new("George Kittle", "TE");
        let tables = ScopeTables::derive(
            &rows(),
            &player,
            WeekRange::new(1, 2),
            &PointsEngine::default(),
            &ScoringFormat::standard(),
        )
        .unwrap();

        assert_eq!(tables.games(), 2);
        assert_eq!(tables.total("receiving_yards"), Some(116.0));
        assert_eq!(tables.average("receiving_yards"), Some(58.0));
        assert_eq!(tables.total_rank("receiving_yards"), Some(2));
        assert_eq!(tables.average_rank("receiving_yards"), Some(2));
        assert_eq!(tables.total_rank(POINTS_COLUMN), Some(1));
        assert_eq!(tables.position_totals.len(), 2);
        assert_eq!(
            tables.points_by_category.get(scoring_engine::WeightKey::ReceivingYards),
            Some(11.6)
        );
        assert_eq!(
            tables.header.headshot_url.as_deref(),
            Some("https://static.example/kittle.png")
        );
    }

    #[test]
    fn test_missing_player_and_position() {
        let engine = PointsEngine::default();
        let format = ScoringFormat::standard();
        let weeks = WeekRange::new(1, 2);

        let nobody = PlayerSelection::new("Nobody", "TE");
        let err = ScopeTables::derive(&rows(), &nobody, weeks, &engine, &format).unwrap_err();
        assert_eq!(err, ScopeError::NoDataForPlayer { name: "Nobody".into(), weeks });

        let err = ScopeTables::derive(
            &rows(),
            &PlayerSelection::new("George Kittle", "K"),
            weeks,
            &engine,
            &format,
        )
        .unwrap_err();
        assert_eq!(err, ScopeError::NoDataForPosition { position: "K".into(), weeks });
    }

    #[test]
    fn test_header_uses_latest_team() {
        let mut rows = rows();
        rows[1].recent_team = "KC".into();
        let header = PlayerHeader::from_rows(&rows[..2]).unwrap();
        assert_eq!(header.team, "KC");
        assert!(PlayerHeader::from_rows(&[]).is_none());
    }

    #[test]
    fn test_failed_rebuild_keeps_previous_tables() {
        let player = PlayerSelection::new("George Kittle", "TE");
        let tables = ScopeTables::derive(
            &rows(),
            &player,
            WeekRange::new(1, 2),
            &PointsEngine::default(),
            &ScoringFormat::standard(),
        )
        .unwrap();

        let mut scope = PlayerScope::new(player);
        scope.commit(tables);
        assert!(scope.is_current());

        scope.fail(ScopeError::NoDataForPlayer {
            name: "George Kittle".into(),
            weeks: WeekRange::new(9, 9),
        });
        assert!(!scope.is_current());
        assert!(scope.tables().is_some());
        assert!(scope.error().is_some());
    }
}
