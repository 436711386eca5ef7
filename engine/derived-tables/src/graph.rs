//! # Derived Table Graph
//!
//! Owns the selection and every table derived from it, and decides how much
//! to rebuild when an input changes:
//!
//! - season or format change: reload (memoized), rescore the whole season,
//!   then rebuild every scope
//! - player, position or week change: rebuild only the affected scopes from
//!   the existing points table
//! - an unchanged value: nothing
//!
//! Season rebuilds are transactional. The new table is loaded and scored
//! before anything is replaced, so a failed load leaves the previous
//! selection and tables in place.

use crate::error::{GraphError, Result};
use crate::players::PlayerIndex;
use crate::scope::{PlayerScope, ScopeTables};
use crate::selection::{PlayerSelection, Selection};
use scoring_engine::{FormatRegistry, PointsEngine, PointsTable, ScoringFormat};
use season_store::{RawSeasonStore, SeasonKey, SeasonProvider, SeasonTable};
use serde::Serialize;
use stat_aggregation::{filter_weeks, WeekRange};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lifecycle of the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GraphState {
    /// No points table yet
    Uninitialized,
    /// Points table built, scopes not yet derived
    SeasonLoaded,
    /// Points table built and every scope derived for the current selection
    ScopedReady,
}

/// What a mutation recomputed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Recompute {
    /// Nothing was recomputed
    Skipped,
    /// Only scopes were rebuilt; `failed` ones kept their previous tables
    ScopesOnly { scopes: Vec<usize>, failed: Vec<usize> },
    /// The season was reloaded or rescored, then the scopes rebuilt
    Full { scopes: Vec<usize>, failed: Vec<usize> },
}

impl Recompute {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Recompute::Skipped)
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Recompute::Full { .. })
    }

    /// Scope indices that were re-derived
    pub fn scopes(&self) -> &[usize] {
        match self {
            Recompute::Skipped => &[],
            Recompute::ScopesOnly { scopes, .. } | Recompute::Full { scopes, .. } => scopes,
        }
    }

    /// Scope indices whose rebuild failed
    pub fn failed(&self) -> &[usize] {
        match self {
            Recompute::Skipped => &[],
            Recompute::ScopesOnly { failed, .. } | Recompute::Full { failed, .. } => failed,
        }
    }
}

/// Selection-driven graph of derived tables over one season provider
pub struct DerivedTableGraph<P> {
    store: RawSeasonStore<P>,
    engine: PointsEngine,
    registry: FormatRegistry,
    selection: Selection,
    state: GraphState,
    season: Option<Arc<SeasonTable>>,
    points: Option<Arc<PointsTable>>,
    players: Option<PlayerIndex>,
    scopes: Vec<PlayerScope>,
    scoring_passes: usize,
}

impl<P: SeasonProvider> DerivedTableGraph<P> {
    /// Create an uninitialized graph; nothing is loaded until `initialize`
    pub fn new(
        store: RawSeasonStore<P>,
        engine: PointsEngine,
        registry: FormatRegistry,
        selection: Selection,
    ) -> Self {
        let scopes = selection.players.iter().cloned().map(PlayerScope::new).collect();
        Self {
            store,
            engine,
            registry,
            selection,
            state: GraphState::Uninitialized,
            season: None,
            points: None,
            players: None,
            scopes,
            scoring_passes: 0,
        }
    }

    /// Build every table for the current selection
    pub fn initialize(&mut self) -> Result<Recompute> {
        let season = self.selection.season.clone();
        let format = self.selection.format.clone();
        self.rebuild_season(season, format)
    }

    pub fn set_season(&mut self, season: impl Into<SeasonKey>) -> Result<Recompute> {
        let season = season.into();
        if season == self.selection.season && self.points.is_some() {
            return Ok(Recompute::Skipped);
        }
        let format = self.selection.format.clone();
        self.rebuild_season(season, format)
    }

    /// Switch to a registered scoring format by name
    pub fn set_format(&mut self, name: &str) -> Result<Recompute> {
        if name == self.selection.format && self.points.is_some() {
            return Ok(Recompute::Skipped);
        }
        let season = self.selection.season.clone();
        self.rebuild_season(season, name.to_string())
    }

    /// Change the inclusive week range; a reversed range is swapped
    pub fn set_week_range(&mut self, start: u32, end: u32) -> Result<Recompute> {
        let weeks = WeekRange::new(start, end);
        if weeks == self.selection.week_range {
            return Ok(Recompute::Skipped);
        }

        self.selection.week_range = weeks;
        let indices: Vec<usize> = (0..self.scopes.len()).collect();
        Ok(self.rescope(&indices))
    }

    /// Point scope `index` at another player, taking the position from the
    /// loaded season
    pub fn set_player(&mut self, index: usize, name: &str) -> Result<Recompute> {
        self.check_index(index)?;
        if self.selection.players[index].name == name {
            return Ok(Recompute::Skipped);
        }

        let players = self.players.as_ref().ok_or(GraphError::NotInitialized)?;
        let position = players.position_of(name).ok_or_else(|| GraphError::UnknownPlayer {
            name: name.to_string(),
            seasons: self.selection.season.to_string(),
        })?;
        let position = position.to_string();

        self.set_player_with_position(index, name, &position)
    }

    pub fn set_player_with_position(
        &mut self,
        index: usize,
        name: &str,
        position: &str,
    ) -> Result<Recompute> {
        self.check_index(index)?;
        let player = PlayerSelection::new(name, position);
        if self.selection.players[index] == player {
            return Ok(Recompute::Skipped);
        }

        self.selection.players[index] = player.clone();
        self.scopes[index].set_player(player);
        Ok(self.rescope(&[index]))
    }

    /// Append a scope and derive it
    pub fn add_player(&mut self, name: &str, position: &str) -> Result<Recompute> {
        let player = PlayerSelection::new(name, position);
        self.selection.players.push(player.clone());
        self.scopes.push(PlayerScope::new(player));
        let index = self.scopes.len() - 1;
        Ok(self.rescope(&[index]))
    }

    /// Drop a scope; the remaining scopes shift down and keep their tables
    pub fn remove_player(&mut self, index: usize) -> Result<Recompute> {
        self.check_index(index)?;
        let removed = self.selection.players.remove(index);
        self.scopes.remove(index);
        debug!("Removed scope {} ({})", index, removed.name);
        self.refresh_state();
        Ok(Recompute::Skipped)
    }

    /// Register a custom scoring format for later `set_format` calls
    pub fn register_format(&mut self, format: ScoringFormat) -> Result<()> {
        self.registry.register(format)?;
        Ok(())
    }

    pub fn state(&self) -> GraphState {
        self.state
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    pub fn season_table(&self) -> Option<&SeasonTable> {
        self.season.as_deref()
    }

    /// The full season scored under the selected format
    pub fn points_table(&self) -> Option<&PointsTable> {
        self.points.as_deref()
    }

    /// Distinct players in the loaded season
    pub fn players(&self) -> Option<&PlayerIndex> {
        self.players.as_ref()
    }

    pub fn scope(&self, index: usize) -> Result<&PlayerScope> {
        self.check_index(index)?;
        Ok(&self.scopes[index])
    }

    pub fn scopes(&self) -> &[PlayerScope] {
        &self.scopes
    }

    /// Indices of scopes whose latest rebuild failed
    pub fn failed_scopes(&self) -> Vec<usize> {
        self.scopes
            .iter()
            .enumerate()
            .filter(|(_, scope)| scope.error().is_some())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn store(&self) -> &RawSeasonStore<P> {
        &self.store
    }

    /// Number of times a full season has been scored
    pub fn scoring_passes(&self) -> usize {
        self.scoring_passes
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.scopes.len() {
            return Err(GraphError::ScopeOutOfRange { index, len: self.scopes.len() });
        }
        Ok(())
    }

    fn rebuild_season(&mut self, season: SeasonKey, format_name: String) -> Result<Recompute> {
        let format = self.registry.get(&format_name)?.clone();
        format.validate()?;

        let table = self.store.load(season.clone())?;
        let points = self.engine.points_for_table(&table, &format);
        self.scoring_passes += 1;

        info!(
            "Scored {} player-weeks for season(s) {} under `{}`",
            points.len(),
            season,
            format.name()
        );

        self.players = Some(PlayerIndex::from_rows(table.rows()));
        self.season = Some(table);
        self.points = Some(Arc::new(points));
        self.selection.season = season;
        self.selection.format = format_name;
        self.state = GraphState::SeasonLoaded;

        let indices: Vec<usize> = (0..self.scopes.len()).collect();
        match self.rescope(&indices) {
            Recompute::ScopesOnly { scopes, failed } => Ok(Recompute::Full { scopes, failed }),
            _ => Ok(Recompute::Full { scopes: Vec::new(), failed: Vec::new() }),
        }
    }

    /// Re-derive the given scopes from the current points table. Without a
    /// points table the selection is only recorded.
    fn rescope(&mut self, indices: &[usize]) -> Recompute {
        let Some(points) = self.points.clone() else {
            return Recompute::Skipped;
        };

        let weeks = self.selection.week_range;
        let week_rows = filter_weeks(points.rows(), weeks);

        let mut scopes = Vec::with_capacity(indices.len());
        let mut failed = Vec::new();
        for &index in indices {
            let player = self.selection.players[index].clone();
            match ScopeTables::derive(&week_rows, &player, weeks, &self.engine, points.format()) {
                Ok(tables) => {
                    debug!("Derived scope {} for {} in {}", index, player.name, weeks);
                    self.scopes[index].commit(tables);
                    scopes.push(index);
                }
                Err(err) => {
                    warn!("Scope {} not rebuilt: {}", index, err);
                    self.scopes[index].fail(err);
                    failed.push(index);
                }
            }
        }

        self.refresh_state();
        Recompute::ScopesOnly { scopes, failed }
    }

    /// `ScopedReady` only while every scope holds tables for the current
    /// selection
    fn refresh_state(&mut self) {
        if self.points.is_none() {
            return;
        }
        self.state = if self.scopes.iter().all(PlayerScope::is_current) {
            GraphState::ScopedReady
        } else {
            GraphState::SeasonLoaded
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScopeError;
    use scoring_engine::{WeightKey, POINTS_COLUMN};
    use season_store::StatRow;
    use std::cell::Cell;
    use std::rc::Rc;

    /// In-memory provider that counts fetches
    #[derive(Clone, Default)]
    struct CountingProvider {
        fetches: Rc<Cell<usize>>,
    }

    fn receiver(
        name: &str,
        team: &str,
        season: i32,
        week: u32,
        rec: f64,
        yards: f64,
        tds: f64,
    ) -> StatRow {
        StatRow::new(name, name, "WR", team, season, week)
            .with_stat("receptions", rec)
            .with_stat("receiving_yards", yards)
            .with_stat("receiving_tds", tds)
    }

    impl SeasonProvider for CountingProvider {
        fn fetch_seasons(&self, seasons: &[i32]) -> season_store::Result<Vec<StatRow>> {
            self.fetches.set(self.fetches.get() + 1);
            let mut rows = Vec::new();
            for &season in seasons {
                if season < 2020 {
                    continue;
                }
                rows.extend([
                    receiver("Ja'Marr Chase", "CIN", season, 1, 5.0, 60.0, 1.0),
                    receiver("Ja'Marr Chase", "CIN", season, 2, 10.0, 100.0, 0.0),
                    receiver("Justin Jefferson", "MIN", season, 1, 7.0, 80.0, 0.0),
                    receiver("Justin Jefferson", "MIN", season, 2, 3.0, 20.0, 1.0),
                    StatRow::new("qb", "Joe Burrow", "QB", "CIN", season, 1)
                        .with_stat("passing_yards", 300.0)
                        .with_stat("passing_tds", 3.0),
                ]);
            }
            Ok(rows)
        }
    }

    fn graph_with(selection: Selection) -> (DerivedTableGraph<CountingProvider>, Rc<Cell<usize>>) {
        let provider = CountingProvider::default();
        let fetches = Rc::clone(&provider.fetches);
        let graph = DerivedTableGraph::new(
            RawSeasonStore::new(provider),
            PointsEngine::default(),
            FormatRegistry::new(),
            selection,
        );
        (graph, fetches)
    }

    fn chase_selection() -> Selection {
        Selection::new(2024, "Standard").with_weeks(1, 2).with_player("Ja'Marr Chase", "WR")
    }

    #[test]
    fn test_initialize_builds_everything() {
        let (mut graph, fetches) = graph_with(chase_selection());
        assert_eq!(graph.state(), GraphState::Uninitialized);
        assert!(graph.points_table().is_none());

        let outcome = graph.initialize().unwrap();

        assert_eq!(outcome, Recompute::Full { scopes: vec![0], failed: vec![] });
        assert_eq!(graph.state(), GraphState::ScopedReady);
        assert_eq!(fetches.get(), 1);

        let tables = graph.scope(0).unwrap().tables().unwrap();
        // 12.0 + 10.0 under standard scoring
        assert_eq!(tables.total(POINTS_COLUMN), Some(22.0));
        assert_eq!(tables.average(POINTS_COLUMN), Some(11.0));
        assert_eq!(tables.total_rank(POINTS_COLUMN), Some(1));
        assert_eq!(tables.header.team, "CIN");
        assert_eq!(tables.points_by_category.get(WeightKey::ReceivingYards), Some(16.0));
    }

    #[test]
    fn test_week_change_rescopes_without_rescoring() {
        let (mut graph, fetches) = graph_with(chase_selection());
        graph.initialize().unwrap();
        let before = graph.points_table().unwrap().clone();

        let outcome = graph.set_week_range(2, 2).unwrap();

        assert_eq!(outcome, Recompute::ScopesOnly { scopes: vec![0], failed: vec![] });
        assert_eq!(graph.points_table().unwrap(), &before);
        assert_eq!(graph.scoring_passes(), 1);
        assert_eq!(fetches.get(), 1);
        assert_eq!(graph.scope(0).unwrap().tables().unwrap().total(POINTS_COLUMN), Some(10.0));
    }

    #[test]
    fn test_unchanged_inputs_are_skipped() {
        let (mut graph, fetches) = graph_with(chase_selection());
        graph.initialize().unwrap();

        assert!(graph.set_season(2024).unwrap().is_skipped());
        assert!(graph.set_format("Standard").unwrap().is_skipped());
        assert!(graph.set_week_range(1, 2).unwrap().is_skipped());
        assert!(graph.set_week_range(2, 1).unwrap().is_skipped());
        assert!(graph.set_player(0, "Ja'Marr Chase").unwrap().is_skipped());
        assert_eq!(graph.scoring_passes(), 1);
        assert_eq!(fetches.get(), 1);
    }

    #[test]
    fn test_format_change_rescores_from_cache() {
        let (mut graph, fetches) = graph_with(chase_selection());
        graph.initialize().unwrap();

        let outcome = graph.set_format("PPR").unwrap();

        assert!(outcome.is_full());
        assert_eq!(fetches.get(), 1);
        assert_eq!(graph.scoring_passes(), 2);
        assert_eq!(graph.points_table().unwrap().format().name(), "PPR");
        // 15 receptions on top of the standard 22
        assert_eq!(graph.scope(0).unwrap().tables().unwrap().total(POINTS_COLUMN), Some(37.0));
    }

    #[test]
    fn test_season_change_reloads_and_returns_are_memoized() {
        let (mut graph, fetches) = graph_with(chase_selection());
        graph.initialize().unwrap();

        graph.set_season(2023).unwrap();
        graph.set_season(2024).unwrap();

        assert_eq!(fetches.get(), 2);
        assert_eq!(graph.store().fetch_count(), 2);
        assert_eq!(graph.scoring_passes(), 3);
        assert_eq!(graph.selection().season, SeasonKey::single(2024));
    }

    #[test]
    fn test_empty_week_range_keeps_previous_tables() {
        let (mut graph, _) = graph_with(chase_selection());
        graph.initialize().unwrap();

        let outcome = graph.set_week_range(10, 12).unwrap();

        assert_eq!(outcome, Recompute::ScopesOnly { scopes: vec![], failed: vec![0] });
        assert_eq!(outcome.failed(), &[0]);
        assert_eq!(graph.state(), GraphState::SeasonLoaded);
        let scope = graph.scope(0).unwrap();
        assert_eq!(
            scope.error(),
            Some(&ScopeError::NoDataForPlayer {
                name: "Ja'Marr Chase".into(),
                weeks: WeekRange::new(10, 12)
            })
        );
        assert_eq!(scope.tables().unwrap().weeks, WeekRange::new(1, 2));
        assert_eq!(graph.failed_scopes(), vec![0]);

        graph.set_week_range(1, 1).unwrap();
        assert!(graph.scope(0).unwrap().is_current());
        assert!(graph.failed_scopes().is_empty());
        assert_eq!(graph.state(), GraphState::ScopedReady);
    }

    #[test]
    fn test_failed_scope_blocks_ready_until_removed() {
        let selection = chase_selection().with_player("Nobody Special", "WR");
        let (mut graph, _) = graph_with(selection);

        let outcome = graph.initialize().unwrap();

        assert_eq!(outcome, Recompute::Full { scopes: vec![0], failed: vec![1] });
        assert_eq!(graph.state(), GraphState::SeasonLoaded);

        graph.remove_player(1).unwrap();
        assert_eq!(graph.state(), GraphState::ScopedReady);
    }

    #[test]
    fn test_scopes_are_isolated() {
        let selection = chase_selection().with_player("Justin Jefferson", "WR");
        let (mut graph, _) = graph_with(selection);
        graph.initialize().unwrap();
        let jefferson = graph.scope(1).unwrap().tables().unwrap().clone();

        let outcome = graph.set_player(0, "Joe Burrow").unwrap();

        assert_eq!(outcome, Recompute::ScopesOnly { scopes: vec![0], failed: vec![] });
        assert_eq!(graph.scope(0).unwrap().player().position, "QB");
        assert_eq!(graph.scope(0).unwrap().tables().unwrap().header.name, "Joe Burrow");
        assert_eq!(graph.scope(1).unwrap().tables().unwrap(), &jefferson);
    }

    #[test]
    fn test_add_and_remove_players() {
        let (mut graph, _) = graph_with(chase_selection());
        graph.initialize().unwrap();

        let outcome = graph.add_player("Justin Jefferson", "WR").unwrap();
        assert_eq!(outcome, Recompute::ScopesOnly { scopes: vec![1], failed: vec![] });
        let jefferson = graph.scope(1).unwrap().tables().unwrap();
        assert_eq!(jefferson.total_rank("receiving_yards"), Some(2));

        graph.remove_player(0).unwrap();
        assert_eq!(graph.scopes().len(), 1);
        assert_eq!(graph.selection().players[0].name, "Justin Jefferson");
        assert!(graph.scope(0).unwrap().is_current());
    }

    #[test]
    fn test_bad_inputs() {
        let (mut graph, _) = graph_with(chase_selection());

        // Unknown player before anything is loaded
        assert!(matches!(graph.set_player(0, "Joe Burrow"), Err(GraphError::NotInitialized)));

        graph.initialize().unwrap();

        assert!(matches!(
            graph.scope(3),
            Err(GraphError::ScopeOutOfRange { index: 3, len: 1 })
        ));
        assert!(matches!(
            graph.set_player(0, "Tom Brady"),
            Err(GraphError::UnknownPlayer { .. })
        ));
        assert!(matches!(graph.set_format("Dynasty"), Err(GraphError::Scoring(_))));
        assert_eq!(graph.selection().format, "Standard");
    }

    #[test]
    fn test_failed_season_load_keeps_previous_state() {
        let (mut graph, _) = graph_with(chase_selection());
        graph.initialize().unwrap();

        let err = graph.set_season(1999).unwrap_err();

        assert!(matches!(err, GraphError::NoDataForSeason { ref seasons } if seasons == "1999"));
        assert_eq!(graph.selection().season, SeasonKey::single(2024));
        assert_eq!(graph.state(), GraphState::ScopedReady);
        assert!(graph.scope(0).unwrap().is_current());
    }

    #[test]
    fn test_custom_format_registration() {
        let (mut graph, _) = graph_with(chase_selection());
        graph.initialize().unwrap();

        let half_ppr = ScoringFormat::create("Half PPR", [(WeightKey::Receptions, 0.5)]);
        graph.register_format(half_ppr).unwrap();
        graph.set_format("Half PPR").unwrap();

        assert_eq!(graph.scope(0).unwrap().tables().unwrap().total(POINTS_COLUMN), Some(29.5));
        assert!(graph.register_format(ScoringFormat::ppr()).is_err());
    }

    #[test]
    fn test_week_change_before_initialize_is_recorded() {
        let (mut graph, fetches) = graph_with(chase_selection());

        assert!(graph.set_week_range(2, 2).unwrap().is_skipped());
        assert_eq!(fetches.get(), 0);

        graph.initialize().unwrap();
        assert_eq!(graph.scope(0).unwrap().tables().unwrap().weeks, WeekRange::new(2, 2));
    }
}
