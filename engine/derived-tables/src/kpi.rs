//! Position KPI catalog and the cards built from a scope's tables

use crate::scope::ScopeTables;
use scoring_engine::{round2, POINTS_COLUMN};
use serde::{Deserialize, Serialize};
use DisplayMode::{Average, Both};
use KpiGroup::{Advanced, Opportunity, Production};

/// Which value a KPI headlines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Total by default, average on request
    Both,
    /// Per-game average only
    Average,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KpiGroup {
    Production,
    Opportunity,
    Advanced,
}

/// One stat column shown for a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KpiSpec {
    pub group: KpiGroup,
    pub column: &'static str,
    pub label: &'static str,
    pub mode: DisplayMode,
}

const fn kpi(
    group: KpiGroup,
    column: &'static str,
    label: &'static str,
    mode: DisplayMode,
) -> KpiSpec {
    KpiSpec { group, column, label, mode }
}

const RECEIVER_KPIS: &[KpiSpec] = &[
    kpi(Production, POINTS_COLUMN, "Fantasy Points", Both),
    kpi(Production, "receiving_yards", "Receiving Yards", Both),
    kpi(Production, "targets", "Targets", Both),
    kpi(Production, "receiving_yards_after_catch", "YAC", Both),
    kpi(Production, "receiving_epa", "Receiving EPA", Average),
    kpi(Opportunity, "receiving_tds", "Receiving TDs", Both),
    kpi(Opportunity, "receptions", "Receptions", Both),
    kpi(Opportunity, "target_share", "Target Share", Average),
    kpi(Opportunity, "receiving_air_yards", "Air Yards", Both),
    kpi(Opportunity, "wopr", "WOPR", Average),
];

const RUNNING_BACK_KPIS: &[KpiSpec] = &[
    kpi(Production, POINTS_COLUMN, "Fantasy Points", Both),
    kpi(Production, "rushing_yards", "Rushing Yards", Both),
    kpi(Production, "rushing_tds", "Rushing TDs", Both),
    kpi(Production, "receiving_yards", "Receiving Yards", Both),
    kpi(Production, "receiving_tds", "Receiving TDs", Both),
    kpi(Opportunity, "carries", "Carries", Both),
    kpi(Opportunity, "targets", "Targets", Both),
    kpi(Advanced, "rushing_epa", "Rushing EPA", Average),
];

const QUARTERBACK_KPIS: &[KpiSpec] = &[
    kpi(Production, POINTS_COLUMN, "Fantasy Points", Both),
    kpi(Production, "passing_yards", "Passing Yards", Both),
    kpi(Production, "passing_tds", "Passing TDs", Both),
    kpi(Production, "rushing_yards", "Rushing Yards", Both),
    kpi(Production, "rushing_tds", "Rushing TDs", Both),
    kpi(Opportunity, "attempts", "Attempts", Both),
    kpi(Opportunity, "passing_air_yards", "Air Yards", Both),
    kpi(Opportunity, "carries", "Carries", Both),
    kpi(Advanced, "passing_epa", "Passing EPA", Average),
    kpi(Advanced, "pacr", "PACR", Both),
];

/// KPIs for a position. WR and TE share receiver KPIs; anything that is not
/// a receiver or running back gets the quarterback set.
pub fn position_kpis(position: &str) -> &'static [KpiSpec] {
    match position {
        "WR" | "TE" => RECEIVER_KPIS,
        "RB" => RUNNING_BACK_KPIS,
        _ => QUARTERBACK_KPIS,
    }
}

/// A KPI joined with the player's values and positional ranks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub spec: KpiSpec,
    pub total: f64,
    pub average: f64,
    pub total_rank: Option<u32>,
    pub average_rank: Option<u32>,
}

impl KpiCard {
    /// Value and rank the card leads with
    pub fn headline(&self) -> (f64, Option<u32>) {
        match self.spec.mode {
            DisplayMode::Both => (self.total, self.total_rank),
            DisplayMode::Average => (self.average, self.average_rank),
        }
    }

    /// Top ten at the position on the headline value
    pub fn is_top_ten(&self) -> bool {
        self.headline().1.is_some_and(|rank| rank <= 10)
    }

    pub fn title(&self) -> String {
        match self.spec.mode {
            DisplayMode::Both => format!("Total {}", self.spec.label),
            DisplayMode::Average => format!("Avg {}", self.spec.label),
        }
    }
}

/// Cards for every KPI of `position` the scope has data for, in catalog
/// order. Values are rounded to two decimals.
pub fn kpi_cards(tables: &ScopeTables, position: &str) -> Vec<KpiCard> {
    position_kpis(position)
        .iter()
        .filter_map(|spec| {
            let total = tables.total(spec.column)?;
            let average = tables.average(spec.column)?;
            Some(KpiCard {
                spec: *spec,
                total: round2(total),
                average: round2(average),
                total_rank: tables.total_rank(spec.column),
                average_rank: tables.average_rank(spec.column),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::PlayerSelection;
    use scoring_engine::{PointsEngine, ScoringFormat};
    use season_store::StatRow;
    use stat_aggregation::WeekRange;

    fn back(name: &str, week: u32, yards: f64, epa: f64) -> StatRow {
        StatRow::new(name, name, "RB", "DET", 2024, week)
            .with_stat("rushing_yards", yards)
            .with_stat("rushing_epa", epa)
            .with_stat(POINTS_COLUMN, yards / 10.0)
    }

    fn tables() -> ScopeTables {
        let rows = vec![
            back("Jahmyr Gibbs", 1, 101.0, 0.34),
            back("Jahmyr Gibbs", 2, 49.0, -1.0),
            back("David Montgomery", 1, 80.0, 2.0),
            back("David Montgomery", 2, 90.0, 1.0),
        ];
        ScopeTables::derive(
            &rows,
            &PlayerSelection::new("Jahmyr Gibbs", "RB"),
            WeekRange::new(1, 2),
            &PointsEngine::default(),
            &ScoringFormat::standard(),
        )
        .unwrap()
    }

    #[test]
    fn test_position_kpis() {
        assert_eq!(position_kpis("TE"), position_kpis("WR"));
        assert_eq!(position_kpis("RB")[1].column, "rushing_yards");
        assert_eq!(position_kpis("QB")[1].column, "passing_yards");
        assert_eq!(position_kpis("FB"), position_kpis("QB"));
        assert!(position_kpis("WR").iter().all(|spec| spec.group != KpiGroup::Advanced));
    }

    #[test]
    fn test_cards_skip_missing_columns() {
        let cards = kpi_cards(&tables(), "RB");
        let columns: Vec<&str> = cards.iter().map(|card| card.spec.column).collect();
        assert_eq!(columns, vec![POINTS_COLUMN, "rushing_yards", "rushing_epa"]);
    }

    #[test]
    fn test_card_values_and_headline() {
        let cards = kpi_cards(&tables(), "RB");

        let yards = &cards[1];
        assert_eq!(yards.total, 150.0);
        assert_eq!(yards.average, 75.0);
        assert_eq!(yards.total_rank, Some(2));
        assert_eq!(yards.headline(), (150.0, Some(2)));
        assert_eq!(yards.title(), "Total Rushing Yards");
        assert!(yards.is_top_ten());

        let epa = &cards[2];
        assert_eq!(epa.average, -0.33);
        assert_eq!(epa.headline(), (-0.33, Some(2)));
        assert_eq!(epa.title(), "Avg Rushing EPA");
    }
}
