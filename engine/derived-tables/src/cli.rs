//! # Command Line Interface
//!
//! `season-report`: scores a season and prints totals, averages, positional
//! ranks and KPIs for the selected players.

use crate::config::DashboardConfig;
use crate::graph::DerivedTableGraph;
use crate::kpi::{kpi_cards, KpiCard, KpiGroup};
use crate::logging::initialize_logging;
use crate::scope::{PlayerHeader, PlayerScope};
use crate::selection::{PlayerSelection, Selection};
use anyhow::{Context, Result};
use clap::Parser;
use scoring_engine::{round2, PointsEngine, POINTS_COLUMN};
use season_store::{provider_from_config, RawSeasonStore, SeasonKey, SeasonProvider};
use serde::Serialize;
use stat_aggregation::WeekRange;
use std::fmt;
use std::path::PathBuf;
use tracing::info;

/// Season report for selected players
#[derive(Parser, Debug)]
#[command(name = "season-report")]
#[command(about = "Fantasy points, totals, averages and positional ranks for NFL players")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Season to load; repeat for a multi-season table
    #[arg(short, long)]
    pub season: Vec<i32>,

    /// Scoring format name
    #[arg(short, long)]
    pub format: Option<String>,

    /// Player display name; repeat to compare players
    #[arg(short, long)]
    pub player: Vec<String>,

    /// Inclusive week range, e.g. 1-8
    #[arg(short, long, value_parser = parse_week_range)]
    pub weeks: Option<WeekRange>,

    /// List the available scoring formats and exit
    #[arg(long)]
    pub list_formats: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Overlay command-line choices on the configured selection. Players
    /// given here replace the configured ones.
    pub fn apply(&self, mut selection: Selection) -> Selection {
        if !self.season.is_empty() {
            selection.season = SeasonKey::new(self.season.iter().copied());
        }
        if let Some(format) = &self.format {
            selection.format = format.clone();
        }
        if let Some(weeks) = self.weeks {
            selection.week_range = weeks;
        }
        if !self.player.is_empty() {
            selection.players.clear();
        }
        selection
    }
}

/// Parse `START-END` (or a single week) into a [`WeekRange`]
pub fn parse_week_range(value: &str) -> Result<WeekRange, String> {
    let parse = |s: &str| {
        s.trim().parse::<u32>().map_err(|_| format!("invalid week `{}`", s.trim()))
    };
    match value.split_once('-') {
        Some((start, end)) => Ok(WeekRange::new(parse(start)?, parse(end)?)),
        None => {
            let week = parse(value)?;
            Ok(WeekRange::new(week, week))
        }
    }
}

/// Run the report
pub fn run(cli: Cli) -> Result<()> {
    let config = DashboardConfig::load(cli.config.as_deref())?;
    initialize_logging(&config.logging)?;

    let registry = config.build_registry().context("Invalid scoring formats")?;
    if cli.list_formats {
        for format in registry.list() {
            println!("{}\n", format.to_markdown());
        }
        return Ok(());
    }

    let selection = cli.apply(config.initial_selection());
    info!("Building season report for season(s) {} under `{}`", selection.season, selection.format);

    let provider = provider_from_config(&config.fetcher)?;
    let mut graph = DerivedTableGraph::new(
        RawSeasonStore::new(provider),
        PointsEngine::default(),
        registry,
        selection,
    );
    graph.initialize().context("Failed to build season tables")?;

    for name in &cli.player {
        let position = resolve_position(&graph, name)?;
        graph.add_player(name, &position)?;
    }

    let reports: Vec<ScopeReport> = graph.scopes().iter().map(ScopeReport::from_scope).collect();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("{}", report);
        }
    }

    Ok(())
}

fn resolve_position<P: SeasonProvider>(graph: &DerivedTableGraph<P>, name: &str) -> Result<String> {
    let players = graph.players().context("No season loaded")?;
    if let Some(position) = players.position_of(name) {
        return Ok(position.to_string());
    }

    let suggestions: Vec<&str> =
        players.search(name).into_iter().take(5).map(|p| p.name.as_str()).collect();
    if suggestions.is_empty() {
        anyhow::bail!("Player `{}` not found in season(s) {}", name, graph.selection().season);
    }
    anyhow::bail!(
        "Player `{}` not found in season(s) {}; did you mean: {}",
        name,
        graph.selection().season,
        suggestions.join(", ")
    )
}

/// Printable summary of one scope
#[derive(Debug, Serialize)]
pub struct ScopeReport<'a> {
    pub player: &'a PlayerSelection,
    pub header: Option<&'a PlayerHeader>,
    pub weeks: Option<WeekRange>,
    pub games: usize,
    pub fantasy_points: Option<f64>,
    pub points_by_category: Vec<(&'static str, f64)>,
    pub kpis: Vec<KpiCard>,
    pub error: Option<String>,
}

impl<'a> ScopeReport<'a> {
    pub fn from_scope(scope: &'a PlayerScope) -> Self {
        let tables = scope.tables();
        Self {
            player: scope.player(),
            header: tables.map(|t| &t.header),
            weeks: tables.map(|t| t.weeks),
            games: tables.map_or(0, |t| t.games()),
            fantasy_points: tables.and_then(|t| t.total(POINTS_COLUMN)).map(round2),
            points_by_category: tables.map(|t| t.points_by_category.labeled()).unwrap_or_default(),
            kpis: tables.map(|t| kpi_cards(t, &scope.player().position)).unwrap_or_default(),
            error: scope.error().map(|err| err.to_string()),
        }
    }
}

impl fmt::Display for ScopeReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.header {
            Some(header) => writeln!(f, "{} ({}, {})", header.name, header.position, header.team)?,
            None => writeln!(f, "{} ({})", self.player.name, self.player.position)?,
        }
        if let Some(error) = &self.error {
            writeln!(f, "  ! {}", error)?;
        }
        let Some(weeks) = self.weeks else {
            return Ok(());
        };

        writeln!(f, "  {}, {} games", weeks, self.games)?;
        if let Some(points) = self.fantasy_points {
            writeln!(f, "  Fantasy points: {:.2}", points)?;
        }
        if !self.points_by_category.is_empty() {
            writeln!(f, "  Points by category:")?;
            for (label, points) in &self.points_by_category {
                writeln!(f, "    {:<22} {:>8.2}", label, points)?;
            }
        }

        for group in [KpiGroup::Production, KpiGroup::Opportunity, KpiGroup::Advanced] {
            let cards: Vec<&KpiCard> =
                self.kpis.iter().filter(|card| card.spec.group == group).collect();
            if cards.is_empty() {
                continue;
            }
            writeln!(f, "  {:?}", group)?;
            for card in cards {
                let (value, rank) = card.headline();
                let rank = rank.map_or_else(|| "-".to_string(), |r| format!("#{}", r));
                let marker = if card.is_top_ten() { " *" } else { "" };
                writeln!(f, "    {:<28} {:>10.2}  {}{}", card.title(), value, rank, marker)?;
            }
        }
        Ok(())
    }
}
