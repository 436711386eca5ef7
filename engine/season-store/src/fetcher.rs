use crate::config::{DataSource, FetcherConfig};
use crate::error::{Result, SeasonDataError};
use crate::models::StatRow;
use reqwest::blocking::Client;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Source of raw player-week rows. Implementations may be slow (network or
/// disk); callers memoize through [`crate::RawSeasonStore`].
pub trait SeasonProvider {
    /// Fetch every player-week row for the given seasons
    fn fetch_seasons(&self, seasons: &[i32]) -> Result<Vec<StatRow>>;
}

impl<P: SeasonProvider + ?Sized> SeasonProvider for Box<P> {
    fn fetch_seasons(&self, seasons: &[i32]) -> Result<Vec<StatRow>> {
        (**self).fetch_seasons(seasons)
    }
}

/// Columns that identify a row rather than measure it
const IDENTITY_COLUMNS: &[&str] = &[
    "player_id",
    "player_name",
    "player_display_name",
    "position",
    "position_group",
    "headshot_url",
    "recent_team",
    "season",
    "week",
    "season_type",
    "opponent_team",
];

/// Parse nflverse weekly player stats CSV into rows.
///
/// Identity columns are mapped onto [`StatRow`] fields; every other column
/// whose cell parses as a finite number becomes a statistic. Empty, `NA`
/// and non-finite cells are left out of the row.
pub fn parse_weekly_csv<R: Read>(reader: R) -> Result<Vec<StatRow>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let name_idx = column("player_display_name")
        .or_else(|| column("player_name"))
        .ok_or_else(|| SeasonDataError::MissingColumn("player_display_name".to_string()))?;
    let season_idx =
        column("season").ok_or_else(|| SeasonDataError::MissingColumn("season".to_string()))?;
    let week_idx =
        column("week").ok_or_else(|| SeasonDataError::MissingColumn("week".to_string()))?;
    let position_idx = column("position");
    let id_idx = column("player_id");
    let team_idx = column("recent_team").or_else(|| column("team"));
    let season_type_idx = column("season_type");
    let opponent_idx = column("opponent_team");
    let headshot_idx = column("headshot_url");

    let stat_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !IDENTITY_COLUMNS.contains(h) && *h != "team")
        .map(|(i, h)| (i, h.to_string()))
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let text = |idx: Option<usize>| -> Option<String> {
            idx.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|v| !v.is_empty() && *v != "NA")
                .map(str::to_string)
        };

        let season = record
            .get(season_idx)
            .unwrap_or_default()
            .trim()
            .parse::<i32>()
            .map_err(|e| SeasonDataError::invalid_record(line, format!("season: {e}")))?;
        let week = record
            .get(week_idx)
            .unwrap_or_default()
            .trim()
            .parse::<u32>()
            .map_err(|e| SeasonDataError::invalid_record(line, format!("week: {e}")))?;

        let mut stats = BTreeMap::new();
        for (idx, name) in &stat_columns {
            let value = record
                .get(*idx)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite());
            if let Some(value) = value {
                stats.insert(name.clone(), value);
            }
        }

        rows.push(StatRow {
            player_id: text(id_idx).unwrap_or_default(),
            player_display_name: text(Some(name_idx)).unwrap_or_default(),
            position: text(position_idx).unwrap_or_default(),
            recent_team: text(team_idx).unwrap_or_default(),
            season,
            week,
            season_type: text(season_type_idx),
            opponent_team: text(opponent_idx),
            headshot_url: text(headshot_idx),
            stats,
        });
    }

    Ok(rows)
}

/// Fetches nflverse weekly player stats release assets over HTTP
pub struct NflverseFetcher {
    config: FetcherConfig,
    client: Client,
}

impl NflverseFetcher {
    /// Create a new fetcher instance
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }

    /// Fetch one season's weekly stats
    pub fn fetch_season(&self, season: i32) -> Result<Vec<StatRow>> {
        let url = self.config.season_url(season);
        info!("Fetching weekly stats for {} from: {}", season, url);

        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(SeasonDataError::Status { url, status: response.status().as_u16() });
        }

        let body = response.bytes()?;
        let rows = parse_weekly_csv(body.as_ref())?;

        info!("Successfully fetched {} player-week rows for {}", rows.len(), season);
        Ok(rows)
    }
}

impl SeasonProvider for NflverseFetcher {
    fn fetch_seasons(&self, seasons: &[i32]) -> Result<Vec<StatRow>> {
        let mut rows = Vec::new();
        for season in seasons {
            rows.extend(self.fetch_season(*season)?);
        }
        Ok(rows)
    }
}

/// Reads nflverse-format CSV files from a local directory
pub struct CsvDirectoryProvider {
    config: FetcherConfig,
}

impl CsvDirectoryProvider {
    pub fn new(config: FetcherConfig) -> Self {
        Self { config }
    }

    pub fn season_file(&self, season: i32) -> PathBuf {
        self.config.season_file(season)
    }
}

impl SeasonProvider for CsvDirectoryProvider {
    fn fetch_seasons(&self, seasons: &[i32]) -> Result<Vec<StatRow>> {
        let mut rows = Vec::new();
        for season in seasons {
            let path = self.season_file(*season);
            if !path.exists() {
                warn!("No stats file for season {} at {:?}", season, path);
                continue;
            }
            info!("Reading weekly stats for {} from {:?}", season, path);
            let file = File::open(&path)?;
            rows.extend(parse_weekly_csv(file)?);
        }
        Ok(rows)
    }
}

/// Build the provider named by the configuration
pub fn provider_from_config(config: &FetcherConfig) -> Result<Box<dyn SeasonProvider>> {
    match config.source {
        DataSource::Nflverse => Ok(Box::new(NflverseFetcher::new(config.clone())?)),
        DataSource::CsvDir => Ok(Box::new(CsvDirectoryProvider::new(config.clone()))),
    }
}
