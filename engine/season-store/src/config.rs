use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where weekly player stats come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// nflverse release assets over HTTP
    Nflverse,
    /// nflverse-format CSV files in a local directory
    CsvDir,
}

/// Configuration for the season data providers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Which provider to build
    pub source: DataSource,

    /// URL template for one season's weekly stats; `{season}` is replaced
    pub stats_url_template: String,

    /// Directory holding per-season CSV files (for `csv_dir`)
    pub data_dir: PathBuf,

    /// File name template inside `data_dir`; `{season}` is replaced
    pub file_pattern: String,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent with HTTP requests
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Nflverse,
            stats_url_template:
                "https://github.com/nflverse/nflverse-data/releases/download/player_stats/player_stats_{season}.csv"
                    .to_string(),
            data_dir: PathBuf::from("./data/player_stats"),
            file_pattern: "player_stats_{season}.csv".to_string(),
            timeout_secs: 60,
            user_agent: "fantasy-dashboard/0.1".to_string(),
        }
    }
}

impl FetcherConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(source) = std::env::var("FANTASY_DATA_SOURCE") {
            config.source = match source.as_str() {
                "nflverse" => DataSource::Nflverse,
                "csv_dir" => DataSource::CsvDir,
                other => anyhow::bail!("Unknown FANTASY_DATA_SOURCE `{other}`"),
            };
        }

        if let Ok(dir) = std::env::var("FANTASY_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Ok(url) = std::env::var("FANTASY_STATS_URL") {
            config.stats_url_template = url;
        }

        if let Ok(timeout) = std::env::var("FANTASY_HTTP_TIMEOUT_SECS") {
            config.timeout_secs = timeout.parse().unwrap_or(60);
        }

        Ok(config)
    }

    /// URL for one season's weekly stats
    pub fn season_url(&self, season: i32) -> String {
        self.stats_url_template.replace("{season}", &season.to_string())
    }

    /// Local path for one season's weekly stats
    pub fn season_file(&self, season: i32) -> PathBuf {
        self.data_dir.join(self.file_pattern.replace("{season}", &season.to_string()))
    }
}
