//! Dashboard configuration management

use crate::selection::{PlayerSelection, Selection};
use anyhow::{Context, Result};
use scoring_engine::{FormatRegistry, ScoringError, ScoringFormat};
use season_store::{FetcherConfig, SeasonKey};
use serde::{Deserialize, Serialize};
use stat_aggregation::WeekRange;
use std::collections::BTreeMap;
use std::path::Path;

/// Main dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DashboardConfig {
    /// Season data provider configuration
    pub fetcher: FetcherConfig,

    /// Initial selection
    pub selection: SelectionDefaults,

    /// Custom scoring formats registered next to Standard and PPR
    pub scoring_formats: Vec<CustomFormatConfig>,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// What a session starts with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionDefaults {
    pub seasons: Vec<i32>,
    pub format: String,
    pub week_start: u32,
    pub week_end: u32,
    pub players: Vec<PlayerSelection>,
}

/// A custom scoring format keyed by snake_case weight names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFormatConfig {
    pub name: String,
    pub weights: BTreeMap<String, f64>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` wins when set
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for SelectionDefaults {
    fn default() -> Self {
        let weeks = WeekRange::default();
        Self {
            seasons: vec![2024],
            format: scoring_engine::STANDARD_FORMAT.to_string(),
            week_start: weeks.start(),
            week_end: weeks.end(),
            players: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "compact".to_string() }
    }
}

impl DashboardConfig {
    /// Load configuration: defaults, then an optional TOML file, then
    /// `DASHBOARD__SECTION__KEY` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;

        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            tracing::debug!("Loading configuration from file: {:?}", path);
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix("DASHBOARD").separator("__").try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Defaults with the fetcher taken from `FANTASY_*` environment variables
    pub fn from_env() -> Result<Self> {
        let config = Self { fetcher: FetcherConfig::from_env()?, ..Self::default() };
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as TOML
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.selection.seasons.is_empty() {
            return Err(anyhow::anyhow!("At least one season must be selected"));
        }

        if self.fetcher.timeout_secs == 0 {
            return Err(anyhow::anyhow!("Fetcher timeout must be greater than 0"));
        }

        if !matches!(self.logging.format.as_str(), "json" | "pretty" | "compact") {
            return Err(anyhow::anyhow!("Unknown log format: {}", self.logging.format));
        }

        for format in &self.scoring_formats {
            format.build().with_context(|| format!("Invalid scoring format `{}`", format.name))?;
        }

        let registry = self.build_registry()?;
        if !registry.contains(&self.selection.format) {
            return Err(anyhow::anyhow!(
                "Selected scoring format `{}` is not defined",
                self.selection.format
            ));
        }

        Ok(())
    }

    /// Registry with the built-in formats plus every configured one
    pub fn build_registry(&self) -> Result<FormatRegistry, ScoringError> {
        let mut registry = FormatRegistry::new();
        for format in &self.scoring_formats {
            registry.register(format.build()?)?;
        }
        Ok(registry)
    }

    pub fn initial_selection(&self) -> Selection {
        Selection {
            season: SeasonKey::new(self.selection.seasons.iter().copied()),
            format: self.selection.format.clone(),
            players: self.selection.players.clone(),
            week_range: WeekRange::new(self.selection.week_start, self.selection.week_end),
        }
    }
}

impl CustomFormatConfig {
    /// Build the format; every weight must be named
    pub fn build(&self) -> Result<ScoringFormat, ScoringError> {
        ScoringFormat::create_custom_from_names(
            self.name.clone(),
            self.weights.iter().map(|(key, value)| (key.as_str(), *value)),
        )
    }
}
