use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One player's statistics for one week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRow {
    /// Source player ID (e.g., "00-0023459")
    pub player_id: String,

    /// Player display name (e.g., "Aaron Rodgers")
    pub player_display_name: String,

    /// Position (e.g., "QB", "RB", "WR", "TE")
    pub position: String,

    /// Team the player appeared for (e.g., "NYJ")
    pub recent_team: String,

    pub season: i32,

    pub week: u32,

    /// "REG" or "POST"
    pub season_type: Option<String>,

    pub opponent_team: Option<String>,

    /// Headshot image reference
    pub headshot_url: Option<String>,

    /// Numeric statistic columns keyed by source column name. Cells that are
    /// empty or non-numeric in the source are absent rather than zero.
    pub stats: BTreeMap<String, f64>,
}

impl StatRow {
    /// Create a row with identity columns and no statistics
    pub fn new(
        player_id: impl Into<String>,
        player_display_name: impl Into<String>,
        position: impl Into<String>,
        recent_team: impl Into<String>,
        season: i32,
        week: u32,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            player_display_name: player_display_name.into(),
            position: position.into(),
            recent_team: recent_team.into(),
            season,
            week,
            season_type: None,
            opponent_team: None,
            headshot_url: None,
            stats: BTreeMap::new(),
        }
    }

    /// Return this row with one statistic set
    pub fn with_stat(mut self, column: impl Into<String>, value: f64) -> Self {
        self.stats.insert(column.into(), value);
        self
    }

    pub fn stat(&self, column: &str) -> Option<f64> {
        self.stats.get(column).copied()
    }

    pub fn has_stat(&self, column: &str) -> bool {
        self.stats.contains_key(column)
    }
}

/// Sorted, de-duplicated set of seasons; the memoization key for loads
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeasonKey(Vec<i32>);

impl SeasonKey {
    pub fn new(seasons: impl IntoIterator<Item = i32>) -> Self {
        let mut seasons: Vec<i32> = seasons.into_iter().collect();
        seasons.sort_unstable();
        seasons.dedup();
        Self(seasons)
    }

    pub fn single(season: i32) -> Self {
        Self(vec![season])
    }

    pub fn seasons(&self) -> &[i32] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The most recent season in the set
    pub fn latest(&self) -> Option<i32> {
        self.0.last().copied()
    }
}

impl From<i32> for SeasonKey {
    fn from(season: i32) -> Self {
        Self::single(season)
    }
}

impl From<Vec<i32>> for SeasonKey {
    fn from(seasons: Vec<i32>) -> Self {
        Self::new(seasons)
    }
}

impl From<&[i32]> for SeasonKey {
    fn from(seasons: &[i32]) -> Self {
        Self::new(seasons.iter().copied())
    }
}

impl fmt::Display for SeasonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Every player-week row for a set of seasons. Never mutated after load;
/// derived steps build new tables from it.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonTable {
    key: SeasonKey,
    rows: Vec<StatRow>,
}

impl SeasonTable {
    pub fn new(key: SeasonKey, rows: Vec<StatRow>) -> Self {
        Self { key, rows }
    }

    pub fn key(&self) -> &SeasonKey {
        &self.key
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

    /// Whether any row carries the given statistic column
    pub fn has_column(&self, column: &str) -> bool {
        self.rows.iter().any(|row| row.has_stat(column))
    }

    /// The most recent row (by season, then week) for a player
    pub fn latest_row_for(&self, player_display_name: &str) -> Option<&StatRow> {
        self.rows
            .iter()
            .filter(|row| row.player_display_name == player_display_name)
            .max_by_key(|row| (row.season, row.week))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_key_sorts_and_dedups() {
        let key = SeasonKey::new([2024, 2022, 2024, 2023]);
        assert_eq!(key.seasons(), &[2022, 2023, 2024]);
        assert_eq!(key.latest(), Some(2024));
        assert_eq!(key.to_string(), "2022,2023,2024");
        assert_eq!(SeasonKey::from(vec![2023, 2022]), SeasonKey::from(&[2022, 2023][..]));
    }

    #[test]
    fn test_latest_row_for_player() {
        let table = SeasonTable::new(
            SeasonKey::single(2024),
            vec![
                StatRow::new("1", "Davante Adams", "WR", "LV", 2024, 3),
                StatRow::new("1", "Davante Adams", "WR", "NYJ", 2024, 9),
                StatRow::new("2", "Garrett Wilson", "WR", "NYJ", 2024, 10),
            ],
        );

        let latest = table.latest_row_for("Davante Adams").unwrap();
        assert_eq!(latest.recent_team, "NYJ");
        assert!(table.latest_row_for("Nobody").is_none());
    }

    #[test]
    fn test_has_column() {
        let table = SeasonTable::new(
            SeasonKey::single(2024),
            vec![StatRow::new("1", "A", "QB", "GB", 2024, 1).with_stat("passing_yards", 250.0)],
        );
        assert!(table.has_column("passing_yards"));
        assert!(!table.has_column("receptions"));
    }
}
