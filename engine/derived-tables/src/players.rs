use season_store::StatRow;
use serde::Serialize;
use std::collections::BTreeMap;

/// One distinct player in a loaded season
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub name: String,
    pub position: String,
    /// Team on the player's most recent week
    pub team: String,
    pub games: usize,
}

/// Player Index - distinct players of a season table, for selectors and
/// position lookup on player change
#[derive(Debug, Clone, Default)]
pub struct PlayerIndex {
    players: Vec<PlayerSummary>,
}

impl PlayerIndex {
    /// Build the index from player-week rows. Position and team come from
    /// each player's most recent row.
    pub fn from_rows(rows: &[StatRow]) -> Self {
        let mut latest: BTreeMap<&str, (&StatRow, usize)> = BTreeMap::new();
        for row in rows {
            latest
                .entry(row.player_display_name.as_str())
                .and_modify(|(current, games)| {
                    *games += 1;
                    if (row.season, row.week) > (current.season, current.week) {
                        *current = row;
                    }
                })
                .or_insert((row, 1));
        }

        let players = latest
            .into_iter()
            .map(|(name, (row, games))| PlayerSummary {
                name: name.to_string(),
                position: row.position.clone(),
                team: row.recent_team.clone(),
                games,
            })
            .collect();

        Self { players }
    }

    /// Look up a player by exact display name
    pub fn get(&self, name: &str) -> Option<&PlayerSummary> {
        self.players
            .binary_search_by(|player| player.name.as_str().cmp(name))
            .ok()
            .map(|index| &self.players[index])
    }

    pub fn position_of(&self, name: &str) -> Option<&str> {
        self.get(name).map(|player| player.position.as_str())
    }

    /// Search players by name (case-insensitive substring)
    pub fn search(&self, query: &str) -> Vec<&PlayerSummary> {
        let query_lower = query.to_lowercase();
        self.players
            .iter()
            .filter(|player| player.name.to_lowercase().contains(&query_lower))
            .collect()
    }

    pub fn at_position<'a>(
        &'a self,
        position: &'a str,
    ) -> impl Iterator<Item = &'a PlayerSummary> + 'a {
        self.players.iter().filter(move |player| player.position == position)
    }

    /// Players ordered by name
    pub fn iter(&self) -> impl Iterator<Item = &PlayerSummary> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
