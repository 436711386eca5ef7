use season_store::SeasonKey;
use serde::{Deserialize, Serialize};
use stat_aggregation::{Scope, WeekRange};

/// A player picked for a scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSelection {
    /// Display name as it appears in the season data
    pub name: String,

    /// Position used for the positional tables
    pub position: String,
}

impl PlayerSelection {
    pub fn new(name: impl Into<String>, position: impl Into<String>) -> Self {
        Self { name: name.into(), position: position.into() }
    }

    pub fn player_scope(&self, weeks: WeekRange) -> Scope {
        Scope::player(self.name.clone(), weeks)
    }

    pub fn position_scope(&self, weeks: WeekRange) -> Scope {
        Scope::position(self.position.clone(), weeks)
    }
}

/// Every user input the derived tables depend on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub season: SeasonKey,

    /// Name of a registered scoring format
    pub format: String,

    pub players: Vec<PlayerSelection>,

    pub week_range: WeekRange,
}

impl Selection {
    /// A selection with the default week range and no players
    pub fn new(season: impl Into<SeasonKey>, format: impl Into<String>) -> Self {
        Self {
            season: season.into(),
            format: format.into(),
            players: Vec::new(),
            week_range: WeekRange::default(),
        }
    }

    pub fn with_weeks(mut self, start: u32, end: u32) -> Self {
        self.week_range = WeekRange::new(start, end);
        self
    }

    pub fn with_player(mut self, name: impl Into<String>, position: impl Into<String>) -> Self {
        self.players.push(PlayerSelection::new(name, position));
        self
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(2024, scoring_engine::STANDARD_FORMAT)
    }
}
