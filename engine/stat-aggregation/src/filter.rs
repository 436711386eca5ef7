//! Row filters that carve a scope out of a scored season table

use crate::scope::WeekRange;
use season_store::StatRow;

/// Rows whose week falls inside `weeks`
pub fn filter_weeks(rows: &[StatRow], weeks: WeekRange) -> Vec<StatRow> {
    rows.iter().filter(|row| weeks.contains(row.week)).cloned().collect()
}

/// Rows for one player, matched on display name
pub fn filter_player(rows: &[StatRow], player_display_name: &str) -> Vec<StatRow> {
    rows.iter().filter(|row| row.player_display_name == player_display_name).cloned().collect()
}

/// Rows for every player at a position
pub fn filter_position(rows: &[StatRow], position: &str) -> Vec<StatRow> {
    rows.iter().filter(|row| row.position == position).cloned().collect()
}
