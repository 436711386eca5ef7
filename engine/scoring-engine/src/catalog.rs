use crate::format::WeightKey;

/// Maps raw stat columns onto the scoring category they contribute to.
///
/// Several columns may share a category; the nflverse source, for example,
/// splits lost fumbles and two-point conversions by play type.
#[derive(Debug, Clone, PartialEq)]
pub struct StatCatalog {
    entries: Vec<(String, WeightKey)>,
}

impl StatCatalog {
    pub fn new<S: Into<String>>(entries: impl IntoIterator<Item = (S, WeightKey)>) -> Self {
        Self { entries: entries.into_iter().map(|(column, key)| (column.into(), key)).collect() }
    }

    /// Column mapping for nflverse weekly player stats
    pub fn nflverse() -> Self {
        Self::new([
            // Passing
            ("passing_yards", WeightKey::PassYards),
            ("passing_tds", WeightKey::PassTds),
            ("interceptions", WeightKey::PassInterceptions),
            // Rushing
            ("rushing_yards", WeightKey::RushYards),
            ("rushing_tds", WeightKey::RushTds),
            // Receiving
            ("receptions", WeightKey::Receptions),
            ("receiving_yards", WeightKey::ReceivingYards),
            ("receiving_tds", WeightKey::ReceivingTds),
            // Misc
            ("sack_fumbles_lost", WeightKey::FumblesLost),
            ("rushing_fumbles_lost", WeightKey::FumblesLost),
            ("receiving_fumbles_lost", WeightKey::FumblesLost),
            ("passing_2pt_conversions", WeightKey::TwoPointConversions),
            ("rushing_2pt_conversions", WeightKey::TwoPointConversions),
            ("receiving_2pt_conversions", WeightKey::TwoPointConversions),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, WeightKey)> {
        self.entries.iter().map(|(column, key)| (column.as_str(), *key))
    }

    pub fn key_for(&self, column: &str) -> Option<WeightKey> {
        self.iter().find(|(c, _)| *c == column).map(|(_, key)| key)
    }

    /// Every column that feeds a category
    pub fn columns_for(&self, key: WeightKey) -> impl Iterator<Item = &str> {
        self.iter().filter(move |(_, k)| *k == key).map(|(column, _)| column)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StatCatalog {
    fn default() -> Self {
        Self::nflverse()
    }
}
