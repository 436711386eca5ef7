use crate::error::ScoringError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Name of the built-in standard format
pub const STANDARD_FORMAT: &str = "Standard";

/// Name of the built-in point-per-reception format
pub const PPR_FORMAT: &str = "PPR";

/// A fantasy scoring category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightKey {
    PassYards,
    PassTds,
    PassInterceptions,
    RushYards,
    RushTds,
    Receptions,
    ReceivingYards,
    ReceivingTds,
    TwoPointConversions,
    FumbleRecoveryTds,
    FumblesLost,
}

impl WeightKey {
    /// Every scoring category; a complete format has a weight for each
    pub const ALL: [WeightKey; 11] = [
        WeightKey::PassYards,
        WeightKey::PassTds,
        WeightKey::PassInterceptions,
        WeightKey::RushYards,
        WeightKey::RushTds,
        WeightKey::Receptions,
        WeightKey::ReceivingYards,
        WeightKey::ReceivingTds,
        WeightKey::TwoPointConversions,
        WeightKey::FumbleRecoveryTds,
        WeightKey::FumblesLost,
    ];

    /// Stable identifier used in config files and format authoring
    pub fn as_str(self) -> &'static str {
        match self {
            WeightKey::PassYards => "pass_yards",
            WeightKey::PassTds => "pass_tds",
            WeightKey::PassInterceptions => "pass_interceptions",
            WeightKey::RushYards => "rush_yards",
            WeightKey::RushTds => "rush_tds",
            WeightKey::Receptions => "receptions",
            WeightKey::ReceivingYards => "receiving_yards",
            WeightKey::ReceivingTds => "receiving_tds",
            WeightKey::TwoPointConversions => "two_point_conversions",
            WeightKey::FumbleRecoveryTds => "fumble_recovery_tds",
            WeightKey::FumblesLost => "fumbles_lost",
        }
    }

    /// Human-readable category name
    pub fn label(self) -> &'static str {
        match self {
            WeightKey::PassYards => "Passing Yards",
            WeightKey::PassTds => "Passing TDs",
            WeightKey::PassInterceptions => "Passing INTs",
            WeightKey::RushYards => "Rushing Yards",
            WeightKey::RushTds => "Rushing TDs",
            WeightKey::Receptions => "Receptions",
            WeightKey::ReceivingYards => "Receiving Yards",
            WeightKey::ReceivingTds => "Receiving TDs",
            WeightKey::TwoPointConversions => "Two-Point Conversions",
            WeightKey::FumbleRecoveryTds => "Fumble Recovery TDs",
            WeightKey::FumblesLost => "Fumbles Lost",
        }
    }

    /// Unit a weight is quoted in
    pub fn unit(self) -> &'static str {
        match self {
            WeightKey::PassYards | WeightKey::RushYards | WeightKey::ReceivingYards => {
                "pts per yard"
            }
            _ => "pts each",
        }
    }

    /// Standard-scoring weight
    pub fn default_weight(self) -> f64 {
        match self {
            WeightKey::PassYards => 0.04,
            WeightKey::PassTds => 4.0,
            WeightKey::PassInterceptions => -2.0,
            WeightKey::RushYards => 0.1,
            WeightKey::RushTds => 6.0,
            WeightKey::Receptions => 0.0,
            WeightKey::ReceivingYards => 0.1,
            WeightKey::ReceivingTds => 6.0,
            WeightKey::TwoPointConversions => 2.0,
            WeightKey::FumbleRecoveryTds => 6.0,
            WeightKey::FumblesLost => -2.0,
        }
    }
}

impl fmt::Display for WeightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightKey {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WeightKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ScoringError::UnknownWeightKey(s.to_string()))
    }
}

/// A named, immutable set of per-category point weights
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringFormat {
    name: String,
    weights: BTreeMap<WeightKey, f64>,
}

impl ScoringFormat {
    /// Build a format from the default weights with `overrides` applied on top.
    /// Complete by construction, so it is not validated here.
    pub fn create(
        name: impl Into<String>,
        overrides: impl IntoIterator<Item = (WeightKey, f64)>,
    ) -> Self {
        let mut weights: BTreeMap<WeightKey, f64> =
            WeightKey::ALL.iter().map(|key| (*key, key.default_weight())).collect();
        weights.extend(overrides);
        Self { name: name.into(), weights }
    }

    /// Standard scoring: no points per reception
    pub fn standard() -> Self {
        Self::create(STANDARD_FORMAT, [])
    }

    /// One point per reception
    pub fn ppr() -> Self {
        Self::create(PPR_FORMAT, [(WeightKey::Receptions, 1.0)])
    }

    /// Build a format strictly from `values`; every category must be present
    pub fn create_custom(
        name: impl Into<String>,
        values: impl IntoIterator<Item = (WeightKey, f64)>,
    ) -> Result<Self, ScoringError> {
        let format = Self { name: name.into(), weights: values.into_iter().collect() };
        format.validate()?;
        Ok(format)
    }

    /// Same as [`ScoringFormat::create_custom`], keyed by category identifiers
    /// such as `"pass_yards"`
    pub fn create_custom_from_names<K: AsRef<str>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = (K, f64)>,
    ) -> Result<Self, ScoringError> {
        let values = values
            .into_iter()
            .map(|(key, value)| key.as_ref().parse::<WeightKey>().map(|key| (key, value)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::create_custom(name, values)
    }

    /// Check that every category has a finite weight
    pub fn validate(&self) -> Result<(), ScoringError> {
        let missing: Vec<WeightKey> =
            WeightKey::ALL.iter().copied().filter(|key| !self.weights.contains_key(key)).collect();
        if !missing.is_empty() {
            return Err(ScoringError::IncompleteScoringFormat { name: self.name.clone(), missing });
        }

        if let Some((key, _)) = self.weights.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ScoringError::InvalidWeight { name: self.name.clone(), key: *key });
        }

        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weights(&self) -> &BTreeMap<WeightKey, f64> {
        &self.weights
    }

    /// Weight for a category, zero if the format has none
    pub fn weight_of(&self, key: WeightKey) -> f64 {
        self.weights.get(&key).copied().unwrap_or(0.0)
    }

    /// Markdown summary, one line per category
    pub fn to_markdown(&self) -> String {
        let mut out = format!("**Scoring Format: {}**\n\n", self.name);
        for (key, value) in &self.weights {
            out.push_str(&format!("**{}**: {} {}\n\n", key.label(), value, key.unit()));
        }
        out
    }
}

impl fmt::Display for ScoringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
