use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive range of weeks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekRange {
    start: u32,
    end: u32,
}

impl WeekRange {
    /// Build a range; a reversed pair is swapped
    pub fn new(start: u32, end: u32) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn contains(&self, week: u32) -> bool {
        (self.start..=self.end).contains(&week)
    }
}

impl Default for WeekRange {
    fn default() -> Self {
        Self::new(0, 16)
    }
}

impl fmt::Display for WeekRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "weeks {}-{}", self.start, self.end)
    }
}

/// The filter a derived table was built from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Scope {
    Player { name: String, weeks: WeekRange },
    Position { position: String, weeks: WeekRange },
}

impl Scope {
    pub fn player(name: impl Into<String>, weeks: WeekRange) -> Self {
        Self::Player { name: name.into(), weeks }
    }

    pub fn position(position: impl Into<String>, weeks: WeekRange) -> Self {
        Self::Position { position: position.into(), weeks }
    }

    pub fn weeks(&self) -> WeekRange {
        match self {
            Scope::Player { weeks, .. } | Scope::Position { weeks, .. } => *weeks,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Player { name, weeks } => write!(f, "player `{name}` in {weeks}"),
            Scope::Position { position, weeks } => write!(f, "position `{position}` in {weeks}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_range_inclusive_and_normalized() {
        let range = WeekRange::new(5, 2);
        assert_eq!((range.start(), range.end()), (2, 5));
        assert!(range.contains(2));
        assert!(range.contains(5));
        assert!(!range.contains(6));
        assert_eq!(range.to_string(), "weeks 2-5");
    }

    #[test]
    fn test_scope_display() {
        let scope = Scope::player("Josh Allen", WeekRange::new(1, 4));
        assert_eq!(scope.to_string(), "player `Josh Allen` in weeks 1-4");
        assert_eq!(scope.weeks(), WeekRange::new(1, 4));
    }
}
