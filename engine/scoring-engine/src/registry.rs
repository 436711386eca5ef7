use crate::error::ScoringError;
use crate::format::ScoringFormat;
use tracing::info;

/// Format Registry - the scoring formats a session can select from
///
/// Starts with the built-in Standard and PPR formats. Custom formats are
/// validated before they are stored, and names are unique.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    formats: Vec<ScoringFormat>,
}

impl FormatRegistry {
    /// Create a registry holding the built-in formats
    pub fn new() -> Self {
        Self { formats: vec![ScoringFormat::standard(), ScoringFormat::ppr()] }
    }

    /// Validate and store a format
    pub fn register(&mut self, format: ScoringFormat) -> Result<(), ScoringError> {
        format.validate()?;
        if self.contains(format.name()) {
            return Err(ScoringError::DuplicateFormat(format.name().to_string()));
        }

        info!("Registered scoring format `{}`", format.name());
        self.formats.push(format);
        Ok(())
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&ScoringFormat, ScoringError> {
        self.formats
            .iter()
            .find(|format| format.name() == name)
            .ok_or_else(|| ScoringError::UnknownFormat(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.formats.iter().any(|format| format.name() == name)
    }

    /// Formats in registration order
    pub fn list(&self) -> &[ScoringFormat] {
        &self.formats
    }

    pub fn names(&self) -> Vec<&str> {
        self.formats.iter().map(|format| format.name()).collect()
    }

    /// The format a new session starts with
    pub fn default_format(&self) -> &ScoringFormat {
        &self.formats[0]
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::WeightKey;

    fn half_ppr() -> ScoringFormat {
        ScoringFormat::create_custom(
            "Half PPR",
            WeightKey::ALL.iter().map(|key| {
                (*key, if *key == WeightKey::Receptions { 0.5 } else { key.default_weight() })
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_registry_starts_with_builtins() {
        let registry = FormatRegistry::new();
        assert_eq!(registry.names(), vec!["Standard", "PPR"]);
        assert_eq!(registry.default_format(), &ScoringFormat::standard());
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = FormatRegistry::new();
        registry.register(half_ppr()).unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("Half PPR").unwrap().weight_of(WeightKey::Receptions), 0.5);
        assert_eq!(
            registry.get("Dynasty").unwrap_err(),
            ScoringError::UnknownFormat("Dynasty".into())
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut registry = FormatRegistry::new();
        let err = registry.register(ScoringFormat::create("PPR", [])).unwrap_err();
        assert_eq!(err, ScoringError::DuplicateFormat("PPR".into()));
        assert_eq!(registry.len(), 2);
    }
}
