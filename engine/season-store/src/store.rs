use crate::error::{Result, SeasonDataError};
use crate::fetcher::SeasonProvider;
use crate::models::{SeasonKey, SeasonTable};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Memoized season loader.
///
/// Tables are cached by [`SeasonKey`] and handed out as shared `Arc`s, so a
/// repeated request for a loaded season is a map lookup, not a re-fetch.
/// Empty provider results are reported as `NoDataForSeason` and not cached.
pub struct RawSeasonStore<P> {
    provider: P,
    cache: HashMap<SeasonKey, Arc<SeasonTable>>,
    fetch_count: usize,
}

impl<P: SeasonProvider> RawSeasonStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider, cache: HashMap::new(), fetch_count: 0 }
    }

    /// Load the table for a season set, fetching only on a cache miss
    pub fn load(&mut self, seasons: impl Into<SeasonKey>) -> Result<Arc<SeasonTable>> {
        let key = seasons.into();
        if key.is_empty() {
            return Err(SeasonDataError::NoSeasonsRequested);
        }

        if let Some(table) = self.cache.get(&key) {
            debug!("Season cache hit for {}", key);
            return Ok(Arc::clone(table));
        }

        info!("Loading season data for {}", key);
        self.fetch_count += 1;
        let rows = self.provider.fetch_seasons(key.seasons())?;

        if rows.is_empty() {
            warn!("Provider returned no rows for season(s) {}", key);
            return Err(SeasonDataError::NoDataForSeason { seasons: key.to_string() });
        }

        let table = Arc::new(SeasonTable::new(key.clone(), rows));
        info!("Loaded {} player-week rows for season(s) {}", table.len(), key);
        self.cache.insert(key, Arc::clone(&table));
        Ok(table)
    }

    pub fn is_cached(&self, key: &SeasonKey) -> bool {
        self.cache.contains_key(key)
    }

    /// Number of times the provider has been called
    pub fn fetch_count(&self) -> usize {
        self.fetch_count
    }

    pub fn cached_keys(&self) -> Vec<&SeasonKey> {
        let mut keys: Vec<&SeasonKey> = self.cache.keys().collect();
        keys.sort();
        keys
    }

    /// Drop every cached table
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}
