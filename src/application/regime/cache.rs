use crate::domain::market::history_period::HistoryPeriod;
use crate::domain::market::ohlcv::OhlcvTable;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub ticker: String,
    pub period: HistoryPeriod,
}

impl CacheKey {
    pub fn new(ticker: impl Into<String>, period: HistoryPeriod) -> Self {
        Self {
            ticker: ticker.into(),
            period,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    table: OhlcvTable,
    expires_at: DateTime<Utc>,
}

/// Price histories keyed by ticker and period, each with its own expiry.
///
/// Time is passed in by the caller so expiry is deterministic.
#[derive(Debug, Clone)]
pub struct RegimeCache {
    entries: HashMap<CacheKey, CacheEntry>,
    ttl: Duration,
}

impl Default for RegimeCache {
    fn default() -> Self {
        Self::new(Duration::hours(1))
    }
}

impl RegimeCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached table for `key` unless it expired at or before `now`
    pub fn get(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<&OhlcvTable> {
        self.entries
            .get(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| &entry.table)
    }

    pub fn insert(&mut self, key: CacheKey, table: OhlcvTable, now: DateTime<Utc>) {
        let expires_at = now + self.ttl;
        self.entries.insert(key, CacheEntry { table, expires_at });
    }

    /// Drops expired entries, returning how many were removed
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| now < entry.expires_at);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("RegimeCache: purged {} expired entries", removed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 14, 0, 0).unwrap()
    }

    #[test]
    fn test_get_before_expiry() {
        let mut cache = RegimeCache::default();
        let key = CacheKey::new("SPY", HistoryPeriod::OneYear);
        cache.insert(key.clone(), OhlcvTable::empty("SPY"), now());

        assert!(cache.get(&key, now() + Duration::minutes(59)).is_some());
        assert!(cache.get(&key, now() + Duration::hours(1)).is_none());
    }

    #[test]
    fn test_ttl() {
        assert_eq!(RegimeCache::default().ttl(), Duration::hours(1));
        let cache = RegimeCache::new(Duration::minutes(15));
        assert_eq!(cache.ttl(), Duration::minutes(15));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_period_is_part_of_key() {
        let mut cache = RegimeCache::default();
        cache.insert(
            CacheKey::new("SPY", HistoryPeriod::OneYear),
            OhlcvTable::empty("SPY"),
            now(),
        );
        let other = CacheKey::new("SPY", HistoryPeriod::OneMonth);
        assert!(cache.get(&other, now()).is_none());
    }

    #[test]
    fn test_entries_expire_independently() {
        let mut cache = RegimeCache::new(Duration::minutes(30));
        cache.insert(
            CacheKey::new("SPY", HistoryPeriod::OneYear),
            OhlcvTable::empty("SPY"),
            now(),
        );
        cache.insert(
            CacheKey::new("QQQ", HistoryPeriod::OneYear),
            OhlcvTable::empty("QQQ"),
            now() + Duration::minutes(20),
        );

        let later = now() + Duration::minutes(40);
        assert!(cache.get(&CacheKey::new("SPY", HistoryPeriod::OneYear), later).is_none());
        assert!(cache.get(&CacheKey::new("QQQ", HistoryPeriod::OneYear), later).is_some());

        assert_eq!(cache.purge_expired(later), 1);
        assert_eq!(cache.len(), 1);
    }
}
