//! TTL-bounded in-process cache for fetched quote series.
//!
//! Bounds upstream call volume: a series fetched once is reused for every
//! request on the same key until its freshness window elapses. Expired
//! entries are logically absent the instant their ttl passes; physical
//! removal happens lazily on the next `get`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::warn;

use crate::models::QuoteSeries;

/// A cached series plus its freshness window.
#[derive(Debug, Clone)]
struct CacheEntry {
    series: QuoteSeries,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= self.ttl
    }
}

/// Thread-safe key-value cache for quote series.
///
/// Reads and writes may race across concurrent requests for the same key;
/// writes overwrite whole entries, so the worst outcome of a race is a
/// duplicate upstream fetch, never a corrupted entry.
pub struct QuoteCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl QuoteCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Lock the entries mutex, recovering from poison if necessary.
    ///
    /// The cache holds no cross-entry invariants, so a panic mid-write at
    /// worst leaves one stale entry; recovering beats panicking every caller.
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Quote cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Look up a series by key.
    ///
    /// Returns `None` for both missing and expired entries; expiry is silent.
    pub fn get(&self, key: &str) -> Option<QuoteSeries> {
        let mut entries = self.lock_entries();

        match entries.get(key) {
            Some(entry) if entry.is_expired(Instant::now()) => {
                entries.remove(key);
                None
            }
            Some(entry) => Some(entry.series.clone()),
            None => None,
        }
    }

    /// Store a series under a key, overwriting any existing entry.
    pub fn set(&self, key: &str, series: QuoteSeries, ttl: Duration) {
        let mut entries = self.lock_entries();
        entries.insert(
            key.to_string(),
            CacheEntry {
                series,
                created_at: Instant::now(),
                ttl,
            },
        );
    }
}

impl Default for QuoteCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quote;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn sample_series() -> QuoteSeries {
        QuoteSeries::from_quotes(vec![Quote::ohlcv(
            Utc.with_ymd_and_hms(2024, 3, 4, 19, 55, 0).unwrap(),
            dec!(103.10),
            dec!(103.50),
            dec!(103.00),
            dec!(103.25),
            dec!(4512),
        )])
    }

    #[test]
    fn test_get_missing_key() {
        let cache = QuoteCache::new();
        assert!(cache.get("intraday:IBM").is_none());
    }

    #[test]
    fn test_set_then_get() {
        let cache = QuoteCache::new();
        let series = sample_series();

        cache.set("intraday:IBM", series.clone(), Duration::from_secs(600));
        assert_eq!(cache.get("intraday:IBM"), Some(series));
    }

    #[test]
    fn test_set_overwrites() {
        let cache = QuoteCache::new();
        cache.set("intraday:IBM", QuoteSeries::from_quotes(Vec::new()), Duration::from_secs(600));
        let series = sample_series();
        cache.set("intraday:IBM", series.clone(), Duration::from_secs(600));

        assert_eq!(cache.get("intraday:IBM"), Some(series));
    }

    #[test]
    fn test_expired_entry_is_absent() {
        let cache = QuoteCache::new();
        cache.set("intraday:IBM", sample_series(), Duration::ZERO);

        assert!(cache.get("intraday:IBM").is_none());
    }

    #[test]
    fn test_expiry_boundary_via_rewound_clock() {
        let cache = QuoteCache::new();
        cache.set("intraday:IBM", sample_series(), Duration::from_secs(30));

        // Rewind created_at past the ttl to simulate elapsed time
        {
            let mut entries = cache.lock_entries();
            let entry = entries.get_mut("intraday:IBM").unwrap();
            entry.created_at = Instant::now() - Duration::from_secs(31);
        }

        assert!(cache.get("intraday:IBM").is_none());
    }

    #[test]
    fn test_expired_entry_physically_removed_on_get() {
        let cache = QuoteCache::new();
        cache.set("intraday:IBM", sample_series(), Duration::ZERO);

        assert!(cache.get("intraday:IBM").is_none());
        assert!(cache.lock_entries().is_empty());
    }

    #[test]
    fn test_keys_are_independent() {
        let cache = QuoteCache::new();
        cache.set("intraday:IBM", sample_series(), Duration::from_secs(600));

        assert!(cache.get("intraday:AAPL").is_none());
        assert!(cache.get("intraday:IBM").is_some());
    }
}
