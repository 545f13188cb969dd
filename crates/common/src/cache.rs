use std::time::Duration;

/// A value together with the wall-clock time it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub value: T,
    pub fetched_at_millis: i64,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, fetched_at_millis: i64) -> Self {
        Self {
            value,
            fetched_at_millis,
        }
    }

    /// Fresh iff `now - fetched_at < ttl`. An entry stamped in the future
    /// (clock stepped backwards) counts as fresh.
    pub fn is_fresh(&self, now_millis: i64, ttl: Duration) -> bool {
        let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        now_millis.saturating_sub(self.fetched_at_millis) < ttl_millis
    }
}

impl<T: Clone> CacheEntry<T> {
    /// Wrap the stored value for a caller, marking whether it came from cache.
    pub fn to_cached(&self, cached: bool) -> Cached<T> {
        Cached {
            value: self.value.clone(),
            fetched_at_millis: self.fetched_at_millis,
            cached,
        }
    }
}

/// Value returned by every cache-fronted read.
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub value: T,
    pub fetched_at_millis: i64,
    /// True when served from a fresh cache entry without an upstream call.
    pub cached: bool,
}

/// Time-to-live per data kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub price: Duration,
    pub history: Duration,
    pub strategy: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            price: Duration::from_secs(60),
            history: Duration::from_secs(30 * 60),
            strategy: Duration::from_secs(15 * 60),
        }
    }
}
