use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use common::{
    CacheEntry, CacheTtls, Cached, Clock, HistoryInterval, MarketDataProvider, PricePoint,
    PriceSnapshot, Result,
};

/// Cache-fronted access to the market-data provider.
///
/// Freshness is a hard contract: a stale entry is refetched, and when that
/// fetch fails the error is returned instead of the stale value. A failed
/// fetch leaves the previous entry untouched.
///
/// Each cache has its own lock, held across the upstream call, so concurrent
/// readers of the same kind share a single fetch while price and history
/// reads proceed independently.
pub struct PriceSource {
    provider: Arc<dyn MarketDataProvider>,
    clock: Arc<dyn Clock>,
    price_ttl: Duration,
    history_ttl: Duration,
    price_cache: Mutex<Option<CacheEntry<PriceSnapshot>>>,
    /// Keyed by the number of days the series was fetched for.
    history_cache: Mutex<Option<CacheEntry<(u32, Vec<PricePoint>)>>>,
}

impl PriceSource {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        clock: Arc<dyn Clock>,
        ttls: CacheTtls,
    ) -> Self {
        Self {
            provider,
            clock,
            price_ttl: ttls.price,
            history_ttl: ttls.history,
            price_cache: Mutex::new(None),
            history_cache: Mutex::new(None),
        }
    }

    /// Current price, served from cache while younger than the price TTL.
    pub async fn get_current_price(&self) -> Result<Cached<PriceSnapshot>> {
        let mut cache = self.price_cache.lock().await;
        let now = self.clock.now_millis();

        if let Some(entry) = cache.as_ref().filter(|e| e.is_fresh(now, self.price_ttl)) {
            debug!(age_ms = now - entry.fetched_at_millis, "Price cache hit");
            return Ok(entry.to_cached(true));
        }

        let mut snapshot = self.provider.current_price().await.map_err(|e| {
            warn!(error = %e, "Current price fetch failed");
            e
        })?;

        // A snapshot is stamped with the time it was fetched.
        let fetched_at_millis = self.clock.now_millis();
        snapshot.timestamp_millis = fetched_at_millis;
        let entry = CacheEntry::new(snapshot, fetched_at_millis);
        info!(price = snapshot.price, change_24h = snapshot.change_24h_percent, "Price refreshed");
        let fresh = entry.to_cached(false);
        *cache = Some(entry);
        Ok(fresh)
    }

    /// Daily history for the last `days` days, oldest first, served from
    /// cache while younger than the history TTL.
    pub async fn get_history(
        &self,
        days: u32,
        interval: HistoryInterval,
    ) -> Result<Cached<Vec<PricePoint>>> {
        let mut cache = self.history_cache.lock().await;
        let now = self.clock.now_millis();

        if let Some(entry) = cache
            .as_ref()
            .filter(|e| e.value.0 == days && e.is_fresh(now, self.history_ttl))
        {
            debug!(days, age_ms = now - entry.fetched_at_millis, "History cache hit");
            return Ok(Cached {
                value: entry.value.1.clone(),
                fetched_at_millis: entry.fetched_at_millis,
                cached: true,
            });
        }

        let points = match interval {
            HistoryInterval::Daily => self.provider.daily_history(days).await,
        }
        .map_err(|e| {
            warn!(days, error = %e, "History fetch failed");
            e
        })?;

        if points.is_empty() {
            warn!(days, "Provider returned an empty history series");
        }
        info!(days, points = points.len(), "History refreshed");

        let fetched_at_millis = self.clock.now_millis();
        let fresh = Cached {
            value: points.clone(),
            fetched_at_millis,
            cached: false,
        };
        *cache = Some(CacheEntry::new((days, points), fetched_at_millis));
        Ok(fresh)
    }
}
