use async_trait::async_trait;

use crate::{PricePoint, PriceSnapshot, Result};

/// Abstraction over the upstream market-data provider.
///
/// `CoinGeckoClient` implements this for the live feed. Only `PriceSource`
/// in `crates/market` should call it directly; everything else reads through
/// the source's caches.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Current price and 24h change for the configured asset/quote pair.
    async fn current_price(&self) -> Result<PriceSnapshot>;

    /// Daily price series covering the last `days` days, oldest first.
    async fn daily_history(&self, days: u32) -> Result<Vec<PricePoint>>;
}
