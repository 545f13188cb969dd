use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use common::{Config, Error, MarketDataProvider, PricePoint, PriceSnapshot, Result};

/// REST client for the CoinGecko public API. Used for the current price and
/// the daily history of one asset in one quote currency.
pub struct CoinGeckoClient {
    base_url: String,
    coin_id: String,
    vs_currency: String,
    api_key: Option<String>,
    http: Client,
}

impl CoinGeckoClient {
    pub fn new(
        base_url: impl Into<String>,
        coin_id: impl Into<String>,
        vs_currency: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            coin_id: coin_id.into(),
            vs_currency: vs_currency.into().to_lowercase(),
            api_key: None,
            http,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let client = Self::new(
            &cfg.coingecko_base_url,
            &cfg.coin_id,
            &cfg.vs_currency,
            cfg.upstream_timeout,
        )?;
        Ok(client.with_api_key(cfg.coingecko_api_key.clone()))
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .query(params);
        if let Some(key) = &self.api_key {
            request = request.query(&[("x_cg_api_key", key)]);
        }

        let resp = request.send().await.map_err(Error::upstream)?;
        let status = resp.status();
        let body = resp.text().await.map_err(Error::upstream)?;

        if !status.is_success() {
            return Err(Error::upstream(format!("HTTP {status} from {path}: {body}")));
        }
        serde_json::from_str(&body)
            .map_err(|e| Error::upstream(format!("malformed JSON from {path}: {e}")))
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoClient {
    async fn current_price(&self) -> Result<PriceSnapshot> {
        debug!(coin = %self.coin_id, vs = %self.vs_currency, "Fetching current price");
        let body = self
            .get_json(
                "/simple/price",
                &[
                    ("ids", self.coin_id.clone()),
                    ("vs_currencies", self.vs_currency.clone()),
                    ("include_24hr_change", "true".to_string()),
                ],
            )
            .await?;

        let quote = body.get(&self.coin_id).ok_or_else(|| {
            Error::upstream(format!("price payload missing coin '{}'", self.coin_id))
        })?;

        let price = quote
            .get(&self.vs_currency)
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                Error::upstream(format!("price payload missing '{}' field", self.vs_currency))
            })?;

        let change_24h_percent = quote
            .get(format!("{}_24h_change", self.vs_currency))
            .and_then(Value::as_f64)
            .unwrap_or(0.0);

        Ok(PriceSnapshot {
            price,
            change_24h_percent,
            timestamp_millis: Utc::now().timestamp_millis(),
        })
    }

    async fn daily_history(&self, days: u32) -> Result<Vec<PricePoint>> {
        debug!(coin = %self.coin_id, days, "Fetching daily history");
        let path = format!("/coins/{}/market_chart", self.coin_id);
        let body = self
            .get_json(
                &path,
                &[
                    ("vs_currency", self.vs_currency.clone()),
                    ("days", days.to_string()),
                    ("interval", "daily".to_string()),
                ],
            )
            .await?;

        let chart: MarketChart = serde_json::from_value(body)
            .map_err(|e| Error::upstream(format!("malformed market chart: {e}")))?;

        let mut points: Vec<PricePoint> = chart
            .prices
            .into_iter()
            .map(|(ts, price)| PricePoint {
                timestamp_millis: ts as i64,
                price,
            })
            .collect();
        points.sort_by_key(|p| p.timestamp_millis);
        Ok(points)
    }
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct MarketChart {
    prices: Vec<(f64, f64)>,
}
