use serde::Serialize;

/// One sample of the historical price series.
/// Series are ordered oldest-first; duplicate timestamps are left as delivered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    #[serde(rename = "timestamp")]
    pub timestamp_millis: i64,
    pub price: f64,
}

/// Latest price as reported by the provider at fetch time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSnapshot {
    pub price: f64,
    pub change_24h_percent: f64,
    pub timestamp_millis: i64,
}

/// Granularity of a historical series request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryInterval {
    #[default]
    Daily,
}

impl std::fmt::Display for HistoryInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryInterval::Daily => write!(f, "daily"),
        }
    }
}

/// Discrete output of the crossover evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    /// Buy and Sell are actionable; Hold never produces a notification.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Signal::Hold)
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Buy => write!(f, "buy"),
            Signal::Sell => write!(f, "sell"),
            Signal::Hold => write!(f, "hold"),
        }
    }
}

/// Outcome of one completed strategy cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyResult {
    pub signal: Signal,
    pub short_ma: f64,
    pub long_ma: f64,
    pub price: f64,
    pub timestamp_millis: i64,
}

/// Emitted when the signal changes to Buy or Sell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotificationEvent {
    pub signal: Signal,
    pub price: f64,
    pub short_ma: f64,
    pub long_ma: f64,
    pub timestamp_millis: i64,
}

impl NotificationEvent {
    pub fn from_result(result: &StrategyResult) -> Self {
        Self {
            signal: result.signal,
            price: result.price,
            short_ma: result.short_ma,
            long_ma: result.long_ma,
            timestamp_millis: result.timestamp_millis,
        }
    }
}
