use std::str::FromStr;
use std::time::Duration;

use crate::CacheTtls;

/// All configuration loaded from environment variables at startup.
/// Every variable is optional; malformed values cause an immediate panic
/// with a clear message.
#[derive(Debug, Clone)]
pub struct Config {
    // Provider
    pub coin_id: String,
    pub vs_currency: String,
    pub coingecko_base_url: String,
    pub coingecko_api_key: Option<String>,
    pub upstream_timeout: Duration,

    // Strategy
    pub crossover: CrossoverParams,
    pub cache_ttls: CacheTtls,
    /// Period of the background evaluation timer. `None` disables it.
    pub evaluation_interval: Option<Duration>,

    // Notification channels
    pub email: EmailSettings,
    pub telegram: TelegramSettings,

    // API
    pub http_port: u16,
}

/// Whether the very first Buy/Sell after startup notifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirstSignalPolicy {
    /// No prior signal means no transition, so nothing is sent.
    #[default]
    Suppress,
    Notify,
}

/// Parameters of the dual moving-average crossover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossoverParams {
    pub short_period: usize,
    pub long_period: usize,
    /// Dead-zone width as a fraction of the long average, e.g. 0.02.
    pub threshold: f64,
    /// Days of daily history requested per cycle.
    pub history_days: u32,
    pub first_signal: FirstSignalPolicy,
}

impl Default for CrossoverParams {
    fn default() -> Self {
        Self {
            short_period: 9,
            long_period: 21,
            threshold: 0.02,
            history_days: 30,
            first_signal: FirstSignalPolicy::Suppress,
        }
    }
}

/// SMTP settings. The channel is usable only when host, user and password are all set.
#[derive(Debug, Clone, Default)]
pub struct EmailSettings {
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Recipient; defaults to `user` when unset.
    pub to: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TelegramSettings {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let crossover = CrossoverParams {
            short_period: parsed(&env, "SHORT_MA_PERIOD", 9),
            long_period: parsed(&env, "LONG_MA_PERIOD", 21),
            threshold: parsed(&env, "SIGNAL_THRESHOLD", 0.02),
            history_days: parsed(&env, "HISTORY_DAYS", 30),
            first_signal: if parsed(&env, "NOTIFY_ON_FIRST_SIGNAL", false) {
                FirstSignalPolicy::Notify
            } else {
                FirstSignalPolicy::Suppress
            },
        };

        if crossover.short_period == 0 || crossover.long_period == 0 {
            panic!("ERROR: SHORT_MA_PERIOD and LONG_MA_PERIOD must be >= 1");
        }
        if !(crossover.threshold >= 0.0 && crossover.threshold.is_finite()) {
            panic!(
                "ERROR: SIGNAL_THRESHOLD must be a non-negative number, got: {}",
                crossover.threshold
            );
        }
        if crossover.short_period >= crossover.long_period {
            tracing::warn!(
                short = crossover.short_period,
                long = crossover.long_period,
                "Short MA period is not shorter than long MA period"
            );
        }

        let cache_ttls = CacheTtls {
            price: Duration::from_secs(parsed(&env, "PRICE_CACHE_TTL_SECS", 60)),
            history: Duration::from_secs(parsed(&env, "HISTORY_CACHE_TTL_SECS", 30 * 60)),
            strategy: Duration::from_secs(parsed(&env, "STRATEGY_CACHE_TTL_SECS", 15 * 60)),
        };

        let interval_secs: u64 = parsed(&env, "EVALUATION_INTERVAL_SECS", 300);

        Config {
            coin_id: env("COIN_ID").unwrap_or_else(|| "solana".to_string()),
            vs_currency: env("VS_CURRENCY").unwrap_or_else(|| "usd".to_string()),
            coingecko_base_url: env("COINGECKO_BASE_URL")
                .unwrap_or_else(|| "https://api.coingecko.com/api/v3".to_string()),
            coingecko_api_key: env("COINGECKO_API_KEY"),
            upstream_timeout: Duration::from_secs(parsed(&env, "UPSTREAM_TIMEOUT_SECS", 10)),
            crossover,
            cache_ttls,
            evaluation_interval: (interval_secs > 0).then(|| Duration::from_secs(interval_secs)),
            email: EmailSettings {
                host: env("EMAIL_HOST"),
                port: parsed(&env, "EMAIL_PORT", 587),
                user: env("EMAIL_USER"),
                password: env("EMAIL_PASS"),
                to: env("EMAIL_TO"),
            },
            telegram: TelegramSettings {
                bot_token: env("TELEGRAM_BOT_TOKEN"),
                chat_id: env("TELEGRAM_CHAT_ID"),
            },
            http_port: parsed(&env, "HTTP_PORT", 3000),
        }
    }
}

fn parsed<T, F>(env: &F, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match env(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            panic!("Environment variable '{key}' has invalid value '{raw}': {e}")
        }),
        None => default,
    }
}
