pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod market;
pub mod types;

pub use cache::{CacheEntry, CacheTtls, Cached};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, CrossoverParams, EmailSettings, FirstSignalPolicy, TelegramSettings};
pub use error::{Error, FailureKind, Result};
pub use market::MarketDataProvider;
pub use types::*;
