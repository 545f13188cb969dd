pub mod coingecko;
pub mod source;

pub use coingecko::CoinGeckoClient;
pub use source::PriceSource;
