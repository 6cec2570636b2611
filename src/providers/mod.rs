//! Coin price provider implementations

pub mod binance;
pub mod coingecko;

pub use binance::BinanceProvider;
pub use coingecko::CoinGeckoProvider;
