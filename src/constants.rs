//! Constants for the crypto price tracker
//!
//! All tracker defaults are centralized here. Runtime configuration is
//! limited to the `PRICE_PROVIDER` environment variable and the setters
//! on the tracker itself.

use crate::types::Coin;

/// How often to poll the provider by default (in seconds)
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Smallest accepted poll interval (in seconds)
pub const MIN_POLL_INTERVAL_SECS: u64 = 1;

/// Largest accepted poll interval (in seconds)
pub const MAX_POLL_INTERVAL_SECS: u64 = 86_400;

/// Maximum number of price points retained per coin
pub const MAX_HISTORY: usize = 120;

/// HTTP request timeout when fetching prices (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Quote currency for all prices
pub const VS_CURRENCY: &str = "usd";

/// Coins to track by default
pub const ENABLED_COINS: &[Coin] = &[Coin::Bitcoin, Coin::Ethereum, Coin::Solana];

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko API endpoint for simple price queries
pub const COINGECKO_SIMPLE_PRICE_ENDPOINT: &str = "/simple/price";

/// Binance API base URL
pub const BINANCE_API_URL: &str = "https://api.binance.com";

/// Binance API endpoint for the latest ticker price of a single symbol
pub const BINANCE_TICKER_PRICE_ENDPOINT: &str = "/api/v3/ticker/price";

/// User agent for HTTP requests
pub const USER_AGENT: &str = "crypto-tracker-sdk/0.1.0";
