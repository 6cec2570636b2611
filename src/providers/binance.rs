//! Binance price provider implementation

use crate::{
    constants::{
        BINANCE_API_URL, BINANCE_TICKER_PRICE_ENDPOINT, REQUEST_TIMEOUT_SECS, USER_AGENT,
    },
    error::ProviderError,
    provider::PriceProvider,
    types::Coin,
};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Binance ticker price response for a single symbol
///
/// Shape: `{"symbol": "BTCUSDT", "price": "30050.12000000"}`. The price
/// is a decimal string, not a JSON number.
#[derive(Debug, Deserialize)]
struct TickerPriceResponse {
    #[allow(dead_code)]
    symbol: String,
    price: String,
}

/// Binance price provider
///
/// Issues one ticker request per coin. Requests run concurrently and a
/// failed symbol is skipped, so one bad coin never takes down the cycle.
pub struct BinanceProvider {
    client: Client,
}

impl BinanceProvider {
    /// Creates a new Binance provider
    pub fn new() -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::NetworkError)?;

        Ok(Self { client })
    }

    /// Builds the ticker price URL for a single coin
    fn build_url(&self, coin: Coin) -> String {
        format!(
            "{}{}?symbol={}",
            BINANCE_API_URL,
            BINANCE_TICKER_PRICE_ENDPOINT,
            coin.binance_symbol()
        )
    }

    /// Fetches and parses the ticker price for one coin
    async fn fetch_ticker(&self, coin: Coin) -> Result<f64, ProviderError> {
        let url = self.build_url(coin);
        tracing::debug!(url = %url, "Fetching price from Binance");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ProviderError::NetworkError)?;

        if response.status().as_u16() == 429 {
            return Err(ProviderError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            return Err(ProviderError::ApiError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let ticker: TickerPriceResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!(
                "Failed to parse Binance ticker for {}: {}",
                coin.binance_symbol(),
                e
            )))?;

        ticker.price.parse::<f64>().map_err(|e| {
            ProviderError::InvalidResponse(format!(
                "Non-numeric Binance price {:?} for {}: {}",
                ticker.price,
                coin.binance_symbol(),
                e
            ))
        })
    }
}

impl Default for BinanceProvider {
    fn default() -> Self {
        Self::new().expect("Failed to create Binance provider")
    }
}

#[async_trait]
impl PriceProvider for BinanceProvider {
    async fn fetch_price(&self, coin: Coin) -> Result<f64, ProviderError> {
        self.fetch_ticker(coin).await
    }

    async fn fetch_prices(&self, coins: &[Coin]) -> Result<HashMap<Coin, f64>, ProviderError> {
        if coins.is_empty() {
            return Ok(HashMap::new());
        }

        let fetches = coins.iter().map(|coin| async move {
            (*coin, self.fetch_ticker(*coin).await)
        });

        let mut result = HashMap::new();
        for (coin, outcome) in join_all(fetches).await {
            match outcome {
                Ok(price) => {
                    result.insert(coin, price);
                }
                Err(e) => {
                    tracing::warn!(
                        coin = coin.symbol(),
                        error = %e,
                        "Binance fetch failed for coin"
                    );
                }
            }
        }

        if result.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "No prices returned from Binance".to_string(),
            ));
        }

        tracing::debug!(count = result.len(), "Fetched prices from Binance");

        Ok(result)
    }

    fn provider_name(&self) -> &'static str {
        "binance"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_price_is_a_decimal_string() {
        let body = r#"{"symbol": "BTCUSDT", "price": "30050.12000000"}"#;
        let ticker: TickerPriceResponse = serde_json::from_str(body).unwrap();
        assert_eq!(ticker.price.parse::<f64>().unwrap(), 30050.12);
    }

    #[test]
    fn build_url_uses_spot_symbol() {
        let provider = BinanceProvider::new().unwrap();
        let url = provider.build_url(Coin::Solana);
        assert!(url.ends_with("/api/v3/ticker/price?symbol=SOLUSDT"));
    }
}
