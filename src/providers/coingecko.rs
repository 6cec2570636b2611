//! CoinGecko price provider implementation

use crate::{
    constants::{
        COINGECKO_API_URL, COINGECKO_SIMPLE_PRICE_ENDPOINT, REQUEST_TIMEOUT_SECS, USER_AGENT,
        VS_CURRENCY,
    },
    error::ProviderError,
    provider::PriceProvider,
    types::Coin,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// CoinGecko API response for simple price queries
///
/// Shape: `{"bitcoin": {"usd": 12345.67}, "ethereum": {"usd": 234.56}}`
#[derive(Debug, Deserialize)]
struct CoinGeckoResponse {
    #[serde(flatten)]
    prices: HashMap<String, HashMap<String, f64>>,
}

/// CoinGecko price provider
///
/// Fetches all requested coins in a single batched request. Ids missing
/// from the response degrade per coin rather than failing the batch.
pub struct CoinGeckoProvider {
    client: Client,
}

impl CoinGeckoProvider {
    /// Creates a new CoinGecko provider
    pub fn new() -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::NetworkError)?;

        Ok(Self { client })
    }

    /// Builds the CoinGecko API URL for fetching prices
    fn build_url(&self, coins: &[Coin]) -> String {
        let ids = coins
            .iter()
            .map(|c| c.coingecko_id())
            .collect::<Vec<_>>()
            .join(",");

        format!(
            "{}{}?ids={}&vs_currencies={}",
            COINGECKO_API_URL, COINGECKO_SIMPLE_PRICE_ENDPOINT, ids, VS_CURRENCY
        )
    }

    /// Parses the CoinGecko response into a coin-to-price map
    fn parse_response(&self, response: CoinGeckoResponse, coins: &[Coin]) -> HashMap<Coin, f64> {
        let mut result = HashMap::new();

        for coin in coins {
            let id = coin.coingecko_id();
            if let Some(price) = response.prices.get(id).and_then(|q| q.get(VS_CURRENCY)) {
                result.insert(*coin, *price);
            } else {
                tracing::warn!(coin = coin.symbol(), "CoinGecko response missing coin");
            }
        }

        result
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new().expect("Failed to create CoinGecko provider")
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoProvider {
    async fn fetch_price(&self, coin: Coin) -> Result<f64, ProviderError> {
        let prices = self.fetch_prices(&[coin]).await?;
        prices
            .get(&coin)
            .copied()
            .ok_or_else(|| ProviderError::UnsupportedCoin(coin.symbol().to_string()))
    }

    async fn fetch_prices(&self, coins: &[Coin]) -> Result<HashMap<Coin, f64>, ProviderError> {
        if coins.is_empty() {
            return Ok(HashMap::new());
        }

        let url = self.build_url(coins);
        tracing::debug!(url = %url, "Fetching prices from CoinGecko");

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

        let response_text = response.text().await.map_err(ProviderError::NetworkError)?;

        let coingecko_response: CoinGeckoResponse = serde_json::from_str(&response_text)
            .map_err(|e| {
                ProviderError::InvalidResponse(format!(
                    "Failed to parse CoinGecko response: {}. Response: {}",
                    e, response_text
                ))
            })?;

        let prices = self.parse_response(coingecko_response, coins);

        if prices.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "No prices returned from CoinGecko".to_string(),
            ));
        }

        tracing::debug!(count = prices.len(), "Fetched prices from CoinGecko");

        Ok(prices)
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_response_degrades_per_coin() {
        let provider = CoinGeckoProvider::new().unwrap();
        let body = r#"{"bitcoin": {"usd": 30050.5}, "solana": {"usd": 150.25}}"#;
        let response: CoinGeckoResponse = serde_json::from_str(body).unwrap();

        let coins = [Coin::Bitcoin, Coin::Ethereum, Coin::Solana];
        let prices = provider.parse_response(response, &coins);

        assert_eq!(prices.get(&Coin::Bitcoin), Some(&30050.5));
        assert_eq!(prices.get(&Coin::Solana), Some(&150.25));
        assert!(!prices.contains_key(&Coin::Ethereum));
    }

    #[test]
    fn build_url_joins_ids() {
        let provider = CoinGeckoProvider::new().unwrap();
        let url = provider.build_url(&[Coin::Bitcoin, Coin::Ethereum]);
        assert!(url.contains("ids=bitcoin,ethereum"));
        assert!(url.contains("vs_currencies=usd"));
    }
}
