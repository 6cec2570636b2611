//! Provider abstraction for fetching coin prices from external APIs

use crate::{error::ProviderError, types::Coin};
use async_trait::async_trait;
use std::collections::HashMap;

/// Trait for coin price providers
///
/// Implementations fetch spot prices from various sources (CoinGecko,
/// Binance, etc.). A coin missing from the returned map means the provider
/// could not resolve a price for it this round; only a total failure
/// (transport error, unparseable body) is reported as `Err`.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetches the current price for a single coin
    async fn fetch_price(&self, coin: Coin) -> Result<f64, ProviderError>;

    /// Fetches prices for multiple coins
    ///
    /// A failure affecting one coin must not prevent others from being
    /// reported: the affected coin is simply absent from the result.
    async fn fetch_prices(&self, coins: &[Coin]) -> Result<HashMap<Coin, f64>, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock provider for testing
    pub struct MockProvider {
        responses: Arc<Mutex<HashMap<Coin, Result<f64, ProviderError>>>>,
        fail_all: Arc<Mutex<bool>>,
        call_count: Arc<Mutex<usize>>,
    }

    impl Default for MockProvider {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self {
                responses: Arc::new(Mutex::new(HashMap::new())),
                fail_all: Arc::new(Mutex::new(false)),
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        pub fn set_price(&self, coin: Coin, price: f64) {
            self.responses.lock().unwrap().insert(coin, Ok(price));
        }

        pub fn set_error(&self, coin: Coin, error: ProviderError) {
            self.responses.lock().unwrap().insert(coin, Err(error));
        }

        pub fn remove_price(&self, coin: Coin) {
            self.responses.lock().unwrap().remove(&coin);
        }

        /// Makes every fetch fail wholesale, as if the network were down
        pub fn set_fail_all(&self, fail: bool) {
            *self.fail_all.lock().unwrap() = fail;
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl PriceProvider for MockProvider {
        async fn fetch_price(&self, coin: Coin) -> Result<f64, ProviderError> {
            let responses = self.responses.lock().unwrap();
            match responses.get(&coin) {
                Some(Ok(price)) => Ok(*price),
                Some(Err(_)) => Err(ProviderError::ApiError(format!(
                    "mock failure for {}",
                    coin.symbol()
                ))),
                None => Err(ProviderError::UnsupportedCoin(coin.symbol().to_string())),
            }
        }

        async fn fetch_prices(
            &self,
            coins: &[Coin],
        ) -> Result<HashMap<Coin, f64>, ProviderError> {
            *self.call_count.lock().unwrap() += 1;
            if *self.fail_all.lock().unwrap() {
                return Err(ProviderError::ApiError("mock outage".to_string()));
            }
            let mut result = HashMap::new();
            for coin in coins {
                if let Ok(price) = self.fetch_price(*coin).await {
                    result.insert(*coin, price);
                }
            }
            Ok(result)
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }
}
