//! Polling service driving the tracker state
//!
//! One background task owns the fetch-apply loop: fetch prices, normalize
//! to per-coin availability, record the cycle, broadcast the snapshot,
//! sleep for the poll interval. The loop is strictly serial, so at most
//! one fetch cycle is in flight and all state mutation happens from this
//! single owner. The poll interval itself is the retry cadence; there is
//! no backoff and no cancellation of in-flight requests.

use crate::{
    constants::{
        DEFAULT_POLL_INTERVAL_SECS, ENABLED_COINS, MAX_HISTORY, MAX_POLL_INTERVAL_SECS,
        MIN_POLL_INTERVAL_SECS,
    },
    error::TrackerError,
    export::ExportFormat,
    provider::PriceProvider,
    providers::{BinanceProvider, CoinGeckoProvider},
    store::TrackerState,
    types::{Alert, AlertDirection, Coin, CycleSnapshot},
};
use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::time::{sleep, Duration};

/// Capacity of the snapshot broadcast channel
const SNAPSHOT_CHANNEL_CAPACITY: usize = 32;

/// Coin price polling service
///
/// # Example
/// ```no_run
/// use crypto_tracker_sdk::{PriceTracker, Coin};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tracker = PriceTracker::new();
/// tracker.start_background_task();
///
/// let mut snapshots = tracker.subscribe();
/// while let Ok(snapshot) = snapshots.recv().await {
///     for event in &snapshot.events {
///         println!("ALERT: {}", event);
///     }
///     if let Some(Some(price)) = snapshot.prices.get(&Coin::Bitcoin) {
///         println!("BTC: ${:.2}", price);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct PriceTracker {
    coins: Vec<Coin>,
    state: Arc<RwLock<TrackerState>>,
    provider: Arc<dyn PriceProvider>,
    interval_secs: Arc<RwLock<u64>>,
    snapshot_tx: broadcast::Sender<CycleSnapshot>,
    polling_started: AtomicBool,
}

impl Default for PriceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceTracker {
    /// Creates a tracker for the default coin set
    ///
    /// The provider is chosen via the `PRICE_PROVIDER` environment
    /// variable ("coingecko" or "binance"). Defaults to coingecko.
    pub fn new() -> Self {
        let provider_name =
            std::env::var("PRICE_PROVIDER").unwrap_or_else(|_| "coingecko".to_string());

        let provider: Arc<dyn PriceProvider> = match provider_name.to_lowercase().as_str() {
            "binance" => Arc::new(BinanceProvider::default()),
            _ => Arc::new(CoinGeckoProvider::default()),
        };

        Self::with_provider(provider)
    }

    /// Creates a tracker for the default coin set with a custom provider
    pub fn with_provider(provider: Arc<dyn PriceProvider>) -> Self {
        Self::with_provider_and_coins(provider, ENABLED_COINS)
    }

    /// Creates a tracker for a specific coin set with a custom provider
    ///
    /// The coin set is fixed for the lifetime of the tracker.
    pub fn with_provider_and_coins(provider: Arc<dyn PriceProvider>, coins: &[Coin]) -> Self {
        let state = Arc::new(RwLock::new(TrackerState::new(coins, MAX_HISTORY)));
        let (snapshot_tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);

        Self {
            coins: coins.to_vec(),
            state,
            provider,
            interval_secs: Arc::new(RwLock::new(DEFAULT_POLL_INTERVAL_SECS)),
            snapshot_tx,
            polling_started: AtomicBool::new(false),
        }
    }

    /// Starts the background polling task
    ///
    /// The next cycle is scheduled only after the previous one's results
    /// have been applied, so cycles never overlap. Exactly one polling
    /// loop exists per tracker: calling this again is a no-op.
    pub fn start_background_task(&self) {
        if self.polling_started.swap(true, Ordering::SeqCst) {
            tracing::warn!("Polling task already started, ignoring");
            return;
        }

        let coins = self.coins.clone();
        let state = self.state.clone();
        let provider = self.provider.clone();
        let interval_secs = self.interval_secs.clone();
        let snapshot_tx = self.snapshot_tx.clone();

        tokio::spawn(async move {
            tracing::info!(
                provider = provider.provider_name(),
                coins = coins.len(),
                "Starting price tracker background task"
            );

            loop {
                Self::run_cycle(&provider, &coins, &state, &snapshot_tx).await;

                let secs = *interval_secs.read().await;
                sleep(Duration::from_secs(secs)).await;
            }
        });
    }

    /// Runs one fetch-and-record cycle and broadcasts the snapshot
    async fn run_cycle(
        provider: &Arc<dyn PriceProvider>,
        coins: &[Coin],
        state: &Arc<RwLock<TrackerState>>,
        snapshot_tx: &broadcast::Sender<CycleSnapshot>,
    ) -> CycleSnapshot {
        // Normalize the provider result to coin -> price-or-unavailable
        // before any state is touched. A wholesale failure marks every
        // coin unavailable for this cycle; the next tick retries.
        let prices: HashMap<Coin, Option<f64>> = match provider.fetch_prices(coins).await {
            Ok(found) => coins.iter().map(|c| (*c, found.get(c).copied())).collect(),
            Err(e) => {
                tracing::warn!(
                    provider = provider.provider_name(),
                    error = %e,
                    "Price fetch failed, marking all coins unavailable"
                );
                coins.iter().map(|c| (*c, None)).collect()
            }
        };

        let snapshot = state.write().await.record_cycle(&prices, Utc::now());

        // No receivers is fine: presentation may not have subscribed yet
        let _ = snapshot_tx.send(snapshot.clone());

        snapshot
    }

    /// Runs one poll cycle immediately, outside the timer
    pub async fn poll_once(&self) -> CycleSnapshot {
        Self::run_cycle(&self.provider, &self.coins, &self.state, &self.snapshot_tx).await
    }

    /// Subscribes to per-cycle snapshots for presentation
    pub fn subscribe(&self) -> broadcast::Receiver<CycleSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Changes the poll interval, effective from the next scheduled sleep
    ///
    /// Values outside the accepted range are rejected before they can
    /// reach the scheduler.
    pub async fn set_poll_interval(&self, secs: u64) -> Result<(), TrackerError> {
        if !(MIN_POLL_INTERVAL_SECS..=MAX_POLL_INTERVAL_SECS).contains(&secs) {
            return Err(TrackerError::invalid_interval(secs));
        }
        *self.interval_secs.write().await = secs;
        tracing::info!(secs, "Poll interval updated");
        Ok(())
    }

    /// The currently configured poll interval in seconds
    pub async fn poll_interval_secs(&self) -> u64 {
        *self.interval_secs.read().await
    }

    /// The tracked coin set
    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Returns the name of the current provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Arms (or replaces) the alert for a coin
    pub async fn set_alert(
        &self,
        coin: Coin,
        threshold: f64,
        direction: AlertDirection,
    ) -> Result<(), TrackerError> {
        self.state.write().await.set_alert(coin, threshold, direction)
    }

    /// Arms, replaces or clears an alert from raw user input
    pub async fn set_alert_from_input(
        &self,
        coin: Coin,
        threshold_input: &str,
        direction_input: &str,
    ) -> Result<Option<Alert>, TrackerError> {
        self.state
            .write()
            .await
            .set_alert_from_input(coin, threshold_input, direction_input)
    }

    /// Disarms the alert for a coin, if any
    pub async fn clear_alert(&self, coin: Coin) {
        self.state.write().await.clear_alert(coin);
    }

    /// The armed alert for a coin, if any
    pub async fn alert(&self, coin: Coin) -> Option<Alert> {
        self.state.read().await.alert(coin)
    }

    /// Empties all recorded history; current prices and alerts survive
    pub async fn clear_history(&self) {
        self.state.write().await.clear_history();
    }

    /// The most recent known price for a coin, `None` if never fetched
    pub async fn current_price(&self, coin: Coin) -> Option<f64> {
        self.state.read().await.current_price(coin)
    }

    /// Most recent known price per tracked coin
    pub async fn all_prices(&self) -> HashMap<Coin, Option<f64>> {
        let state = self.state.read().await;
        self.coins
            .iter()
            .map(|coin| (*coin, state.current_price(*coin)))
            .collect()
    }

    /// Recorded prices for a coin, oldest first
    pub async fn history(&self, coin: Coin) -> Vec<f64> {
        self.state.read().await.history(coin)
    }

    /// An immutable view of the current state
    pub async fn snapshot(&self) -> CycleSnapshot {
        self.state.read().await.snapshot()
    }

    /// Renders the recorded history as a delimited table
    ///
    /// Returns `None` when nothing has been recorded yet.
    pub async fn export(&self, format: ExportFormat) -> Option<String> {
        self.state.read().await.export(format)
    }

    /// Writes the recorded history to a file
    ///
    /// Returns `Ok(false)` without touching the filesystem when there is
    /// no history to export.
    pub async fn export_to_file(
        &self,
        path: impl AsRef<Path>,
        format: ExportFormat,
    ) -> Result<bool, TrackerError> {
        let Some(table) = self.export(format).await else {
            tracing::info!("No price history recorded yet, skipping export");
            return Ok(false);
        };

        std::fs::write(path.as_ref(), table)?;
        tracing::info!(path = %path.as_ref().display(), "Price history exported");
        Ok(true)
    }
}
