//! Tracker state: bounded price histories, current prices and alerts
//!
//! All transitions here are pure state mutations with no I/O, so the
//! fire-once alert semantics and the FIFO history invariant can be tested
//! without a provider or a runtime. The polling service in
//! [`crate::tracker`] is the single owner driving these mutations.

use crate::{
    error::TrackerError,
    history::BoundedLog,
    types::{Alert, AlertDirection, AlertEvent, Coin, CycleSnapshot},
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Per-coin slot: latest price, bounded history and an optional alert
#[derive(Debug, Clone)]
struct CoinSlot {
    current_price: Option<f64>,
    history: BoundedLog<f64>,
    alert: Option<Alert>,
}

impl CoinSlot {
    fn new(capacity: usize) -> Self {
        Self {
            current_price: None,
            history: BoundedLog::new(capacity),
            alert: None,
        }
    }
}

/// In-memory tracker state
///
/// Owns, per tracked coin, the most recent known price, a fixed-capacity
/// FIFO of recorded prices, and at most one armed alert; plus one shared
/// timestamp log with an entry per recorded cycle. The coin set is fixed
/// at construction.
#[derive(Debug, Clone)]
pub struct TrackerState {
    coins: Vec<Coin>,
    slots: HashMap<Coin, CoinSlot>,
    timestamps: BoundedLog<DateTime<Utc>>,
}

impl TrackerState {
    /// Creates empty state for the given coins with per-coin history capacity
    pub fn new(coins: &[Coin], capacity: usize) -> Self {
        let slots = coins
            .iter()
            .map(|coin| (*coin, CoinSlot::new(capacity)))
            .collect();

        Self {
            coins: coins.to_vec(),
            slots,
            timestamps: BoundedLog::new(capacity),
        }
    }

    /// The tracked coin set, in configuration order
    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Applies one poll cycle's worth of fetch results
    ///
    /// Coins mapped to `Some(price)` get their current price replaced and
    /// the price appended to their history; coins mapped to `None` (or
    /// absent from the map) are left untouched, so a failed fetch never
    /// overwrites the last known price with a stale or zero value. The
    /// returned snapshot lists those coins as unavailable so presentation
    /// can flag them for this cycle.
    ///
    /// The shared timestamp is recorded once per cycle, and only when at
    /// least one coin reported a price, keeping the timestamp log aligned
    /// with the longest history.
    ///
    /// Each armed alert is evaluated against the newly recorded price;
    /// a triggered alert emits one [`AlertEvent`] and is cleared, so it
    /// fires at most once until the user re-arms it.
    pub fn record_cycle(
        &mut self,
        prices: &HashMap<Coin, Option<f64>>,
        timestamp: DateTime<Utc>,
    ) -> CycleSnapshot {
        let mut events = Vec::new();
        let mut unavailable = Vec::new();
        let mut any_recorded = false;

        for coin in self.coins.clone() {
            let price = match prices.get(&coin) {
                Some(Some(price)) => *price,
                _ => {
                    unavailable.push(coin);
                    continue;
                }
            };

            let Some(slot) = self.slots.get_mut(&coin) else {
                continue;
            };
            slot.current_price = Some(price);
            slot.history.push(price);
            any_recorded = true;

            if let Some(alert) = slot.alert {
                if alert.is_triggered_by(price) {
                    let event = AlertEvent::new(coin, alert, price, timestamp);
                    tracing::info!(
                        coin = coin.symbol(),
                        threshold = alert.threshold,
                        direction = alert.direction.as_str(),
                        price,
                        "Price alert triggered"
                    );
                    events.push(event);
                    slot.alert = None;
                }
            }
        }

        if any_recorded {
            self.timestamps.push(timestamp);
        }

        self.snapshot_with(timestamp, unavailable, events)
    }

    /// Arms (or replaces) the alert for a coin
    ///
    /// Rejects non-finite thresholds and coins outside the tracked set;
    /// an existing alert, if any, is left unchanged on rejection.
    pub fn set_alert(
        &mut self,
        coin: Coin,
        threshold: f64,
        direction: AlertDirection,
    ) -> Result<(), TrackerError> {
        if !threshold.is_finite() {
            return Err(TrackerError::NonFiniteThreshold { value: threshold });
        }

        let Some(slot) = self.slots.get_mut(&coin) else {
            return Err(TrackerError::untracked_coin(coin.symbol()));
        };

        slot.alert = Some(Alert {
            threshold,
            direction,
        });
        tracing::info!(
            coin = coin.symbol(),
            threshold,
            direction = direction.as_str(),
            "Alert armed"
        );
        Ok(())
    }

    /// Arms, replaces or clears an alert from raw user input
    ///
    /// Blank input clears any existing alert and returns `Ok(None)`.
    /// Thousands separators are tolerated ("30,000" parses as 30000).
    /// Unparseable input is rejected without touching the alert state.
    pub fn set_alert_from_input(
        &mut self,
        coin: Coin,
        threshold_input: &str,
        direction_input: &str,
    ) -> Result<Option<Alert>, TrackerError> {
        let text = threshold_input.trim();
        if text.is_empty() {
            self.clear_alert(coin);
            return Ok(None);
        }

        let direction: AlertDirection = direction_input.parse()?;
        let threshold: f64 = text
            .replace(',', "")
            .parse()
            .map_err(|_| TrackerError::invalid_threshold(text))?;

        self.set_alert(coin, threshold, direction)?;
        Ok(self.alert(coin))
    }

    /// Disarms the alert for a coin, if any
    pub fn clear_alert(&mut self, coin: Coin) {
        if let Some(slot) = self.slots.get_mut(&coin) {
            if slot.alert.take().is_some() {
                tracing::info!(coin = coin.symbol(), "Alert cleared");
            }
        }
    }

    /// Empties every price history and the shared timestamp log
    ///
    /// Current prices and armed alerts are untouched.
    pub fn clear_history(&mut self) {
        for slot in self.slots.values_mut() {
            slot.history.clear();
        }
        self.timestamps.clear();
        tracing::info!("Price history cleared");
    }

    /// The armed alert for a coin, if any
    pub fn alert(&self, coin: Coin) -> Option<Alert> {
        self.slots.get(&coin).and_then(|slot| slot.alert)
    }

    /// The most recent known price for a coin, `None` if never fetched
    pub fn current_price(&self, coin: Coin) -> Option<f64> {
        self.slots.get(&coin).and_then(|slot| slot.current_price)
    }

    /// Recorded prices for a coin, oldest first
    pub fn history(&self, coin: Coin) -> Vec<f64> {
        self.slots
            .get(&coin)
            .map(|slot| slot.history.to_vec())
            .unwrap_or_default()
    }

    /// Recorded cycle timestamps, oldest first
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.timestamps.to_vec()
    }

    /// True when no coin has any recorded history
    pub fn is_history_empty(&self) -> bool {
        self.slots.values().all(|slot| slot.history.is_empty())
    }

    /// Length of the longest per-coin history
    pub fn max_history_len(&self) -> usize {
        self.slots
            .values()
            .map(|slot| slot.history.len())
            .max()
            .unwrap_or(0)
    }

    /// An immutable view of the current state, outside any poll cycle
    pub fn snapshot(&self) -> CycleSnapshot {
        self.snapshot_with(Utc::now(), Vec::new(), Vec::new())
    }

    fn snapshot_with(
        &self,
        timestamp: DateTime<Utc>,
        unavailable: Vec<Coin>,
        events: Vec<AlertEvent>,
    ) -> CycleSnapshot {
        let prices = self
            .coins
            .iter()
            .map(|coin| (*coin, self.current_price(*coin)))
            .collect();
        let histories = self
            .coins
            .iter()
            .map(|coin| (*coin, self.history(*coin)))
            .collect();

        CycleSnapshot {
            timestamp,
            prices,
            unavailable,
            histories,
            events,
        }
    }
}
