//! Types for the crypto price tracker

use crate::error::TrackerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

/// Supported cryptocurrencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coin {
    /// Bitcoin
    Bitcoin,
    /// Ethereum
    Ethereum,
    /// Solana
    Solana,
    /// Dogecoin
    Dogecoin,
    /// Cardano
    Cardano,
}

impl Coin {
    /// Get the ticker symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Coin::Bitcoin => "BTC",
            Coin::Ethereum => "ETH",
            Coin::Solana => "SOL",
            Coin::Dogecoin => "DOGE",
            Coin::Cardano => "ADA",
        }
    }

    /// Get the human-readable display name, used as export column header
    pub fn display_name(&self) -> &'static str {
        match self {
            Coin::Bitcoin => "Bitcoin (BTC)",
            Coin::Ethereum => "Ethereum (ETH)",
            Coin::Solana => "Solana (SOL)",
            Coin::Dogecoin => "Dogecoin (DOGE)",
            Coin::Cardano => "Cardano (ADA)",
        }
    }

    /// Get the CoinGecko ID for this coin
    pub fn coingecko_id(&self) -> &'static str {
        match self {
            Coin::Bitcoin => "bitcoin",
            Coin::Ethereum => "ethereum",
            Coin::Solana => "solana",
            Coin::Dogecoin => "dogecoin",
            Coin::Cardano => "cardano",
        }
    }

    /// Get the Binance spot market symbol for this coin (USDT quoted)
    pub fn binance_symbol(&self) -> &'static str {
        match self {
            Coin::Bitcoin => "BTCUSDT",
            Coin::Ethereum => "ETHUSDT",
            Coin::Solana => "SOLUSDT",
            Coin::Dogecoin => "DOGEUSDT",
            Coin::Cardano => "ADAUSDT",
        }
    }

    /// Get all supported coins
    pub fn all() -> &'static [Coin] {
        &[
            Coin::Bitcoin,
            Coin::Ethereum,
            Coin::Solana,
            Coin::Dogecoin,
            Coin::Cardano,
        ]
    }
}

impl std::fmt::Display for Coin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Which side of the threshold an alert watches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    /// Trigger when price >= threshold
    Above,
    /// Trigger when price <= threshold
    Below,
}

impl AlertDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertDirection::Above => "above",
            AlertDirection::Below => "below",
        }
    }
}

impl FromStr for AlertDirection {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "above" => Ok(AlertDirection::Above),
            "below" => Ok(AlertDirection::Below),
            other => Err(TrackerError::invalid_direction(other)),
        }
    }
}

/// A one-shot price alert: armed by the user, cleared automatically on firing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Price threshold in the quote currency
    pub threshold: f64,
    /// Direction of the crossing to watch
    pub direction: AlertDirection,
}

impl Alert {
    /// Returns true if the given price satisfies the alert condition
    pub fn is_triggered_by(&self, price: f64) -> bool {
        match self.direction {
            AlertDirection::Above => price >= self.threshold,
            AlertDirection::Below => price <= self.threshold,
        }
    }
}

/// Notification emitted when an alert fires
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Event ID
    pub id: Uuid,
    /// Coin the alert was armed on
    pub coin: Coin,
    /// Threshold that was crossed
    pub threshold: f64,
    /// Direction of the crossing
    pub direction: AlertDirection,
    /// The price that caused the trigger
    pub price: f64,
    /// When the triggering cycle was recorded
    pub timestamp: DateTime<Utc>,
}

impl AlertEvent {
    pub fn new(coin: Coin, alert: Alert, price: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            coin,
            threshold: alert.threshold,
            direction: alert.direction,
            price,
            timestamp,
        }
    }
}

impl std::fmt::Display for AlertEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} is {} {} (current: ${:.2})",
            self.coin.display_name(),
            self.direction.as_str(),
            self.threshold,
            self.price
        )
    }
}

/// Immutable view of the tracker state after one poll cycle
///
/// Handed to presentation for label/chart updates. Rendering works from
/// this clone and never touches the tracker's internal state.
#[derive(Debug, Clone, Serialize)]
pub struct CycleSnapshot {
    /// Timestamp of the cycle that produced this snapshot
    pub timestamp: DateTime<Utc>,
    /// Most recent known price per coin, `None` if never fetched
    pub prices: HashMap<Coin, Option<f64>>,
    /// Coins whose fetch failed this cycle, in configuration order
    ///
    /// `prices` keeps the last known value for these coins; presentation
    /// uses this list to show an explicit unavailable indicator instead
    /// of a stale or zero value.
    pub unavailable: Vec<Coin>,
    /// Recorded price history per coin, oldest first
    pub histories: HashMap<Coin, Vec<f64>>,
    /// Alerts that fired during this cycle
    pub events: Vec<AlertEvent>,
}

impl CycleSnapshot {
    /// True if the coin's fetch failed during the cycle that produced
    /// this snapshot
    pub fn is_unavailable(&self, coin: Coin) -> bool {
        self.unavailable.contains(&coin)
    }
}
