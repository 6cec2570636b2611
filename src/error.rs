//! Error types for the crypto price tracker

use thiserror::Error;

/// Errors that can occur when fetching prices from a provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Invalid response from provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Coin not supported by this provider
    #[error("Coin not supported: {0}")]
    UnsupportedCoin(String),

    /// Provider API error
    #[error("Provider API error: {0}")]
    ApiError(String),

    /// Timeout waiting for response
    #[error("Request timeout")]
    Timeout,
}

/// Errors that can occur when driving the tracker state
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Alert threshold input could not be parsed as a number
    #[error("Invalid alert threshold: {input:?} is not a number")]
    InvalidThreshold { input: String },

    /// Alert threshold parsed but is not a finite number
    #[error("Invalid alert threshold: {value} is not finite")]
    NonFiniteThreshold { value: f64 },

    /// Alert direction input was not "above" or "below"
    #[error("Invalid alert direction: {input:?}")]
    InvalidDirection { input: String },

    /// Coin is not part of the tracked set fixed at construction
    #[error("Coin not tracked: {coin}")]
    UntrackedCoin { coin: String },

    /// Poll interval outside the accepted range
    #[error("Invalid poll interval: {secs}s (accepted range: {min}s to {max}s)")]
    InvalidInterval { secs: u64, min: u64, max: u64 },

    /// Writing an export file failed
    #[error("Export I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrackerError {
    /// Creates an InvalidThreshold error
    pub fn invalid_threshold(input: impl Into<String>) -> Self {
        Self::InvalidThreshold {
            input: input.into(),
        }
    }

    /// Creates an InvalidDirection error
    pub fn invalid_direction(input: impl Into<String>) -> Self {
        Self::InvalidDirection {
            input: input.into(),
        }
    }

    /// Creates an UntrackedCoin error
    pub fn untracked_coin(coin: impl Into<String>) -> Self {
        Self::UntrackedCoin { coin: coin.into() }
    }

    /// Creates an InvalidInterval error
    pub fn invalid_interval(secs: u64) -> Self {
        Self::InvalidInterval {
            secs,
            min: crate::constants::MIN_POLL_INTERVAL_SECS,
            max: crate::constants::MAX_POLL_INTERVAL_SECS,
        }
    }
}
