//! # Crypto Tracker SDK
//!
//! Polls a public cryptocurrency price API (CoinGecko or Binance) on a
//! timer, keeps a bounded rolling price history per coin, evaluates
//! one-shot threshold alerts, and exports recorded history as a delimited
//! text table.
//!
//! Presentation is an external collaborator: the tracker hands out
//! immutable [`CycleSnapshot`]s over a broadcast channel and never renders
//! anything itself.
//!
//! ## Usage
//!
//! ```no_run
//! use crypto_tracker_sdk::{AlertDirection, Coin, ExportFormat, PriceTracker};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tracker = PriceTracker::new();
//! tracker.start_background_task();
//!
//! // Arm a one-shot alert; it clears itself after firing
//! tracker
//!     .set_alert(Coin::Bitcoin, 30_000.0, AlertDirection::Above)
//!     .await?;
//!
//! // Render from snapshots
//! let mut snapshots = tracker.subscribe();
//! let snapshot = snapshots.recv().await?;
//! for (coin, price) in &snapshot.prices {
//!     match price {
//!         Some(p) => println!("{}: ${:.2}", coin.symbol(), p),
//!         None => println!("{}: N/A", coin.symbol()),
//!     }
//! }
//!
//! // Export recorded history
//! tracker.export_to_file("history.csv", ExportFormat::Csv).await?;
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod error;
pub mod export;
pub mod history;
pub mod provider;
pub mod providers;
pub mod store;
pub mod tracker;
pub mod types;

// Re-export commonly used types
pub use error::{ProviderError, TrackerError};
pub use export::ExportFormat;
pub use provider::PriceProvider;
pub use store::TrackerState;
pub use tracker::PriceTracker;
pub use types::{Alert, AlertDirection, AlertEvent, Coin, CycleSnapshot};
