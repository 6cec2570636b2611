//! History export as a delimited text table
//!
//! One row per time index, first column the cycle timestamp, one column
//! per coin. Coins start recording at different times, so shorter
//! histories are right-aligned: their newest value always lands on the
//! last row and the missing leading cells stay empty.

use crate::store::TrackerState;

/// Timestamp format used in the export's first column
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Supported export table formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values
    Csv,
    /// Tab-separated values
    Tsv,
}

impl ExportFormat {
    /// Cell delimiter for this format
    pub fn delimiter(&self) -> char {
        match self {
            ExportFormat::Csv => ',',
            ExportFormat::Tsv => '\t',
        }
    }

    /// Conventional file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
        }
    }
}

impl TrackerState {
    /// Renders the recorded history as a delimited table
    ///
    /// Returns `None` when nothing has been recorded yet, which callers
    /// report as a no-op rather than an error. Column headers are coin
    /// display names; the timestamp column is left-padded with empty
    /// cells when the timestamp log is shorter than the longest history.
    pub fn export(&self, format: ExportFormat) -> Option<String> {
        if self.is_history_empty() {
            return None;
        }

        let delimiter = format.delimiter();
        let max_len = self.max_history_len();
        let coins = self.coins().to_vec();

        let mut out = String::new();
        out.push_str("timestamp");
        for coin in &coins {
            out.push(delimiter);
            out.push_str(coin.display_name());
        }
        out.push('\n');

        // Timestamps aligned to the newest entries: pad the top when the
        // log is shorter than the longest history, drop the oldest when
        // it is longer.
        let timestamps: Vec<String> = self
            .timestamps()
            .iter()
            .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
            .collect();
        let ts_skip = timestamps.len().saturating_sub(max_len);
        let ts_pad = max_len.saturating_sub(timestamps.len());

        let histories: Vec<(usize, Vec<f64>)> = coins
            .iter()
            .map(|coin| {
                let history = self.history(*coin);
                (max_len - history.len(), history)
            })
            .collect();

        for idx in 0..max_len {
            if idx >= ts_pad {
                out.push_str(&timestamps[ts_skip + idx - ts_pad]);
            }
            for (pad, history) in &histories {
                out.push(delimiter);
                if idx >= *pad {
                    out.push_str(&history[idx - pad].to_string());
                }
            }
            out.push('\n');
        }

        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coin;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    fn cycle(prices: &[(Coin, Option<f64>)]) -> HashMap<Coin, Option<f64>> {
        prices.iter().copied().collect()
    }

    fn ts(secs: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, secs).unwrap()
    }

    #[test]
    fn empty_history_exports_nothing() {
        let state = TrackerState::new(&[Coin::Bitcoin], 10);
        assert_eq!(state.export(ExportFormat::Csv), None);
    }

    #[test]
    fn header_uses_display_names() {
        let mut state = TrackerState::new(&[Coin::Bitcoin, Coin::Ethereum], 10);
        state.record_cycle(
            &cycle(&[(Coin::Bitcoin, Some(30000.0)), (Coin::Ethereum, Some(2000.0))]),
            ts(0),
        );

        let table = state.export(ExportFormat::Csv).unwrap();
        let header = table.lines().next().unwrap();
        assert_eq!(header, "timestamp,Bitcoin (BTC),Ethereum (ETH)");
    }

    #[test]
    fn shorter_history_is_right_aligned() {
        let mut state = TrackerState::new(&[Coin::Bitcoin, Coin::Ethereum], 10);
        // Ethereum unavailable for the first two cycles: 3 BTC points, 1 ETH point
        state.record_cycle(&cycle(&[(Coin::Bitcoin, Some(100.0))]), ts(0));
        state.record_cycle(&cycle(&[(Coin::Bitcoin, Some(101.0))]), ts(1));
        state.record_cycle(
            &cycle(&[(Coin::Bitcoin, Some(102.0)), (Coin::Ethereum, Some(2000.0))]),
            ts(2),
        );

        let table = state.export(ExportFormat::Csv).unwrap();
        let rows: Vec<&str> = table.lines().skip(1).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], "2024-01-01 12:00:00,100,");
        assert_eq!(rows[1], "2024-01-01 12:00:01,101,");
        assert_eq!(rows[2], "2024-01-01 12:00:02,102,2000");
    }

    #[test]
    fn every_row_carries_a_timestamp_when_logs_are_in_lockstep() {
        let mut state = TrackerState::new(&[Coin::Bitcoin], 10);
        state.record_cycle(&cycle(&[(Coin::Bitcoin, Some(100.0))]), ts(0));
        state.record_cycle(&cycle(&[(Coin::Bitcoin, Some(101.0))]), ts(1));

        let table = state.export(ExportFormat::Csv).unwrap();
        let rows: Vec<&str> = table.lines().skip(1).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| !row.starts_with(',')));
    }

    #[test]
    fn long_timestamp_log_keeps_newest_entries() {
        // capacity 2 histories with capacity-2 timestamps stay in lockstep,
        // so the newest timestamps must appear after wraparound
        let mut state = TrackerState::new(&[Coin::Bitcoin], 2);
        for i in 0..4 {
            state.record_cycle(&cycle(&[(Coin::Bitcoin, Some(100.0 + i as f64))]), ts(i));
        }

        let table = state.export(ExportFormat::Csv).unwrap();
        let rows: Vec<&str> = table.lines().skip(1).collect();
        assert_eq!(rows, vec!["2024-01-01 12:00:02,102", "2024-01-01 12:00:03,103"]);
    }

    #[test]
    fn tsv_uses_tab_delimiter() {
        let mut state = TrackerState::new(&[Coin::Bitcoin], 10);
        state.record_cycle(&cycle(&[(Coin::Bitcoin, Some(100.5))]), ts(0));

        let table = state.export(ExportFormat::Tsv).unwrap();
        assert!(table.starts_with("timestamp\tBitcoin (BTC)\n"));
        assert!(table.contains("2024-01-01 12:00:00\t100.5"));
        assert_eq!(ExportFormat::Tsv.extension(), "tsv");
    }
}
