use async_trait::async_trait;

use crate::{BarWindow, Interval, Result};

/// Source of historical OHLCV bars.
///
/// `YahooClient` implements this against the Yahoo Finance chart API.
/// Tests substitute in-memory fakes so strategy arithmetic runs without
/// any network access.
///
/// Implementations fail with `Error::DataUnavailable` on network or lookup
/// failure and on an empty result. They must not retry internally; a failed
/// fetch fails the whole evaluation.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetch up to `lookback` of the most recent bars for `symbol`.
    async fn fetch_bars(&self, symbol: &str, interval: Interval, lookback: usize)
        -> Result<BarWindow>;
}
