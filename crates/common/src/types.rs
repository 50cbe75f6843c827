use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One OHLCV sample. Bars are never mutated after the provider returns them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open time.
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Midpoint of the candle body.
    pub fn body_mid(&self) -> f64 {
        (self.open + self.close) / 2.0
    }

    /// Check finite positive prices, `low <= high` and non-negative volume.
    pub fn validate(&self) -> Result<()> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !(p.is_finite() && *p > 0.0)) {
            return Err(Error::DataUnavailable(format!(
                "non-positive price in bar at {}",
                self.timestamp
            )));
        }
        if self.low > self.high {
            return Err(Error::DataUnavailable(format!(
                "bar at {} has low {} above high {}",
                self.timestamp, self.low, self.high
            )));
        }
        if !(self.volume >= 0.0) {
            return Err(Error::DataUnavailable(format!(
                "negative volume in bar at {}",
                self.timestamp
            )));
        }
        Ok(())
    }
}

/// Bar granularity requested from a data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum Interval {
    M1,
    M5,
    M15,
    #[default]
    M30,
    H1,
    D1,
    W1,
}

impl Interval {
    /// Canonical short code, e.g. `30m`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::M1 => "1m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "1h",
            Interval::D1 => "1d",
            Interval::W1 => "1wk",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "1m" | "1min" => Ok(Interval::M1),
            "5m" | "5min" => Ok(Interval::M5),
            "15m" | "15min" => Ok(Interval::M15),
            "30m" | "30min" => Ok(Interval::M30),
            "1h" | "60m" | "60min" => Ok(Interval::H1),
            "1d" | "d" | "day" => Ok(Interval::D1),
            "1wk" | "1w" | "w" | "week" => Ok(Interval::W1),
            other => Err(Error::Config(format!("unsupported interval '{other}'"))),
        }
    }
}

impl TryFrom<String> for Interval {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Interval> for String {
    fn from(i: Interval) -> Self {
        i.as_str().to_string()
    }
}

/// Chronologically ordered bars for one symbol, most recent last.
///
/// Construction rejects empty input, malformed bars and timestamps that do
/// not strictly increase, so every accessor may assume at least one bar.
#[derive(Debug, Clone)]
pub struct BarWindow {
    symbol: String,
    interval: Interval,
    bars: Vec<Bar>,
}

impl BarWindow {
    pub fn new(symbol: impl Into<String>, interval: Interval, bars: Vec<Bar>) -> Result<Self> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(Error::DataUnavailable(format!("no bars returned for {symbol}")));
        }
        bars.iter().try_for_each(Bar::validate)?;
        if let Some(w) = bars.windows(2).find(|w| w[1].timestamp <= w[0].timestamp) {
            return Err(Error::DataUnavailable(format!(
                "bars for {symbol} out of order at {}",
                w[1].timestamp
            )));
        }
        Ok(Self {
            symbol,
            interval,
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest(&self) -> &Bar {
        // Non-empty by construction.
        &self.bars[self.bars.len() - 1]
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// The most recent `n` bars.
    pub fn tail(&self, n: usize) -> Result<&[Bar]> {
        self.back(0, n)
    }

    /// `n` bars ending `offset` bars before the most recent one.
    ///
    /// `back(1, 10)` is the ten bars preceding the latest bar.
    pub fn back(&self, offset: usize, n: usize) -> Result<&[Bar]> {
        let required = offset + n;
        if self.bars.len() < required {
            return Err(Error::insufficient(required, self.bars.len()));
        }
        let end = self.bars.len() - offset;
        Ok(&self.bars[end - n..end])
    }
}

/// Proposed long trade produced by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradePlan {
    pub entry: f64,
    pub target: f64,
    pub stop: f64,
    /// Latest close at evaluation time.
    pub reference_price: f64,
}

impl TradePlan {
    /// Build a plan, enforcing `stop < entry < target` on finite values.
    pub fn new(entry: f64, target: f64, stop: f64, reference_price: f64) -> Result<Self> {
        let values = [entry, target, stop, reference_price];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::Computation(format!(
                "non-finite trade plan: entry={entry} target={target} stop={stop} ref={reference_price}"
            )));
        }
        if !(stop < entry && entry < target) {
            return Err(Error::Computation(format!(
                "degenerate trade plan: stop={stop} entry={entry} target={target}"
            )));
        }
        Ok(Self {
            entry,
            target,
            stop,
            reference_price,
        })
    }

    pub fn risk(&self) -> f64 {
        self.entry - self.stop
    }

    pub fn reward(&self) -> f64 {
        self.target - self.entry
    }

    /// Target distance as a percentage of entry.
    pub fn target_pct(&self) -> f64 {
        self.reward() / self.entry * 100.0
    }

    /// Stop distance as a percentage of entry.
    pub fn stop_pct(&self) -> f64 {
        self.risk() / self.entry * 100.0
    }
}

/// Rendered alert text plus the identifiers used to build it.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub symbol: String,
    pub timeframe: String,
    pub strategy: String,
    pub timestamp: NaiveDateTime,
    pub text: String,
}
