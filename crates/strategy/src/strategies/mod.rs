//! The closed set of long-only strategies.
//!
//! Each strategy anchors an entry to a structural price level, places a stop
//! below recent lows padded by a fraction of ATR, and sizes the target as a
//! volatility-dependent multiple of risk.

pub mod base_breakout;
pub mod breakout_retest;
pub mod ema_confluence;
pub mod hl_bos;

pub use base_breakout::BaseBreakout;
pub use breakout_retest::BreakoutRetest;
pub use ema_confluence::EmaConfluence;
pub use hl_bos::HigherLowBos;

use common::{Bar, Error, Result, TradePlan};

use crate::Strategy;

/// Identifies one of the built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    BaseBreakout,
    BreakoutRetest,
    HigherLowBos,
    EmaConfluence,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::BaseBreakout,
        StrategyKind::BreakoutRetest,
        StrategyKind::HigherLowBos,
        StrategyKind::EmaConfluence,
    ];

    /// Webhook identifier. Matching is case-sensitive.
    pub fn id(&self) -> &'static str {
        match self {
            StrategyKind::BaseBreakout => BaseBreakout::ID,
            StrategyKind::BreakoutRetest => BreakoutRetest::ID,
            StrategyKind::HigherLowBos => HigherLowBos::ID,
            StrategyKind::EmaConfluence => EmaConfluence::ID,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    pub fn build(&self) -> Box<dyn Strategy> {
        match self {
            StrategyKind::BaseBreakout => Box::new(BaseBreakout),
            StrategyKind::BreakoutRetest => Box::new(BreakoutRetest),
            StrategyKind::HigherLowBos => Box::new(HigherLowBos),
            StrategyKind::EmaConfluence => Box::new(EmaConfluence),
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

// ─── Shared arithmetic ────────────────────────────────────────────────────────

pub(crate) fn highest_high(bars: &[Bar]) -> f64 {
    bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max)
}

pub(crate) fn lowest_low(bars: &[Bar]) -> f64 {
    bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min)
}

/// ATR as a percentage of `close`.
pub fn atr_pct(atr: f64, close: f64) -> f64 {
    atr / close * 100.0
}

/// Keep `naive` when it sits below `entry`, otherwise fall back to
/// `entry * (1 - k)`.
pub fn floor_stop(naive: f64, entry: f64, k: f64) -> f64 {
    if naive < entry {
        naive
    } else {
        entry * (1.0 - k)
    }
}

/// Size the target at `rr` times risk and validate the result.
pub(crate) fn build_plan(entry: f64, stop: f64, rr: f64, reference_price: f64) -> Result<TradePlan> {
    let risk = entry - stop;
    if !(risk > 0.0) {
        return Err(Error::Computation(format!(
            "non-positive risk: entry={entry} stop={stop}"
        )));
    }
    TradePlan::new(entry, entry + rr * risk, stop, reference_price)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, TimeZone, Utc};
    use common::{Bar, BarWindow, Interval};

    use crate::indicators::{IndicatorSet, Series};

    /// Bars with the given (high, low) pairs; open/close sit mid-range.
    pub fn window_from_ranges(ranges: &[(f64, f64)]) -> BarWindow {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 6, 3, 45, 0).unwrap();
        let bars = ranges
            .iter()
            .enumerate()
            .map(|(i, &(high, low))| {
                let mid = (high + low) / 2.0;
                Bar {
                    timestamp: t0 + Duration::minutes(30 * i as i64),
                    open: mid,
                    high,
                    low,
                    close: mid,
                    volume: 10_000.0,
                }
            })
            .collect();
        BarWindow::new("TEST.NS", Interval::M30, bars).unwrap()
    }

    /// Indicator set with fixed latest ATR and EMA(20) values.
    pub fn fixed_indicators(atr: f64, ema20: f64) -> IndicatorSet {
        IndicatorSet {
            atr: Series::new(vec![None, Some(atr)]),
            ema20: Series::new(vec![Some(ema20), Some(ema20)]),
        }
    }
}
