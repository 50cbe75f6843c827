use common::{BarWindow, Result, TradePlan};

use super::{atr_pct, build_plan, floor_stop, highest_high, lowest_low};
use crate::indicators::IndicatorSet;
use crate::Strategy;

/// Buy the retest of a resistance level broken a few bars ago.
///
/// Resistance is the highest high of a 13-bar window that ends five bars
/// before the latest bar. The stop sits under the last seven bars.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreakoutRetest;

impl BreakoutRetest {
    pub const ID: &'static str = "BREAKOUT_RETEST_BUY";
    pub const RESISTANCE_LEN: usize = 13;
    pub const RESISTANCE_OFFSET: usize = 5;
    pub const RETEST_LEN: usize = 7;

    const ENTRY_BUFFER: f64 = 1.00055;
    const STOP_ATR: f64 = 0.35;
    const FALLBACK_K: f64 = 0.0065;

    /// 1.56 plus ATR% / 6.5, capped at +0.82.
    pub fn reward_ratio(atr_pct: f64) -> f64 {
        1.56 + (atr_pct / 6.5).min(0.82)
    }
}

impl Strategy for BreakoutRetest {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "Breakout Retest"
    }

    fn min_bars(&self) -> usize {
        (Self::RESISTANCE_OFFSET + Self::RESISTANCE_LEN).max(IndicatorSet::ATR_PERIOD + 1)
    }

    fn evaluate(&self, window: &BarWindow, indicators: &IndicatorSet) -> Result<TradePlan> {
        let resistance = window.back(Self::RESISTANCE_OFFSET, Self::RESISTANCE_LEN)?;
        let retest = window.tail(Self::RETEST_LEN)?;
        let atr = indicators.latest_atr()?;
        let close = window.latest().close;

        let entry = highest_high(resistance) * Self::ENTRY_BUFFER;
        let stop = floor_stop(
            lowest_low(retest) - Self::STOP_ATR * atr,
            entry,
            Self::FALLBACK_K,
        );
        let rr = Self::reward_ratio(atr_pct(atr, close));

        build_plan(entry, stop, rr, close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::test_support::{fixed_indicators, window_from_ranges};

    #[test]
    fn resistance_window_skips_the_last_five_bars() {
        let mut ranges = vec![(90.0, 88.0); 10];
        ranges.extend(vec![(100.0, 95.0); 13]);
        ranges.extend(vec![(120.0, 96.0); 5]);
        let window = window_from_ranges(&ranges);
        let plan = BreakoutRetest
            .evaluate(&window, &fixed_indicators(2.0, 100.0))
            .unwrap();
        assert!((plan.entry - 100.0 * 1.00055).abs() < 1e-9);
        // last 7 lows: two bars at 95, five at 96
        assert!((plan.stop - (95.0 - 0.7)).abs() < 1e-9);
    }

    #[test]
    fn stop_above_entry_falls_back_to_floor() {
        // The two windows share bars, so well-formed bars always leave the
        // naive stop under resistance. A negative ATR pad lifts it above.
        let window = window_from_ranges(&[(100.0, 98.0); 18]);
        let plan = BreakoutRetest
            .evaluate(&window, &fixed_indicators(-8.0, 99.0))
            .unwrap();

        let entry = 100.0 * 1.00055;
        assert!(98.0 + 0.35 * 8.0 > entry);
        assert!((plan.entry - entry).abs() < 1e-9);
        assert!((plan.stop - entry * 0.9935).abs() < 1e-9);
        assert!(plan.stop < plan.entry && plan.entry < plan.target);
    }

    #[test]
    fn naive_stop_never_reaches_resistance_on_valid_bars() {
        let mut ranges = vec![(100.0, 98.0); 11];
        ranges.extend(vec![(100.0, 99.9); 2]);
        ranges.extend(vec![(130.0, 125.0); 5]);
        let window = window_from_ranges(&ranges);
        let plan = BreakoutRetest
            .evaluate(&window, &fixed_indicators(1.0, 110.0))
            .unwrap();
        // lowest retest low is 99.9 from the shared bars
        assert!((plan.stop - (99.9 - 0.35)).abs() < 1e-9);
    }

    #[test]
    fn reward_ratio_is_capped() {
        assert!((BreakoutRetest::reward_ratio(0.0) - 1.56).abs() < 1e-12);
        assert!((BreakoutRetest::reward_ratio(1.3) - 1.76).abs() < 1e-12);
        assert!((BreakoutRetest::reward_ratio(100.0) - 2.38).abs() < 1e-12);
    }

    #[test]
    fn needs_eighteen_bars() {
        assert_eq!(BreakoutRetest.min_bars(), 18);
        let window = window_from_ranges(&[(101.0, 99.0); 17]);
        assert!(matches!(
            BreakoutRetest.evaluate(&window, &fixed_indicators(1.0, 100.0)),
            Err(common::Error::InsufficientData { required: 18, available: 17 })
        ));
    }
}
