use common::{BarWindow, Result, TradePlan};

use super::{atr_pct, build_plan, floor_stop, highest_high, lowest_low};
use crate::indicators::IndicatorSet;
use crate::Strategy;

/// Buy a breakout above the high of the base formed by the ten bars before
/// the latest one.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseBreakout;

impl BaseBreakout {
    pub const ID: &'static str = "BASE_BREAKOUT_BUY";
    pub const BASE_LEN: usize = 10;

    const ENTRY_BUFFER: f64 = 1.0009;
    const STOP_ATR: f64 = 0.15;
    const FALLBACK_K: f64 = 0.005;

    /// 1.5 plus a tenth of ATR%, capped at +0.6.
    pub fn reward_ratio(atr_pct: f64) -> f64 {
        1.5 + (atr_pct / 10.0).min(0.6)
    }
}

impl Strategy for BaseBreakout {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "Base Breakout"
    }

    fn min_bars(&self) -> usize {
        (Self::BASE_LEN + 1).max(IndicatorSet::ATR_PERIOD + 1)
    }

    fn evaluate(&self, window: &BarWindow, indicators: &IndicatorSet) -> Result<TradePlan> {
        let base = window.back(1, Self::BASE_LEN)?;
        let atr = indicators.latest_atr()?;
        let close = window.latest().close;

        let entry = highest_high(base) * Self::ENTRY_BUFFER;
        let stop = floor_stop(lowest_low(base) - Self::STOP_ATR * atr, entry, Self::FALLBACK_K);
        let rr = Self::reward_ratio(atr_pct(atr, close));

        build_plan(entry, stop, rr, close)
    }
}
