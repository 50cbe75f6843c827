use common::{BarWindow, Result, TradePlan};

use super::{atr_pct, build_plan, highest_high, lowest_low};
use crate::indicators::IndicatorSet;
use crate::Strategy;

/// Higher low followed by a break of structure.
///
/// Entry is just above the 16-bar swing high; the stop sits under the
/// higher low of the last six bars, never closer to entry than 0.5%.
#[derive(Debug, Clone, Copy, Default)]
pub struct HigherLowBos;

impl HigherLowBos {
    pub const ID: &'static str = "HL_BOS_BUY";
    pub const STRUCTURE_LEN: usize = 16;
    pub const HIGHER_LOW_LEN: usize = 6;

    const ENTRY_BUFFER: f64 = 1.00015;
    const STOP_ATR: f64 = 0.10;
    const STOP_CEILING: f64 = 0.995;

    /// 1.4 plus a hundredth of the stop distance in percent, capped at 2.2.
    pub fn reward_ratio(sl_pct: f64) -> f64 {
        (1.4 + sl_pct / 100.0).min(2.2)
    }
}

impl Strategy for HigherLowBos {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "Higher-Low + Break of Structure"
    }

    fn min_bars(&self) -> usize {
        Self::STRUCTURE_LEN.max(IndicatorSet::ATR_PERIOD + 1)
    }

    fn evaluate(&self, window: &BarWindow, indicators: &IndicatorSet) -> Result<TradePlan> {
        let structure = window.tail(Self::STRUCTURE_LEN)?;
        let higher_low = window.tail(Self::HIGHER_LOW_LEN)?;
        let atr = indicators.latest_atr()?;
        let close = window.latest().close;

        let entry = highest_high(structure) * Self::ENTRY_BUFFER;
        // The ceiling applies unconditionally, not only when the naive stop is invalid.
        let stop = (lowest_low(higher_low) - Self::STOP_ATR * atr).min(entry * Self::STOP_CEILING);
        let sl_pct = (entry - stop) / entry * 100.0;
        let rr = Self::reward_ratio(sl_pct);

        tracing::trace!(atr_pct = atr_pct(atr, close), sl_pct, rr, "HL+BOS sizing");
        build_plan(entry, stop, rr, close)
    }
}
