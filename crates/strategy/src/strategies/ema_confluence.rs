use common::{BarWindow, Result, TradePlan};

use super::{atr_pct, build_plan, lowest_low};
use crate::indicators::IndicatorSet;
use crate::Strategy;

/// Buy where the latest candle body meets EMA(20) support, with a target
/// multiple stepped up by volatility.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmaConfluence;

impl EmaConfluence {
    /// Kept for compatibility with existing alert senders.
    pub const ID: &'static str = "EMA_RSI_BUY";
    pub const SWING_LEN: usize = 3;

    const EMA_ATR: f64 = 0.2;
    const HIGH_CEILING: f64 = 1.002;
    const STOP_ATR: f64 = 0.60;

    /// 1.0 below 1% ATR, then 1.3 / 1.6 / 1.9 at 1.0% / 1.3% / 1.5%.
    pub fn reward_ratio(atr_pct: f64) -> f64 {
        let mut rr = 1.0;
        if atr_pct >= 1.0 {
            rr = 1.3;
        }
        if atr_pct >= 1.3 {
            rr = 1.6;
        }
        if atr_pct >= 1.5 {
            rr = 1.9;
        }
        rr
    }
}

impl Strategy for EmaConfluence {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "EMA + Volatility Confluence"
    }

    fn min_bars(&self) -> usize {
        IndicatorSet::EMA_PERIOD.max(IndicatorSet::ATR_PERIOD + 1)
    }

    fn evaluate(&self, window: &BarWindow, indicators: &IndicatorSet) -> Result<TradePlan> {
        let swing = window.tail(Self::SWING_LEN)?;
        let atr = indicators.latest_atr()?;
        let ema20 = indicators.latest_ema20()?;
        let latest = window.latest();

        let entry = latest
            .body_mid()
            .max(ema20 + Self::EMA_ATR * atr)
            .min(latest.high * Self::HIGH_CEILING);
        // No fallback floor: a stop at or above entry is rejected by build_plan.
        let stop = lowest_low(swing) - Self::STOP_ATR * atr;
        let rr = Self::reward_ratio(atr_pct(atr, latest.close));

        build_plan(entry, stop, rr, latest.close)
    }
}
