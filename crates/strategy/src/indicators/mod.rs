//! Stateless indicator transforms over a bar window.
//!
//! Every output series is aligned 1:1 with its input. Positions before an
//! indicator has warmed up are `None` rather than NaN.

pub mod atr;
pub mod ema;

pub use atr::{atr, true_range, AtrIndicator};
pub use ema::{ema, EmaIndicator};

use common::{BarWindow, Error, Result};

/// Indicator series aligned with a bar window.
#[derive(Debug, Clone, PartialEq)]
pub struct Series(Vec<Option<f64>>);

impl Series {
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value at bar `i`; `None` when out of range or not yet warmed up.
    pub fn get(&self, i: usize) -> Option<f64> {
        self.0.get(i).copied().flatten()
    }

    /// Latest defined value.
    pub fn latest(&self) -> Option<f64> {
        self.0.iter().rev().find_map(|v| *v)
    }
}

impl FromIterator<f64> for Series {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().map(Some).collect())
    }
}

/// Indicators shared by every strategy, computed once per evaluation.
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    /// ATR(14) of the window.
    pub atr: Series,
    /// EMA(20) of closes.
    pub ema20: Series,
}

impl IndicatorSet {
    pub const ATR_PERIOD: usize = 14;
    pub const EMA_PERIOD: usize = 20;

    /// Fails with `InsufficientData` when the window cannot warm up ATR(14).
    pub fn compute(window: &BarWindow) -> Result<Self> {
        Ok(Self {
            atr: atr(window.bars(), Self::ATR_PERIOD)?,
            ema20: ema(&window.closes(), Self::EMA_PERIOD),
        })
    }

    pub fn latest_atr(&self) -> Result<f64> {
        self.atr
            .latest()
            .ok_or_else(|| Error::Computation("ATR has no defined value".into()))
    }

    pub fn latest_ema20(&self) -> Result<f64> {
        self.ema20
            .latest()
            .ok_or_else(|| Error::Computation("EMA(20) has no defined value".into()))
    }
}
