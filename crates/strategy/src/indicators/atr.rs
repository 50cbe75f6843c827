use common::{Bar, Error, Result};

use super::Series;

/// Average True Range: simple rolling mean of true range over `period` bars.
#[derive(Debug, Clone)]
pub struct AtrIndicator {
    pub period: usize,
}

impl AtrIndicator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self { period }
    }

    /// Compute ATR over `bars` (oldest first).
    ///
    /// Needs at least `period + 1` bars, otherwise fails with
    /// `InsufficientData`. The first `period - 1` positions are `None`.
    pub fn compute(&self, bars: &[Bar]) -> Result<Series> {
        let required = self.period + 1;
        if bars.len() < required {
            return Err(Error::insufficient(required, bars.len()));
        }

        let tr = true_range(bars);
        let n = self.period as f64;
        let mut out = vec![None; bars.len()];
        let mut sum: f64 = tr[..self.period - 1].iter().sum();

        for i in self.period - 1..tr.len() {
            sum += tr[i];
            if i >= self.period {
                sum -= tr[i - self.period];
            }
            out[i] = Some(sum / n);
        }

        Ok(Series::new(out))
    }
}

/// ATR of `bars` with lookback `period` (14 is conventional).
pub fn atr(bars: &[Bar], period: usize) -> Result<Series> {
    AtrIndicator::new(period).compute(bars)
}

/// Per-bar true range. The first bar has no previous close, so its
/// true range is simply `high - low`.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, b)| {
            let hl = b.high - b.low;
            match i.checked_sub(1).map(|p| bars[p].close) {
                Some(pc) => hl.max((b.high - pc).abs()).max((b.low - pc).abs()),
                None => hl,
            }
        })
        .collect()
}
