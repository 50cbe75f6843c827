use super::Series;

/// Exponential moving average with span `period`.
///
/// Recursive, adjust-free form: `ema[0] = x[0]`,
/// `ema[i] = k * x[i] + (1 - k) * ema[i - 1]` with `k = 2 / (period + 1)`.
/// Defined from the first sample onward, so there is no warm-up gap.
#[derive(Debug, Clone)]
pub struct EmaIndicator {
    pub period: usize,
}

impl EmaIndicator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self { period }
    }

    pub fn smoothing(&self) -> f64 {
        2.0 / (self.period as f64 + 1.0)
    }

    /// Lazily evaluate the EMA over `values` (oldest first).
    pub fn iter<'a>(&self, values: &'a [f64]) -> impl Iterator<Item = f64> + 'a {
        let k = self.smoothing();
        values.iter().scan(None, move |prev: &mut Option<f64>, &x| {
            let next = match *prev {
                Some(p) => x * k + p * (1.0 - k),
                None => x,
            };
            *prev = Some(next);
            Some(next)
        })
    }

    pub fn compute(&self, values: &[f64]) -> Series {
        self.iter(values).collect()
    }
}

/// EMA of `values` with span `period`.
pub fn ema(values: &[f64], period: usize) -> Series {
    EmaIndicator::new(period).compute(values)
}
