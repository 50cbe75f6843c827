use std::sync::Arc;

use tracing::{debug, info};

use common::{BarWindow, DataProvider, Error, Result, TradePlan};

use crate::config::FetchConfig;
use crate::indicators::IndicatorSet;
use crate::registry::StrategyRegistry;
use crate::Strategy;

/// Resolves a strategy, fetches its bars and produces a trade plan.
///
/// Holds no mutable state, so one instance serves concurrent requests.
pub struct SignalEngine {
    registry: StrategyRegistry,
    provider: Arc<dyn DataProvider>,
    fetch: FetchConfig,
}

impl SignalEngine {
    pub fn new(registry: StrategyRegistry, provider: Arc<dyn DataProvider>, fetch: FetchConfig) -> Self {
        Self {
            registry,
            provider,
            fetch,
        }
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Evaluate `strategy_id` against fresh bars for `symbol`.
    ///
    /// `timeframe` only labels the request; bars are always fetched at the
    /// configured interval. Provider errors propagate unchanged and nothing
    /// is retried.
    pub async fn evaluate(&self, strategy_id: &str, symbol: &str, timeframe: &str) -> Result<TradePlan> {
        let strategy = self.registry.resolve(strategy_id)?;

        debug!(
            strategy = strategy_id,
            symbol,
            interval = %self.fetch.interval,
            lookback = self.fetch.lookback,
            "Fetching bars"
        );
        let window = self
            .provider
            .fetch_bars(symbol, self.fetch.interval, self.fetch.lookback)
            .await?;
        debug!(
            symbol = window.symbol(),
            interval = %window.interval(),
            bars = window.len(),
            "Bars received"
        );

        let plan = evaluate_window(strategy, &window)?;
        info!(
            strategy = strategy_id,
            symbol,
            timeframe,
            entry = plan.entry,
            target = plan.target,
            stop = plan.stop,
            "Trade plan computed"
        );
        Ok(plan)
    }
}

/// Run `strategy` over an already fetched window.
pub fn evaluate_window(strategy: &dyn Strategy, window: &BarWindow) -> Result<TradePlan> {
    if window.is_empty() {
        return Err(Error::DataUnavailable(format!("no bars for {}", window.symbol())));
    }
    let required = strategy.min_bars();
    if window.len() < required {
        return Err(Error::insufficient(required, window.len()));
    }
    let indicators = IndicatorSet::compute(window)?;
    strategy.evaluate(window, &indicators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use common::{Bar, Interval};

    /// Serves a canned window, or an error when `bars` is `None`.
    struct FakeProvider {
        bars: Option<Vec<Bar>>,
    }

    #[async_trait]
    impl DataProvider for FakeProvider {
        async fn fetch_bars(&self, symbol: &str, interval: Interval, lookback: usize) -> Result<BarWindow> {
            match &self.bars {
                Some(bars) => {
                    let start = bars.len().saturating_sub(lookback);
                    BarWindow::new(symbol, interval, bars[start..].to_vec())
                }
                None => Err(Error::DataUnavailable("provider offline".into())),
            }
        }
    }

    fn zigzag(n: usize) -> Vec<Bar> {
        let t0 = Utc.with_ymd_and_hms(2024, 6, 3, 3, 45, 0).unwrap();
        (0..n)
            .map(|i| {
                let base = 1_000.0 + (i as f64 * 0.7).sin() * 15.0 + i as f64 * 0.5;
                Bar {
                    timestamp: t0 + Duration::minutes(30 * i as i64),
                    open: base - 1.0,
                    high: base + 4.0,
                    low: base - 5.0,
                    close: base + 1.0,
                    volume: 5_000.0,
                }
            })
            .collect()
    }

    fn engine(bars: Option<Vec<Bar>>) -> SignalEngine {
        SignalEngine::new(
            StrategyRegistry::with_all(),
            Arc::new(FakeProvider { bars }),
            FetchConfig::default(),
        )
    }

    #[tokio::test]
    async fn hl_bos_with_full_window_returns_plan() {
        let plan = engine(Some(zigzag(80)))
            .evaluate("HL_BOS_BUY", "RELIANCE.NS", "30min")
            .await
            .unwrap();
        assert!(plan.stop < plan.entry && plan.entry < plan.target);
        assert!(plan.reference_price > 0.0);
    }

    #[tokio::test]
    async fn every_strategy_produces_a_valid_plan() {
        let engine = engine(Some(zigzag(120)));
        for id in engine.registry().ids() {
            let plan = engine.evaluate(id, "TCS.NS", "30min").await.unwrap();
            assert!(plan.stop < plan.entry && plan.entry < plan.target, "{id}: {plan:?}");
        }
    }

    #[tokio::test]
    async fn unknown_strategy_fails_before_fetching() {
        let err = engine(None).evaluate("NOPE", "X", "30min").await.unwrap_err();
        assert!(matches!(err, Error::UnknownStrategy(_)));
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let err = engine(None)
            .evaluate("BASE_BREAKOUT_BUY", "X", "30min")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn empty_provider_result_is_data_unavailable() {
        let err = engine(Some(vec![]))
            .evaluate("BASE_BREAKOUT_BUY", "X", "30min")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn short_history_is_insufficient_data() {
        let err = engine(Some(zigzag(17)))
            .evaluate("BREAKOUT_RETEST_BUY", "X", "30min")
            .await
            .unwrap_err();
        match err {
            Error::InsufficientData { required, available } => {
                assert_eq!(required, 18);
                assert_eq!(available, 17);
            }
            other => panic!("expected InsufficientData, got {other}"),
        }
    }

    #[test]
    fn short_window_reports_strategy_lookback() {
        let window = BarWindow::new("X", Interval::M30, zigzag(14)).unwrap();
        let err = evaluate_window(&crate::strategies::HigherLowBos, &window).unwrap_err();
        assert!(matches!(err, Error::InsufficientData { required: 16, .. }));
    }
}
