pub mod config;
pub mod engine;
pub mod format;
pub mod indicators;
pub mod registry;
pub mod strategies;

pub use config::{FetchConfig, StrategyEntry, StrategyFileConfig};
pub use engine::{evaluate_window, SignalEngine};
pub use format::{render_failure, render_plan, AlertContext};
pub use indicators::IndicatorSet;
pub use registry::StrategyRegistry;
pub use strategies::StrategyKind;

use common::{BarWindow, Result, TradePlan};

/// All strategy implementations must satisfy this trait.
pub trait Strategy: Send + Sync {
    /// Identifier used to select this strategy, e.g. "HL_BOS_BUY".
    fn id(&self) -> &'static str;

    /// Human-readable name shown in logs and alerts.
    fn name(&self) -> &'static str;

    /// Fewest bars `evaluate` can work with.
    fn min_bars(&self) -> usize;

    /// Turn a bar window into a long trade plan.
    ///
    /// Fails with `InsufficientData` on short windows and `Computation`
    /// when no plan satisfying `stop < entry < target` exists.
    fn evaluate(&self, window: &BarWindow, indicators: &IndicatorSet) -> Result<TradePlan>;
}
