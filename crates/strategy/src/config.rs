use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use common::{Error, Interval, Result};

/// Top-level strategy config file (TOML).
///
/// Example `config/strategies.toml`:
/// ```toml
/// [fetch]
/// interval = "30m"
/// lookback = 80
///
/// [[strategy]]
/// id = "BASE_BREAKOUT_BUY"
///
/// [[strategy]]
/// id = "EMA_RSI_BUY"
/// enabled = false
/// ```
///
/// With no `[[strategy]]` entries every built-in strategy is registered.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StrategyFileConfig {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default, rename = "strategy")]
    pub strategies: Vec<StrategyEntry>,
}

/// How much history to request from the data provider per evaluation.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct FetchConfig {
    #[serde(default)]
    pub interval: Interval,
    #[serde(default = "default_lookback")]
    pub lookback: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            interval: Interval::M30,
            lookback: default_lookback(),
        }
    }
}

fn default_lookback() -> usize {
    80
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrategyEntry {
    /// Strategy identifier, e.g. "HL_BOS_BUY".
    pub id: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl StrategyFileConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "No strategy config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        if cfg.fetch.lookback == 0 {
            return Err(Error::Config("fetch.lookback must be positive".into()));
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = StrategyFileConfig::parse("").unwrap();
        assert_eq!(cfg.fetch.interval, Interval::M30);
        assert_eq!(cfg.fetch.lookback, 80);
        assert!(cfg.strategies.is_empty());
    }

    #[test]
    fn parses_fetch_and_entries() {
        let cfg = StrategyFileConfig::parse(
            r#"
            [fetch]
            interval = "1h"
            lookback = 120

            [[strategy]]
            id = "HL_BOS_BUY"

            [[strategy]]
            id = "EMA_RSI_BUY"
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.fetch.interval, Interval::H1);
        assert_eq!(cfg.fetch.lookback, 120);
        assert_eq!(cfg.strategies.len(), 2);
        assert!(cfg.strategies[0].enabled);
        assert!(!cfg.strategies[1].enabled);
    }

    #[test]
    fn rejects_bad_interval_and_zero_lookback() {
        assert!(StrategyFileConfig::parse("[fetch]\ninterval = \"7m\"").is_err());
        assert!(StrategyFileConfig::parse("[fetch]\nlookback = 0").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = StrategyFileConfig::load("/nonexistent/strategies.toml").unwrap();
        assert_eq!(cfg.fetch.lookback, 80);
    }
}
