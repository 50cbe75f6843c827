use std::collections::HashMap;

use tracing::{info, warn};

use common::{Error, Result};

use crate::config::StrategyFileConfig;
use crate::strategies::StrategyKind;
use crate::Strategy;

/// Maps strategy identifiers to their implementations.
///
/// Built once at startup; lookups are exact and case-sensitive.
pub struct StrategyRegistry {
    strategies: HashMap<&'static str, Box<dyn Strategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Registry holding every built-in strategy.
    pub fn with_all() -> Self {
        let mut registry = Self::new();
        for kind in StrategyKind::ALL {
            registry.register(kind.build());
        }
        registry
    }

    /// Build the registry from config, failing on unknown identifiers.
    pub fn from_config(file_cfg: &StrategyFileConfig) -> Result<Self> {
        if file_cfg.strategies.is_empty() {
            let registry = Self::with_all();
            info!(strategies = ?registry.ids(), "Registered all built-in strategies");
            return Ok(registry);
        }

        let mut registry = Self::new();
        for entry in &file_cfg.strategies {
            let kind = StrategyKind::from_id(&entry.id)
                .ok_or_else(|| Error::UnknownStrategy(entry.id.clone()))?;
            if !entry.enabled {
                info!(id = %entry.id, "Strategy disabled in config");
                continue;
            }
            if registry.contains(kind.id()) {
                warn!(id = %entry.id, "Duplicate strategy entry ignored");
                continue;
            }
            registry.register(kind.build());
        }
        info!(strategies = ?registry.ids(), "Registered strategies from config");
        Ok(registry)
    }

    pub fn register(&mut self, strategy: Box<dyn Strategy>) {
        info!(id = strategy.id(), name = strategy.name(), "Registered strategy");
        self.strategies.insert(strategy.id(), strategy);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.strategies.contains_key(id)
    }

    /// Look up a strategy by identifier.
    pub fn resolve(&self, id: &str) -> Result<&dyn Strategy> {
        self.strategies
            .get(id)
            .map(Box::as_ref)
            .ok_or_else(|| Error::UnknownStrategy(id.to_string()))
    }

    /// Registered identifiers, sorted.
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self.strategies.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_all()
    }
}
