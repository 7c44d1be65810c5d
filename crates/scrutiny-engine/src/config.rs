//! Engine configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Orchestrator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Result-cache time-to-live in milliseconds
    pub cache_ttl_ms: u64,
    /// Maximum cached runs
    pub cache_capacity: u64,
    /// Per-agent analysis timeout in seconds; `None` disables timeouts
    pub agent_timeout_secs: Option<u64>,
    /// Most-recent-N run history entries; 0 disables history
    pub history_limit: usize,
    /// Event-bus channel capacity
    pub event_capacity: usize,
}

impl EngineConfig {
    /// Create the default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache TTL in milliseconds
    #[inline]
    #[must_use]
    pub fn with_cache_ttl_ms(mut self, millis: u64) -> Self {
        self.cache_ttl_ms = millis;
        self
    }

    /// Set the cache capacity
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Set the per-agent timeout
    #[inline]
    #[must_use]
    pub fn with_agent_timeout(mut self, secs: u64) -> Self {
        self.agent_timeout_secs = Some(secs);
        self
    }

    /// Set the history limit; 0 disables history
    #[inline]
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Per-agent timeout as a `Duration`, if configured
    #[inline]
    #[must_use]
    pub fn agent_timeout(&self) -> Option<Duration> {
        self.agent_timeout_secs.map(Duration::from_secs)
    }

    /// Cache TTL as a `Duration`
    #[inline]
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl_ms: 300_000,
            cache_capacity: 128,
            agent_timeout_secs: None,
            history_limit: 20,
            event_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = EngineConfig::new();
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.history_limit, 20);
        assert!(config.agent_timeout().is_none());
    }

    #[test]
    fn config_builder() {
        let config = EngineConfig::new()
            .with_cache_ttl_ms(60_000)
            .with_agent_timeout(30)
            .with_history_limit(0);
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.agent_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.history_limit, 0);
    }
}
