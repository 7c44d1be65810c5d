//! Result cache
//!
//! Memoizes full run results keyed by a stable signature of the target and
//! the normalized options, with a time-based expiry. Purely advisory
//! performance state: its absence changes latency, never correctness. An
//! entry past its TTL is treated as absent and simply overwritten by the
//! next completed run.

use crate::types::{RunOptions, RunResult};
use moka::sync::Cache;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;

/// TTL-governed cache of completed runs
#[derive(Debug, Clone)]
pub struct ResultCache {
    inner: Cache<String, Arc<RunResult>>,
}

impl ResultCache {
    /// Create a cache with a capacity bound and time-to-live
    #[must_use]
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Derive the cache key for a (target, options) pair
    ///
    /// The agent list is sorted and parameters are serialized in canonical
    /// key order, so neither selection order nor option-key order changes
    /// the key. The `use_cache` flag is deliberately excluded: a
    /// cache-control knob must not change the identity of the work.
    #[must_use]
    pub fn key(target: &str, options: &RunOptions) -> String {
        let agents = options.agents.as_ref().map(|list| {
            let mut sorted = list.clone();
            sorted.sort();
            sorted
        });
        let canonical = serde_json::json!({
            "target": target,
            "agents": agents,
            "params": options.params,
        });

        let mut hasher = Sha256::new();
        hasher.update(canonical.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Look up a live entry; expired entries are misses
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<RunResult>> {
        self.inner.get(key)
    }

    /// Store a completed run, overwriting any previous entry
    pub fn insert(&self, key: String, result: Arc<RunResult>) {
        self.inner.insert(key, result);
    }

    /// Drop every entry
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Approximate number of live entries
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RunId, RunSummary};
    use std::collections::BTreeMap;

    fn result(target: &str) -> Arc<RunResult> {
        Arc::new(RunResult {
            run_id: RunId::new(),
            results: BTreeMap::new(),
            recommendations: Vec::new(),
            summary: RunSummary {
                target: target.to_string(),
                agents_run: 0,
                succeeded: 0,
                failed: 0,
                duration_ms: 0,
            },
        })
    }

    #[test]
    fn key_is_stable_across_option_order() {
        let a = RunOptions::new()
            .with_param("alpha", serde_json::json!(1))
            .with_param("beta", serde_json::json!(2));
        let b = RunOptions::new()
            .with_param("beta", serde_json::json!(2))
            .with_param("alpha", serde_json::json!(1));
        assert_eq!(ResultCache::key("/src", &a), ResultCache::key("/src", &b));
    }

    #[test]
    fn key_ignores_agent_selection_order() {
        let a = RunOptions::new().with_agents(["x", "y"]);
        let b = RunOptions::new().with_agents(["y", "x"]);
        assert_eq!(ResultCache::key("/src", &a), ResultCache::key("/src", &b));
    }

    #[test]
    fn key_ignores_use_cache_flag() {
        let a = RunOptions::new().with_cache(true);
        let b = RunOptions::new().with_cache(false);
        assert_eq!(ResultCache::key("/src", &a), ResultCache::key("/src", &b));
    }

    #[test]
    fn key_varies_with_target_and_params() {
        let opts = RunOptions::new();
        assert_ne!(
            ResultCache::key("/src", &opts),
            ResultCache::key("/other", &opts)
        );
        assert_ne!(
            ResultCache::key("/src", &opts),
            ResultCache::key("/src", &opts.clone().with_param("depth", serde_json::json!(1))),
        );
    }

    #[test]
    fn cache_hit_within_ttl() {
        let cache = ResultCache::new(16, Duration::from_secs(60));
        cache.insert("k".to_string(), result("/src"));

        let hit = cache.get("k").unwrap();
        assert_eq!(hit.summary.target, "/src");
    }

    #[test]
    fn cache_expired_entry_is_a_miss() {
        let cache = ResultCache::new(16, Duration::from_millis(40));
        cache.insert("k".to_string(), result("/src"));
        assert!(cache.get("k").is_some());

        std::thread::sleep(Duration::from_millis(60));
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn cache_overwrite_replaces_entry() {
        let cache = ResultCache::new(16, Duration::from_secs(60));
        cache.insert("k".to_string(), result("/first"));
        cache.insert("k".to_string(), result("/second"));

        assert_eq!(cache.get("k").unwrap().summary.target, "/second");
    }
}
