//! Analysis orchestrator
//!
//! The facade external callers consume:
//! - Registers agents and owns their lifecycle
//! - Resolves a requested set into a validated, batched execution plan
//! - Drives the batch executor and folds settled results
//! - Synthesizes correlations and the ranked recommendation list
//! - Fronts everything with the advisory result cache
//!
//! # Workflow
//! 1. Resolve requested agents (explicit list, or the whole registry)
//! 2. Probe the cache when the caller allows it
//! 3. Build the dependency graph and execution plan; structural errors
//!    abort here, before any agent executes
//! 4. Execute batches, collect per-agent results
//! 5. Correlate, rank, deduplicate recommendations
//! 6. Record history, write the cache, publish `RunCompleted`

use crate::cache::ResultCache;
use crate::config::EngineConfig;
use crate::correlate::CorrelationEngine;
use crate::error::EngineError;
use crate::events::{EventBus, OrchestratorEvent};
use crate::executor::BatchExecutor;
use crate::history::RunHistory;
use crate::types::{RunId, RunOptions, RunRecord, RunResult, RunSummary};
use parking_lot::RwLock;
use scrutiny_agent::{
    AgentDescriptor, AgentRegistry, AnalysisAgent, AnalysisContext, CancelFlag, RegistryError,
};
use scrutiny_plan::{DependencyGraph, ExecutionPlanner};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;

/// The orchestration engine
pub struct AnalysisOrchestrator {
    config: EngineConfig,
    registry: AgentRegistry,
    executor: BatchExecutor,
    cache: ResultCache,
    history: RunHistory,
    events: EventBus,
    cancel: RwLock<CancelFlag>,
}

impl AnalysisOrchestrator {
    /// Create an orchestrator from configuration
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            registry: AgentRegistry::new(),
            executor: BatchExecutor::new(config.agent_timeout()),
            cache: ResultCache::new(config.cache_capacity, config.cache_ttl()),
            history: RunHistory::new(config.history_limit),
            events: EventBus::new(config.event_capacity),
            cancel: RwLock::new(CancelFlag::new()),
            config,
        }
    }

    /// Register an analysis agent
    ///
    /// # Errors
    /// See [`AgentRegistry::register`]; a failed registration leaves the
    /// orchestrator fully usable.
    pub async fn register_agent(
        &self,
        descriptor: AgentDescriptor,
        agent: Arc<dyn AnalysisAgent>,
    ) -> Result<(), RegistryError> {
        self.registry.register(descriptor, agent).await
    }

    /// The underlying registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Configuration in effect
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Subscribe to run/agent lifecycle events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<OrchestratorEvent> {
        self.events.subscribe()
    }

    /// Request cooperative cancellation of the in-flight run
    pub fn cancel(&self) {
        self.cancel.read().cancel();
    }

    /// Recorded history, oldest first
    #[must_use]
    pub fn recent_runs(&self) -> Vec<RunRecord> {
        self.history.recent()
    }

    /// Run analysis against a target
    ///
    /// Returns a `RunResult` whose per-agent entries may individually be
    /// failures; one broken analyzer degrades the report instead of
    /// blocking it.
    ///
    /// # Errors
    /// Only structural failures: an unknown requested agent, a dependency
    /// on an unregistered agent, or a dependency cycle. All of them abort
    /// before any agent executes.
    pub async fn run(&self, target: &str, options: RunOptions) -> Result<RunResult, EngineError> {
        let started = Instant::now();
        let requested = match &options.agents {
            Some(agents) => agents.clone(),
            None => self.registry.names(),
        };

        let cache_key = ResultCache::key(target, &options);
        if options.use_cache {
            if let Some(hit) = self.cache.get(&cache_key) {
                tracing::info!(target = %target, run_id = %hit.run_id, "serving run from cache");
                self.events.publish(OrchestratorEvent::RunCompleted {
                    run_id: hit.run_id,
                    target: target.to_string(),
                    from_cache: true,
                    succeeded: hit.summary.succeeded,
                    failed: hit.summary.failed,
                });
                return Ok((*hit).clone());
            }
        }

        // Structural validation happens in full before any execution.
        let graph = DependencyGraph::build(&self.registry, &requested)?;
        let plan = ExecutionPlanner::plan(&graph)?;

        let run_id = RunId::new();
        tracing::info!(
            target = %target,
            run_id = %run_id,
            agents = plan.agent_count(),
            batches = plan.len(),
            "starting analysis run"
        );

        // Each run gets a fresh cancellation flag; `cancel` reaches the
        // one currently in flight.
        let cancel = CancelFlag::new();
        *self.cancel.write() = cancel.clone();

        let mut ctx = AnalysisContext::new(target).with_cancel(cancel.clone());
        for (key, value) in &options.params {
            ctx = ctx.with_param(key.clone(), value.clone());
        }

        let results = self
            .executor
            .execute(run_id, &self.registry, &plan, &ctx, &self.events, &cancel)
            .await;

        let recommendations = CorrelationEngine::synthesize(&results);
        let succeeded = results.values().filter(|r| r.is_success()).count();
        let failed = results.len() - succeeded;
        let result = RunResult {
            run_id,
            results,
            recommendations,
            summary: RunSummary {
                target: target.to_string(),
                agents_run: plan.agent_count(),
                succeeded,
                failed,
                duration_ms: started.elapsed().as_millis() as u64,
            },
        };

        self.history.record(&result);
        // Completed runs always overwrite; cache hits never re-enter this
        // write path.
        self.cache.insert(cache_key, Arc::new(result.clone()));

        self.events.publish(OrchestratorEvent::RunCompleted {
            run_id,
            target: target.to_string(),
            from_cache: false,
            succeeded,
            failed,
        });
        tracing::info!(run_id = %run_id, succeeded, failed, "analysis run completed");

        Ok(result)
    }

    /// Tear down: clean up every registered agent
    ///
    /// Also invoked from the registry's `Drop`, so resources are released
    /// on every exit path.
    pub fn shutdown(&self) {
        tracing::info!("orchestrator shutting down");
        self.registry.shutdown();
    }
}

impl std::fmt::Debug for AnalysisOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisOrchestrator")
            .field("agents", &self.registry.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
