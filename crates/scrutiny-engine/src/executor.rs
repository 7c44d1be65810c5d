//! Batch executor
//!
//! Drives an execution plan: batches run strictly in sequence, agents
//! inside a batch run as concurrent tokio tasks, and the executor only
//! advances once every member of the current batch has settled. That is the
//! system's sole ordering guarantee and it is sufficient, because members
//! of one batch have no dependency relationship with each other.
//!
//! Every per-agent failure mode — error return, panic, timeout — is caught
//! here and folded into a failed `AnalysisResult`; nothing an agent does
//! aborts its siblings or later batches. Cancellation is cooperative: a
//! cancelled run stops launching batches, while in-flight agents settle
//! normally.

use crate::events::{EventBus, OrchestratorEvent};
use crate::types::{AnalysisResult, AnalysisStatus, RunId};
use futures::future::join_all;
use scrutiny_agent::{AgentError, AgentRegistry, AnalysisContext, CancelFlag};
use scrutiny_plan::ExecutionPlan;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Executes plans batch by batch
#[derive(Debug, Default)]
pub struct BatchExecutor {
    agent_timeout: Option<Duration>,
}

impl BatchExecutor {
    /// Create an executor with an optional per-agent timeout
    #[inline]
    #[must_use]
    pub fn new(agent_timeout: Option<Duration>) -> Self {
        Self { agent_timeout }
    }

    /// Run every batch of the plan to settlement
    ///
    /// Always returns a result per scheduled agent; failures are entries,
    /// never errors.
    pub async fn execute(
        &self,
        run_id: RunId,
        registry: &AgentRegistry,
        plan: &ExecutionPlan,
        ctx: &AnalysisContext,
        events: &EventBus,
        cancel: &CancelFlag,
    ) -> BTreeMap<String, AnalysisResult> {
        let mut results = BTreeMap::new();

        for (index, batch) in plan.batches().iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!(batch = index, "run cancelled, skipping remaining batches");
                for name in plan.batches()[index..].iter().flatten() {
                    let result =
                        AnalysisResult::failure(name, "run cancelled before agent was launched", 0);
                    events.publish(OrchestratorEvent::AgentFailed {
                        run_id,
                        agent: name.clone(),
                        error: "run cancelled before agent was launched".to_string(),
                    });
                    results.insert(name.clone(), result);
                }
                break;
            }

            tracing::debug!(batch = index, agents = batch.len(), "launching batch");
            let mut handles = Vec::with_capacity(batch.len());
            for name in batch {
                let adapter = match registry.get(name) {
                    Ok(adapter) => adapter,
                    Err(e) => {
                        // The plan was validated against this registry;
                        // reaching here means the registry shrank mid-run.
                        results.insert(name.clone(), AnalysisResult::failure(name, &e, 0));
                        continue;
                    }
                };

                events.publish(OrchestratorEvent::AgentStarted {
                    run_id,
                    agent: name.clone(),
                });

                let ctx = ctx.clone();
                let timeout = self.agent_timeout;
                let handle = tokio::spawn(async move {
                    let start = Instant::now();
                    let outcome = match timeout {
                        Some(limit) => match tokio::time::timeout(limit, adapter.analyze(&ctx)).await
                        {
                            Ok(settled) => settled,
                            Err(_) => Err(AgentError::Analysis(format!(
                                "analysis timed out after {}s",
                                limit.as_secs()
                            ))),
                        },
                        None => adapter.analyze(&ctx).await,
                    };
                    (outcome, start.elapsed().as_millis() as u64)
                });
                handles.push((name.clone(), handle));
            }

            let settled = join_all(
                handles
                    .into_iter()
                    .map(|(name, handle)| async move { (name, handle.await) }),
            )
            .await;

            for (name, joined) in settled {
                let result = match joined {
                    Ok((Ok(report), duration_ms)) => {
                        AnalysisResult::success(&name, report, duration_ms)
                    }
                    Ok((Err(e), duration_ms)) => AnalysisResult::failure(&name, &e, duration_ms),
                    Err(join_error) if join_error.is_panic() => {
                        AnalysisResult::failure(&name, "agent panicked during analysis", 0)
                    }
                    Err(_) => AnalysisResult::failure(&name, "agent task aborted", 0),
                };

                match result.status {
                    AnalysisStatus::Success => {
                        tracing::debug!(agent = %name, duration_ms = result.duration_ms, "agent completed");
                        events.publish(OrchestratorEvent::AgentCompleted {
                            run_id,
                            agent: name.clone(),
                            duration_ms: result.duration_ms,
                        });
                    }
                    AnalysisStatus::Failed => {
                        let error = result.error.clone().unwrap_or_default();
                        tracing::warn!(agent = %name, error = %error, "agent failed");
                        events.publish(OrchestratorEvent::AgentFailed {
                            run_id,
                            agent: name.clone(),
                            error,
                        });
                    }
                }
                results.insert(name, result);
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrutiny_agent::AgentDescriptor;
    use scrutiny_plan::{DependencyGraph, ExecutionPlanner};
    use scrutiny_test_utils::{descriptor, MockAgent};
    use std::sync::Arc;

    async fn registry_of(agents: Vec<(AgentDescriptor, Arc<MockAgent>)>) -> AgentRegistry {
        let registry = AgentRegistry::new();
        for (desc, agent) in agents {
            registry.register(desc, agent).await.unwrap();
        }
        registry
    }

    fn plan_for(registry: &AgentRegistry, requested: &[&str]) -> ExecutionPlan {
        let requested: Vec<String> = requested.iter().map(|s| (*s).to_string()).collect();
        let graph = DependencyGraph::build(registry, &requested).unwrap();
        ExecutionPlanner::plan(&graph).unwrap()
    }

    #[tokio::test]
    async fn executor_runs_all_agents() {
        let a = MockAgent::new().with_payload(serde_json::json!({"n": 1}));
        let b = MockAgent::new().with_payload(serde_json::json!({"n": 2}));
        let registry = registry_of(vec![
            (descriptor("a", &[]), Arc::new(a)),
            (descriptor("b", &["a"]), Arc::new(b)),
        ])
        .await;
        let plan = plan_for(&registry, &["a", "b"]);

        let executor = BatchExecutor::new(None);
        let results = executor
            .execute(
                RunId::new(),
                &registry,
                &plan,
                &AnalysisContext::new("/src"),
                &EventBus::default(),
                &CancelFlag::new(),
            )
            .await;

        assert_eq!(results.len(), 2);
        assert!(results["a"].is_success());
        assert!(results["b"].is_success());
        assert_eq!(results["b"].payload["n"], 2);
    }

    #[tokio::test]
    async fn executor_isolates_failures_within_a_batch() {
        let ok = Arc::new(MockAgent::new());
        let bad = Arc::new(MockAgent::new().with_failure("disk on fire"));
        let later = Arc::new(MockAgent::new());
        let registry = registry_of(vec![
            (descriptor("ok", &[]), ok.clone()),
            (descriptor("bad", &[]), bad),
            (descriptor("later", &["bad"]), later.clone()),
        ])
        .await;
        let plan = plan_for(&registry, &["ok", "bad", "later"]);

        let executor = BatchExecutor::new(None);
        let results = executor
            .execute(
                RunId::new(),
                &registry,
                &plan,
                &AnalysisContext::new("/src"),
                &EventBus::default(),
                &CancelFlag::new(),
            )
            .await;

        // The sibling ran, the dependent batch still ran, and exactly the
        // broken agent settled as a failure.
        assert_eq!(results["bad"].status, AnalysisStatus::Failed);
        assert!(results["bad"].error.as_deref().unwrap().contains("disk on fire"));
        assert!(results["ok"].is_success());
        assert!(results["later"].is_success());
        assert_eq!(later.invocations(), 1);
    }

    #[tokio::test]
    async fn executor_batches_run_in_dependency_order() {
        let order = scrutiny_test_utils::InvocationLog::new();
        let a = Arc::new(MockAgent::new().with_log("a", order.clone()));
        let b = Arc::new(MockAgent::new().with_log("b", order.clone()));
        let c = Arc::new(MockAgent::new().with_log("c", order.clone()));
        let registry = registry_of(vec![
            (descriptor("a", &[]), a),
            (descriptor("b", &[]), b),
            (descriptor("c", &["a", "b"]), c),
        ])
        .await;
        let plan = plan_for(&registry, &["a", "b", "c"]);

        BatchExecutor::new(None)
            .execute(
                RunId::new(),
                &registry,
                &plan,
                &AnalysisContext::new("/src"),
                &EventBus::default(),
                &CancelFlag::new(),
            )
            .await;

        let seen = order.entries();
        assert_eq!(seen.len(), 3);
        // c settles last; a and b may interleave.
        assert_eq!(seen[2], "c");
    }

    #[tokio::test]
    async fn executor_timeout_becomes_failure() {
        let slow = Arc::new(MockAgent::new().with_delay(Duration::from_secs(5)));
        let fast = Arc::new(MockAgent::new());
        let registry = registry_of(vec![
            (descriptor("slow", &[]), slow),
            (descriptor("fast", &[]), fast),
        ])
        .await;
        let plan = plan_for(&registry, &["slow", "fast"]);

        let executor = BatchExecutor::new(Some(Duration::from_millis(50)));
        let results = executor
            .execute(
                RunId::new(),
                &registry,
                &plan,
                &AnalysisContext::new("/src"),
                &EventBus::default(),
                &CancelFlag::new(),
            )
            .await;

        assert_eq!(results["slow"].status, AnalysisStatus::Failed);
        assert!(results["slow"].error.as_deref().unwrap().contains("timed out"));
        assert!(results["fast"].is_success());
    }

    #[tokio::test]
    async fn executor_cancellation_skips_later_batches() {
        let cancel = CancelFlag::new();
        let first = Arc::new(MockAgent::new().with_cancel_on_finish(cancel.clone()));
        let second = Arc::new(MockAgent::new());
        let registry = registry_of(vec![
            (descriptor("first", &[]), first),
            (descriptor("second", &["first"]), second.clone()),
        ])
        .await;
        let plan = plan_for(&registry, &["first", "second"]);

        let results = BatchExecutor::new(None)
            .execute(
                RunId::new(),
                &registry,
                &plan,
                &AnalysisContext::new("/src"),
                &EventBus::default(),
                &cancel,
            )
            .await;

        // The first batch settled normally; the second was never launched.
        assert!(results["first"].is_success());
        assert_eq!(results["second"].status, AnalysisStatus::Failed);
        assert!(results["second"].error.as_deref().unwrap().contains("cancelled"));
        assert_eq!(second.invocations(), 0);
    }

    #[tokio::test]
    async fn executor_empty_plan_settles_immediately() {
        let registry = AgentRegistry::new();
        let graph = DependencyGraph::build(&registry, &[]).unwrap();
        let plan = ExecutionPlanner::plan(&graph).unwrap();

        let results = BatchExecutor::new(None)
            .execute(
                RunId::new(),
                &registry,
                &plan,
                &AnalysisContext::new("/src"),
                &EventBus::default(),
                &CancelFlag::new(),
            )
            .await;
        assert!(results.is_empty());
    }
}
