//! Agent adapter
//!
//! Binds an [`AgentDescriptor`] to a live [`AnalysisAgent`] and tracks its
//! lifecycle. The adapter is owned by the registry; the executor only
//! invokes `analyze` and reads `status`.

use crate::contract::{AnalysisAgent, AnalysisContext};
use crate::descriptor::AgentDescriptor;
use crate::error::AgentError;
use crate::report::AgentReport;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lifecycle state of an adapter
///
/// `Inactive → Initializing → Active → Analyzing → Completed | Failed`,
/// returning to `Inactive` after cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// Constructed but not yet initialized, or cleaned up
    Inactive,
    /// `initialize` in flight
    Initializing,
    /// Initialized and idle
    Active,
    /// `analyze` in flight
    Analyzing,
    /// Last analysis succeeded
    Completed,
    /// Last analysis or initialization failed
    Failed,
}

/// Runtime wrapper around one registered agent
pub struct AgentAdapter {
    descriptor: AgentDescriptor,
    agent: Arc<dyn AnalysisAgent>,
    status: RwLock<AgentStatus>,
    cleaned: AtomicBool,
}

impl AgentAdapter {
    /// Wrap an agent under a descriptor; status starts `Inactive`
    #[must_use]
    pub fn new(descriptor: AgentDescriptor, agent: Arc<dyn AnalysisAgent>) -> Self {
        Self {
            descriptor,
            agent,
            status: RwLock::new(AgentStatus::Inactive),
            cleaned: AtomicBool::new(false),
        }
    }

    /// Agent name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Static metadata
    #[inline]
    #[must_use]
    pub fn descriptor(&self) -> &AgentDescriptor {
        &self.descriptor
    }

    /// Current lifecycle state
    #[inline]
    #[must_use]
    pub fn status(&self) -> AgentStatus {
        *self.status.read()
    }

    /// Drive `Inactive → Initializing → Active`
    ///
    /// # Errors
    /// On failure the adapter is left `Failed`; the registry discards it
    /// after running cleanup.
    pub async fn initialize(&self) -> Result<(), AgentError> {
        *self.status.write() = AgentStatus::Initializing;
        match self.agent.initialize().await {
            Ok(()) => {
                *self.status.write() = AgentStatus::Active;
                Ok(())
            }
            Err(e) => {
                *self.status.write() = AgentStatus::Failed;
                Err(e)
            }
        }
    }

    /// Run one analysis, tracking `Analyzing → Completed | Failed`
    ///
    /// # Errors
    /// Propagates the agent's own failure; the caller decides how to fold
    /// it into the run.
    pub async fn analyze(&self, ctx: &AnalysisContext) -> Result<AgentReport, AgentError> {
        *self.status.write() = AgentStatus::Analyzing;
        let outcome = self.agent.analyze(ctx).await;
        *self.status.write() = if outcome.is_ok() {
            AgentStatus::Completed
        } else {
            AgentStatus::Failed
        };
        outcome
    }

    /// Release the agent's resources, exactly once, then go `Inactive`
    ///
    /// Safe to call repeatedly and after a failed initialization.
    pub fn cleanup(&self) {
        if !self.cleaned.swap(true, Ordering::SeqCst) {
            self.agent.cleanup();
        }
        *self.status.write() = AgentStatus::Inactive;
    }
}

impl std::fmt::Debug for AgentAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentAdapter")
            .field("name", &self.descriptor.name)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct StubAgent {
        fail_init: bool,
        fail_analyze: bool,
        cleanups: AtomicUsize,
    }

    impl StubAgent {
        fn ok() -> Self {
            Self {
                fail_init: false,
                fail_analyze: false,
                cleanups: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl AnalysisAgent for StubAgent {
        async fn initialize(&self) -> Result<(), AgentError> {
            if self.fail_init {
                Err(AgentError::Initialization("stub".to_string()))
            } else {
                Ok(())
            }
        }

        async fn analyze(&self, _ctx: &AnalysisContext) -> Result<AgentReport, AgentError> {
            if self.fail_analyze {
                Err(AgentError::Analysis("stub".to_string()))
            } else {
                Ok(AgentReport::default())
            }
        }

        fn cleanup(&self) {
            self.cleanups.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn adapter(agent: StubAgent) -> (AgentAdapter, Arc<StubAgent>) {
        let agent = Arc::new(agent);
        let adapter = AgentAdapter::new(AgentDescriptor::new("stub"), agent.clone());
        (adapter, agent)
    }

    #[tokio::test]
    async fn adapter_lifecycle_happy_path() {
        let (adapter, _) = adapter(StubAgent::ok());
        assert_eq!(adapter.status(), AgentStatus::Inactive);

        adapter.initialize().await.unwrap();
        assert_eq!(adapter.status(), AgentStatus::Active);

        adapter
            .analyze(&AnalysisContext::new("/src"))
            .await
            .unwrap();
        assert_eq!(adapter.status(), AgentStatus::Completed);

        adapter.cleanup();
        assert_eq!(adapter.status(), AgentStatus::Inactive);
    }

    #[tokio::test]
    async fn adapter_failed_analysis_sets_failed() {
        let (adapter, _) = adapter(StubAgent {
            fail_analyze: true,
            ..StubAgent::ok()
        });
        adapter.initialize().await.unwrap();

        let result = adapter.analyze(&AnalysisContext::new("/src")).await;
        assert!(result.is_err());
        assert_eq!(adapter.status(), AgentStatus::Failed);
    }

    #[tokio::test]
    async fn adapter_failed_init_sets_failed() {
        let (adapter, _) = adapter(StubAgent {
            fail_init: true,
            ..StubAgent::ok()
        });
        assert!(adapter.initialize().await.is_err());
        assert_eq!(adapter.status(), AgentStatus::Failed);
    }

    #[tokio::test]
    async fn adapter_cleanup_runs_once() {
        let (adapter, agent) = adapter(StubAgent::ok());
        adapter.initialize().await.unwrap();

        adapter.cleanup();
        adapter.cleanup();
        assert_eq!(agent.cleanups.load(Ordering::SeqCst), 1);
    }
}
