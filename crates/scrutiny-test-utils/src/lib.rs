//! Testing utilities for the scrutiny workspace
//!
//! Shared mock agents and fixtures.

#![allow(missing_docs)]

use parking_lot::Mutex;
use scrutiny_agent::{
    AgentDescriptor, AgentError, AgentReport, AnalysisAgent, AnalysisContext, CancelFlag,
    Recommendation,
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared, ordered record of which agents ran, for asserting batch order.
#[derive(Debug, Clone, Default)]
pub struct InvocationLog(Arc<Mutex<Vec<String>>>);

impl InvocationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, name: &str) {
        self.0.lock().push(name.to_string());
    }

    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

/// Configurable mock analysis agent.
///
/// Counts invocations and cleanups so tests can assert cache behavior and
/// lifecycle guarantees.
#[derive(Debug, Default)]
pub struct MockAgent {
    payload: Value,
    recommendations: Vec<Recommendation>,
    delay: Option<Duration>,
    fail_analyze: Option<String>,
    fail_init: Option<String>,
    cancel_on_finish: Option<CancelFlag>,
    log: Option<(String, InvocationLog)>,
    invocations: AtomicUsize,
    cleanups: AtomicUsize,
}

impl MockAgent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    #[must_use]
    pub fn with_recommendation(mut self, rec: Recommendation) -> Self {
        self.recommendations.push(rec);
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    #[must_use]
    pub fn with_failure(mut self, message: &str) -> Self {
        self.fail_analyze = Some(message.to_string());
        self
    }

    #[must_use]
    pub fn with_init_failure(mut self, message: &str) -> Self {
        self.fail_init = Some(message.to_string());
        self
    }

    /// Trip the shared cancellation flag as this agent's analysis settles.
    #[must_use]
    pub fn with_cancel_on_finish(mut self, flag: CancelFlag) -> Self {
        self.cancel_on_finish = Some(flag);
        self
    }

    /// Record this agent's settle order under `name` in a shared log.
    #[must_use]
    pub fn with_log(mut self, name: &str, log: InvocationLog) -> Self {
        self.log = Some((name.to_string(), log));
        self
    }

    #[must_use]
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn cleanups(&self) -> usize {
        self.cleanups.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AnalysisAgent for MockAgent {
    async fn initialize(&self) -> Result<(), AgentError> {
        match &self.fail_init {
            Some(message) => Err(AgentError::Initialization(message.clone())),
            None => Ok(()),
        }
    }

    async fn analyze(&self, ctx: &AnalysisContext) -> Result<AgentReport, AgentError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        if ctx.is_cancelled() {
            return Err(AgentError::Cancelled);
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = match &self.fail_analyze {
            Some(message) => Err(AgentError::Analysis(message.clone())),
            None => {
                let mut report = AgentReport::new(self.payload.clone());
                report.recommendations = self.recommendations.clone();
                Ok(report)
            }
        };

        if let Some((name, log)) = &self.log {
            log.push(name);
        }
        if let Some(flag) = &self.cancel_on_finish {
            flag.cancel();
        }
        outcome
    }

    fn cleanup(&self) {
        self.cleanups.fetch_add(1, Ordering::SeqCst);
    }
}

/// Descriptor shorthand for tests.
#[must_use]
pub fn descriptor(name: &str, dependencies: &[&str]) -> AgentDescriptor {
    AgentDescriptor::new(name).with_dependencies(dependencies.iter().copied())
}
