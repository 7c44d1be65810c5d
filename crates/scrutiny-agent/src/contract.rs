//! The uniform agent contract
//!
//! Every pluggable analysis unit satisfies [`AnalysisAgent`], regardless of
//! its native shape. The orchestrator only ever talks to agents through this
//! trait; any translation from a legacy interface happens once, in whatever
//! shim constructs the agent, never at call time.

use crate::error::AgentError;
use crate::report::AgentReport;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable cooperative-cancellation flag
///
/// The orchestrator sets it; agents that support early exit poll it between
/// units of work. Nothing is ever forcibly interrupted.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create an unset flag
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    #[inline]
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation was requested
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Context handed to every `analyze` call
///
/// Read-only from the agent's point of view; agents must not mutate shared
/// orchestrator state and do their own caching if they want any.
#[derive(Debug, Clone, Default)]
pub struct AnalysisContext {
    /// What to analyze, typically a filesystem path
    pub target: String,
    /// Caller-supplied analysis parameters
    pub params: BTreeMap<String, Value>,
    cancel: CancelFlag,
}

impl AnalysisContext {
    /// Create a context for a target
    #[inline]
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            params: BTreeMap::new(),
            cancel: CancelFlag::new(),
        }
    }

    /// Attach a parameter
    #[inline]
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// Attach a cancellation flag shared with the orchestrator
    #[inline]
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Check the shared cancellation flag
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// The contract every orchestrable analysis unit must expose
#[async_trait::async_trait]
pub trait AnalysisAgent: Send + Sync {
    /// Idempotent setup, called once at registration
    ///
    /// # Errors
    /// Returning an error keeps the agent out of the registry; the rest of
    /// the registry is unaffected.
    async fn initialize(&self) -> Result<(), AgentError>;

    /// Run one unit of analysis
    ///
    /// # Errors
    /// Errors are captured at the adapter boundary and folded into a failed
    /// analysis result; they never abort sibling agents.
    async fn analyze(&self, ctx: &AnalysisContext) -> Result<AgentReport, AgentError>;

    /// Release held resources
    ///
    /// Always invoked at orchestrator teardown, whatever the agent's last
    /// status. Must be safe to call after a failed `initialize`.
    fn cleanup(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_flag_propagates_through_clones() {
        let flag = CancelFlag::new();
        let view = flag.clone();
        assert!(!view.is_cancelled());

        flag.cancel();
        assert!(view.is_cancelled());
    }

    #[test]
    fn context_builder() {
        let flag = CancelFlag::new();
        let ctx = AnalysisContext::new("/src")
            .with_param("depth", serde_json::json!(3))
            .with_cancel(flag.clone());

        assert_eq!(ctx.target, "/src");
        assert_eq!(ctx.params["depth"], 3);
        assert!(!ctx.is_cancelled());

        flag.cancel();
        assert!(ctx.is_cancelled());
    }
}
