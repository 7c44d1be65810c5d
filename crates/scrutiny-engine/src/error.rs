//! Engine errors
//!
//! Only structural failures surface here: a run either returns a
//! `RunResult` (possibly containing failed per-agent entries) or one of
//! these. Per-agent execution failures never escape the batch executor.

use scrutiny_agent::RegistryError;
use scrutiny_plan::PlanError;

/// Top-level orchestrator error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// No valid execution order exists for the requested agents
    #[error("planning failed: {0}")]
    Plan(#[from] PlanError),

    /// Registry-level failure
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl EngineError {
    /// Check whether this is a structural planning failure
    #[inline]
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Plan(_))
    }
}
