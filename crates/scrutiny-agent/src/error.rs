//! Error types for the agent layer
//!
//! Covers:
//! - Per-agent initialization and analysis failures
//! - Registration failures (non-fatal to the rest of the registry)
//! - Lookup misses

/// Errors produced by an individual analysis agent
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Agent setup failed; the agent will not be registered
    #[error("initialization failed: {0}")]
    Initialization(String),

    /// A single analysis run failed
    #[error("analysis failed: {0}")]
    Analysis(String),

    /// The agent observed the cancellation flag and exited early
    #[error("analysis cancelled")]
    Cancelled,

    /// Agent-internal error of any other shape
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AgentError {
    /// Check whether this failure came from cooperative cancellation
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Errors produced by the agent registry
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// An agent failed to initialize during registration
    ///
    /// The registry itself is unaffected; the agent is simply absent.
    #[error("registration of '{name}' failed: {source}")]
    Registration {
        /// Name the agent was being registered under
        name: String,
        /// The underlying initialization failure
        #[source]
        source: AgentError,
    },

    /// An agent with this name is already registered
    #[error("agent already registered: {0}")]
    DuplicateName(String),

    /// No agent registered under this name
    #[error("agent not found: {0}")]
    NotFound(String),
}
