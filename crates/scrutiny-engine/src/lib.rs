//! Scrutiny Engine - dependency-aware analysis orchestration
//!
//! The execution layer of the scrutiny workspace:
//! - [`BatchExecutor`] runs planned batches with per-agent failure isolation
//! - [`ResultCache`] memoizes completed runs with a TTL
//! - [`CorrelationEngine`] derives cross-agent findings and ranks the
//!   merged recommendation list
//! - [`EventBus`] publishes advisory lifecycle events
//! - [`AnalysisOrchestrator`] is the facade external callers consume
//!
//! # Example
//!
//! ```rust,ignore
//! use scrutiny_engine::{AnalysisOrchestrator, EngineConfig, RunOptions};
//! use scrutiny_agent::AgentDescriptor;
//!
//! # async fn example(agent: std::sync::Arc<dyn scrutiny_agent::AnalysisAgent>) {
//! let orchestrator = AnalysisOrchestrator::new(EngineConfig::new());
//! orchestrator
//!     .register_agent(AgentDescriptor::new("code-quality"), agent)
//!     .await
//!     .unwrap();
//!
//! let result = orchestrator.run("/src", RunOptions::new()).await.unwrap();
//! println!("{} recommendations", result.recommendations.len());
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod cache;
pub mod config;
pub mod correlate;
pub mod error;
pub mod events;
pub mod executor;
pub mod history;
pub mod orchestrator;
pub mod types;

// Re-exports for convenience
pub use cache::ResultCache;
pub use config::EngineConfig;
pub use correlate::{CorrelationEngine, CorrelationRule, RULES};
pub use error::EngineError;
pub use events::{EventBus, OrchestratorEvent};
pub use executor::BatchExecutor;
pub use history::RunHistory;
pub use orchestrator::AnalysisOrchestrator;
pub use types::{
    AnalysisResult, AnalysisStatus, RunId, RunOptions, RunRecord, RunResult, RunSummary,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the scrutiny engine
    pub use crate::{
        AnalysisOrchestrator, AnalysisResult, AnalysisStatus, EngineConfig, EngineError,
        OrchestratorEvent, RunOptions, RunResult,
    };
    pub use scrutiny_agent::{
        AgentDescriptor, AgentReport, AnalysisAgent, AnalysisContext, Recommendation,
        RecommendationPriority,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
