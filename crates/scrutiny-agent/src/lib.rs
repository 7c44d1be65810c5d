//! Scrutiny Agent - the pluggable analysis unit contract
//!
//! The lowest layer of the scrutiny orchestrator:
//! - The [`AnalysisAgent`] contract every analysis unit satisfies
//! - [`AgentDescriptor`] metadata (name, capabilities, dependencies)
//! - [`AgentAdapter`] lifecycle tracking around each registered agent
//! - [`AgentRegistry`], the source of truth the planner and executor query
//!
//! # Example
//!
//! ```rust,ignore
//! use scrutiny_agent::{AgentDescriptor, AgentRegistry};
//!
//! # async fn example(agent: std::sync::Arc<dyn scrutiny_agent::AnalysisAgent>) {
//! let registry = AgentRegistry::new();
//! let descriptor = AgentDescriptor::new("code-quality")
//!     .with_capability("quality")
//!     .with_dependency("dependency-audit");
//! registry.register(descriptor, agent).await.unwrap();
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod adapter;
pub mod contract;
pub mod descriptor;
pub mod error;
pub mod registry;
pub mod report;

// Re-exports for convenience
pub use adapter::{AgentAdapter, AgentStatus};
pub use contract::{AnalysisAgent, AnalysisContext, CancelFlag};
pub use descriptor::AgentDescriptor;
pub use error::{AgentError, RegistryError};
pub use registry::AgentRegistry;
pub use report::{AgentReport, Recommendation, RecommendationPriority, SourceKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
