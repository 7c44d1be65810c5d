//! Scrutiny Plan - dependency resolution and execution planning
//!
//! Turns the registry's declared dependency names into a validated order:
//! - [`DependencyGraph`] builds forward and reverse edges over the
//!   requested agent set, rejecting unknown names and unregistered
//!   dependencies before anything runs
//! - [`ExecutionPlanner`] performs DFS topological batching with cycle
//!   detection, producing an [`ExecutionPlan`] whose batches the executor
//!   runs in sequence
//!
//! # Example
//!
//! ```rust,ignore
//! use scrutiny_plan::{DependencyGraph, ExecutionPlanner};
//!
//! # fn example(registry: &scrutiny_agent::AgentRegistry) -> Result<(), scrutiny_plan::PlanError> {
//! let requested = registry.names();
//! let graph = DependencyGraph::build(registry, &requested)?;
//! let plan = ExecutionPlanner::plan(&graph)?;
//! for batch in plan.batches() {
//!     println!("run together: {batch:?}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod graph;
pub mod planner;

// Re-exports for convenience
pub use error::PlanError;
pub use graph::{DependencyGraph, GraphNode};
pub use planner::{ExecutionPlan, ExecutionPlanner};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
