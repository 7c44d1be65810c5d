//! Execution planning
//!
//! Depth-first topological batching with three-color cycle detection. A
//! visit of an in-progress node means the requested subgraph has a cycle,
//! and planning fails outright: no partial plan is ever returned.
//!
//! Batch assignment: a node lands in the earliest batch strictly after all
//! of its in-request dependencies, so batch 0 holds every dependency-free
//! agent. For a fixed graph and requested-name ordering the output is fully
//! deterministic: DFS roots follow requested order, dependency edges follow
//! declaration order, and in-batch membership follows requested order. No
//! map iteration order leaks into the result.

use crate::error::PlanError;
use crate::graph::DependencyGraph;
use serde::Serialize;
use std::collections::HashMap;

/// Ordered batches of agent names
///
/// Every agent in batch *N* depends only on agents in batches *0..N-1*;
/// the concatenation of all batches is exactly the requested set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecutionPlan {
    batches: Vec<Vec<String>>,
}

impl ExecutionPlan {
    /// The batches, in execution order
    #[inline]
    #[must_use]
    pub fn batches(&self) -> &[Vec<String>] {
        &self.batches
    }

    /// Number of batches
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    /// Check whether the plan schedules nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Total number of scheduled agents
    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }

    /// Batch index of an agent, if scheduled
    #[must_use]
    pub fn batch_of(&self, name: &str) -> Option<usize> {
        self.batches
            .iter()
            .position(|batch| batch.iter().any(|n| n == name))
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    InProgress,
    Done,
}

/// Batch planner over a dependency graph
#[derive(Debug, Default)]
pub struct ExecutionPlanner;

impl ExecutionPlanner {
    /// Compute the batched execution plan
    ///
    /// An empty graph yields an empty plan, which is valid.
    ///
    /// # Errors
    /// `PlanError::CyclicDependency` naming an agent on the cycle; no
    /// partial plan is returned.
    pub fn plan(graph: &DependencyGraph) -> Result<ExecutionPlan, PlanError> {
        fn visit(
            name: &str,
            graph: &DependencyGraph,
            marks: &mut HashMap<String, Mark>,
            assigned: &mut HashMap<String, usize>,
        ) -> Result<usize, PlanError> {
            match marks.get(name) {
                Some(Mark::InProgress) => {
                    return Err(PlanError::CyclicDependency(name.to_string()))
                }
                Some(Mark::Done) => return Ok(assigned[name]),
                None => {}
            }

            marks.insert(name.to_string(), Mark::InProgress);

            let mut batch = 0;
            if let Some(deps) = graph.dependencies_of(name) {
                for dep in deps {
                    batch = batch.max(visit(dep, graph, marks, assigned)? + 1);
                }
            }

            marks.insert(name.to_string(), Mark::Done);
            assigned.insert(name.to_string(), batch);
            Ok(batch)
        }

        let mut marks = HashMap::new();
        let mut assigned = HashMap::new();
        for name in graph.names() {
            visit(name, graph, &mut marks, &mut assigned)?;
        }

        let depth = assigned.values().copied().max().map_or(0, |d| d + 1);
        let mut batches = vec![Vec::new(); depth];
        for name in graph.names() {
            batches[assigned[name]].push(name.to_string());
        }

        tracing::debug!(
            agents = graph.len(),
            batches = batches.len(),
            "execution plan computed"
        );
        Ok(ExecutionPlan { batches })
    }
}
