//! Dependency graph construction
//!
//! Turns declared dependency names into a directed graph over the requested
//! agent set. Forward edges drive scheduling; the reverse (dependents) index
//! exists for diagnostics only.
//!
//! Two validation rules, both checked before cycle detection:
//! - every requested name must be registered (`UnknownAgent`)
//! - every declared dependency must be registered (`MissingDependency`)
//!
//! A dependency that is registered but *outside* the requested set imposes
//! no ordering edge: the caller chose not to run it.

use crate::error::PlanError;
use indexmap::{IndexMap, IndexSet};
use scrutiny_agent::{AgentDescriptor, AgentRegistry};
use serde::Serialize;

/// Edges for one agent in the requested subgraph
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphNode {
    /// Agents this one must wait for, in declaration order
    pub dependencies: IndexSet<String>,
    /// Agents waiting for this one
    pub dependents: IndexSet<String>,
}

/// Directed dependency graph over a requested agent set
///
/// Node order follows the requested-name order, which every downstream
/// consumer relies on for determinism.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyGraph {
    nodes: IndexMap<String, GraphNode>,
}

impl DependencyGraph {
    /// Build the graph for `requested` against a live registry
    ///
    /// # Errors
    /// - `PlanError::UnknownAgent` if a requested name is unregistered
    /// - `PlanError::MissingDependency` if a declared dependency is
    ///   unregistered
    pub fn build(registry: &AgentRegistry, requested: &[String]) -> Result<Self, PlanError> {
        let mut registered = IndexMap::new();
        for name in registry.names() {
            if let Ok(adapter) = registry.get(&name) {
                registered.insert(name, adapter.descriptor().clone());
            }
        }
        Self::from_descriptors(&registered, requested)
    }

    /// Build the graph from a descriptor snapshot
    ///
    /// `registered` must hold every known agent; `requested` selects the
    /// subgraph. Duplicate requested names collapse to their first
    /// occurrence.
    ///
    /// # Errors
    /// Same contract as [`DependencyGraph::build`].
    pub fn from_descriptors(
        registered: &IndexMap<String, AgentDescriptor>,
        requested: &[String],
    ) -> Result<Self, PlanError> {
        let mut selected: IndexSet<&str> = IndexSet::new();
        for name in requested {
            if !registered.contains_key(name.as_str()) {
                return Err(PlanError::UnknownAgent(name.clone()));
            }
            selected.insert(name.as_str());
        }

        let mut nodes: IndexMap<String, GraphNode> = selected
            .iter()
            .map(|name| ((*name).to_string(), GraphNode::default()))
            .collect();

        for name in &selected {
            let descriptor = &registered[*name];
            for dep in &descriptor.dependencies {
                if !registered.contains_key(dep.as_str()) {
                    return Err(PlanError::MissingDependency {
                        agent: (*name).to_string(),
                        dependency: dep.clone(),
                    });
                }
                if !selected.contains(dep.as_str()) {
                    // Registered but not requested: no ordering constraint.
                    tracing::debug!(agent = %name, dependency = %dep, "dependency not requested, ignoring");
                    continue;
                }
                nodes[*name].dependencies.insert(dep.clone());
                nodes[dep.as_str()].dependents.insert((*name).to_string());
            }
        }

        Ok(Self { nodes })
    }

    /// Node names in requested order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Dependencies of one node, in declaration order
    #[must_use]
    pub fn dependencies_of(&self, name: &str) -> Option<&IndexSet<String>> {
        self.nodes.get(name).map(|n| &n.dependencies)
    }

    /// Dependents of one node
    #[must_use]
    pub fn dependents_of(&self, name: &str) -> Option<&IndexSet<String>> {
        self.nodes.get(name).map(|n| &n.dependents)
    }

    /// Check whether a node is present
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the graph is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
