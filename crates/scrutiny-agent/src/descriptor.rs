//! Agent descriptors
//!
//! An [`AgentDescriptor`] is the static metadata an agent is registered
//! under: its unique name, the capability tags it advertises, the names of
//! agents that must complete before it, and a reporting priority. It is
//! created once at registration time and never mutated afterwards.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Static metadata for a registered agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDescriptor {
    /// Unique registry key
    pub name: String,
    /// Capability tags describing what kind of finding this agent produces
    pub capabilities: IndexSet<String>,
    /// Names of agents that must complete before this one runs
    pub dependencies: IndexSet<String>,
    /// Reporting weight, used only for tie-breaking in output, never for scheduling
    pub priority: u8,
}

impl AgentDescriptor {
    /// Create a descriptor with no capabilities or dependencies
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capabilities: IndexSet::new(),
            dependencies: IndexSet::new(),
            priority: 0,
        }
    }

    /// Add a capability tag
    #[inline]
    #[must_use]
    pub fn with_capability(mut self, tag: impl Into<String>) -> Self {
        self.capabilities.insert(tag.into());
        self
    }

    /// Add a dependency on another agent by name
    #[inline]
    #[must_use]
    pub fn with_dependency(mut self, name: impl Into<String>) -> Self {
        self.dependencies.insert(name.into());
        self
    }

    /// Add several dependencies at once, preserving declaration order
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.extend(names.into_iter().map(Into::into));
        self
    }

    /// Set the reporting priority
    #[inline]
    #[must_use]
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Check whether this agent advertises a capability tag
    #[inline]
    #[must_use]
    pub fn has_capability(&self, tag: &str) -> bool {
        self.capabilities.contains(tag)
    }
}
