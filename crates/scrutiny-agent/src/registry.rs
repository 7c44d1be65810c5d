//! Agent registry
//!
//! Source of truth for registered agents. Holds adapters in registration
//! order (that order drives the default requested set and every
//! deterministic tie-break downstream), initializes agents on registration,
//! and guarantees cleanup on teardown whatever each agent's last status was.

use crate::adapter::AgentAdapter;
use crate::contract::AnalysisAgent;
use crate::descriptor::AgentDescriptor;
use crate::error::RegistryError;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Registry of named agent adapters
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: RwLock<IndexMap<String, Arc<AgentAdapter>>>,
}

impl AgentRegistry {
    /// Create an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent under a descriptor
    ///
    /// Constructs the adapter, runs `initialize`, and stores it. A failed
    /// initialization leaves the registry unchanged: the agent gets its
    /// `cleanup` call and is discarded.
    ///
    /// # Errors
    /// - `RegistryError::DuplicateName` if the name is taken
    /// - `RegistryError::Registration` if the agent fails to initialize
    pub async fn register(
        &self,
        descriptor: AgentDescriptor,
        agent: Arc<dyn AnalysisAgent>,
    ) -> Result<(), RegistryError> {
        let name = descriptor.name.clone();
        if self.agents.read().contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        let adapter = Arc::new(AgentAdapter::new(descriptor, agent));
        if let Err(source) = adapter.initialize().await {
            tracing::warn!(agent = %name, error = %source, "agent failed to initialize");
            adapter.cleanup();
            return Err(RegistryError::Registration { name, source });
        }

        let mut agents = self.agents.write();
        if agents.contains_key(&name) {
            // Lost a registration race while initializing; release and bail.
            drop(agents);
            adapter.cleanup();
            return Err(RegistryError::DuplicateName(name));
        }
        tracing::info!(agent = %name, "agent registered");
        agents.insert(name, adapter);
        Ok(())
    }

    /// Look up an adapter by name
    ///
    /// # Errors
    /// `RegistryError::NotFound` if no agent is registered under `name`.
    pub fn get(&self, name: &str) -> Result<Arc<AgentAdapter>, RegistryError> {
        self.agents
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// All adapters advertising a capability tag
    #[must_use]
    pub fn capable_of(&self, tag: &str) -> Vec<Arc<AgentAdapter>> {
        self.agents
            .read()
            .values()
            .filter(|a| a.descriptor().has_capability(tag))
            .cloned()
            .collect()
    }

    /// Registered names, in registration order
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.agents.read().keys().cloned().collect()
    }

    /// Check whether a name is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.agents.read().contains_key(name)
    }

    /// Number of registered agents
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.read().len()
    }

    /// Check whether the registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.read().is_empty()
    }

    /// Clean up and remove every adapter
    ///
    /// Idempotent; also invoked from `Drop` so adapters are released on
    /// every exit path.
    pub fn shutdown(&self) {
        let agents: Vec<Arc<AgentAdapter>> = self.agents.write().drain(..).map(|(_, a)| a).collect();
        for adapter in agents {
            tracing::debug!(agent = %adapter.name(), "cleaning up agent");
            adapter.cleanup();
        }
    }
}

impl Drop for AgentRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::AnalysisContext;
    use crate::error::AgentError;
    use crate::report::AgentReport;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct StubAgent {
        fail_init: bool,
        cleanups: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl AnalysisAgent for StubAgent {
        async fn initialize(&self) -> Result<(), AgentError> {
            if self.fail_init {
                Err(AgentError::Initialization("stub".to_string()))
            } else {
                Ok(())
            }
        }

        async fn analyze(&self, _ctx: &AnalysisContext) -> Result<AgentReport, AgentError> {
            Ok(AgentReport::default())
        }

        fn cleanup(&self) {
            self.cleanups.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn descriptor(name: &str, tag: &str) -> AgentDescriptor {
        AgentDescriptor::new(name).with_capability(tag)
    }

    #[tokio::test]
    async fn registry_register_and_get() {
        let registry = AgentRegistry::new();
        registry
            .register(descriptor("linter", "quality"), Arc::new(StubAgent::default()))
            .await
            .unwrap();

        let adapter = registry.get("linter").unwrap();
        assert_eq!(adapter.name(), "linter");
        assert!(matches!(
            registry.get("missing"),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn registry_rejects_duplicate_names() {
        let registry = AgentRegistry::new();
        registry
            .register(descriptor("linter", "quality"), Arc::new(StubAgent::default()))
            .await
            .unwrap();

        let result = registry
            .register(descriptor("linter", "quality"), Arc::new(StubAgent::default()))
            .await;
        assert!(matches!(result, Err(RegistryError::DuplicateName(_))));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn registry_failed_init_is_non_fatal() {
        let registry = AgentRegistry::new();
        let cleanups = Arc::new(AtomicUsize::new(0));

        let result = registry
            .register(
                descriptor("broken", "quality"),
                Arc::new(StubAgent {
                    fail_init: true,
                    cleanups: cleanups.clone(),
                }),
            )
            .await;
        assert!(matches!(result, Err(RegistryError::Registration { .. })));
        // Partially-initialized agent still got its cleanup call.
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);

        // The registry keeps working.
        registry
            .register(descriptor("linter", "quality"), Arc::new(StubAgent::default()))
            .await
            .unwrap();
        assert_eq!(registry.len(), 1);
        assert!(!registry.contains("broken"));
    }

    #[tokio::test]
    async fn registry_capable_of() {
        let registry = AgentRegistry::new();
        registry
            .register(descriptor("linter", "quality"), Arc::new(StubAgent::default()))
            .await
            .unwrap();
        registry
            .register(descriptor("scanner", "security"), Arc::new(StubAgent::default()))
            .await
            .unwrap();
        registry
            .register(descriptor("complexity", "quality"), Arc::new(StubAgent::default()))
            .await
            .unwrap();

        let capable = registry.capable_of("quality");
        let names: Vec<&str> = capable.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["linter", "complexity"]);
    }

    #[tokio::test]
    async fn registry_names_preserve_registration_order() {
        let registry = AgentRegistry::new();
        for name in ["c", "a", "b"] {
            registry
                .register(descriptor(name, "t"), Arc::new(StubAgent::default()))
                .await
                .unwrap();
        }
        assert_eq!(registry.names(), vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn registry_shutdown_cleans_every_agent() {
        let registry = AgentRegistry::new();
        let cleanups = Arc::new(AtomicUsize::new(0));
        for name in ["a", "b"] {
            registry
                .register(
                    descriptor(name, "t"),
                    Arc::new(StubAgent {
                        fail_init: false,
                        cleanups: cleanups.clone(),
                    }),
                )
                .await
                .unwrap();
        }

        registry.shutdown();
        assert_eq!(cleanups.load(Ordering::SeqCst), 2);
        assert!(registry.is_empty());

        // Second shutdown is a no-op.
        registry.shutdown();
        assert_eq!(cleanups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn registry_drop_cleans_agents() {
        let cleanups = Arc::new(AtomicUsize::new(0));
        {
            let registry = AgentRegistry::new();
            registry
                .register(
                    descriptor("a", "t"),
                    Arc::new(StubAgent {
                        fail_init: false,
                        cleanups: cleanups.clone(),
                    }),
                )
                .await
                .unwrap();
        }
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
    }
}
