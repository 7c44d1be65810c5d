//! Event bus
//!
//! Process-local publish/subscribe used for observability. Advisory only:
//! publishing never blocks, a missing or lagging subscriber never affects
//! the run that produced the event. The bus is constructed and owned by the
//! orchestrator and torn down with it.

use crate::types::RunId;
use serde::Serialize;
use tokio::sync::broadcast;

/// Lifecycle notifications emitted during a run
#[derive(Debug, Clone, Serialize)]
pub enum OrchestratorEvent {
    /// An agent's `analyze` was launched
    AgentStarted {
        /// Run the agent belongs to
        run_id: RunId,
        /// Agent name
        agent: String,
    },
    /// An agent settled successfully
    AgentCompleted {
        /// Run the agent belongs to
        run_id: RunId,
        /// Agent name
        agent: String,
        /// Wall-clock duration of the call
        duration_ms: u64,
    },
    /// An agent settled as a failure
    AgentFailed {
        /// Run the agent belongs to
        run_id: RunId,
        /// Agent name
        agent: String,
        /// Failure description
        error: String,
    },
    /// A run settled, from execution or from the cache
    RunCompleted {
        /// Run identifier
        run_id: RunId,
        /// Analyzed target
        target: String,
        /// Whether the result was served from the cache
        from_cache: bool,
        /// Successful agents
        succeeded: usize,
        /// Failed agents
        failed: usize,
    },
}

/// Broadcast-backed event bus
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<OrchestratorEvent>,
}

impl EventBus {
    /// Create a bus with the given channel capacity
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to all future events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<OrchestratorEvent> {
        self.sender.subscribe()
    }

    /// Publish an event; dropped silently when nobody is listening
    pub fn publish(&self, event: OrchestratorEvent) {
        let _ = self.sender.send(event);
    }

    /// Number of live subscribers
    #[inline]
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bus_delivers_to_subscriber() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        let run_id = RunId::new();
        bus.publish(OrchestratorEvent::AgentStarted {
            run_id,
            agent: "linter".to_string(),
        });

        match rx.recv().await.unwrap() {
            OrchestratorEvent::AgentStarted { agent, .. } => assert_eq!(agent, "linter"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn bus_publish_without_subscribers_is_silent() {
        let bus = EventBus::new(8);
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(OrchestratorEvent::AgentFailed {
            run_id: RunId::new(),
            agent: "x".to_string(),
            error: "boom".to_string(),
        });
    }

    #[tokio::test]
    async fn bus_fans_out_to_all_subscribers() {
        let bus = EventBus::new(8);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(OrchestratorEvent::AgentStarted {
            run_id: RunId::new(),
            agent: "a".to_string(),
        });

        assert!(rx1.recv().await.is_ok());
        assert!(rx2.recv().await.is_ok());
    }
}
